/*!
 * 当前用户中间件
 *
 * 身份认证由上游网关完成，网关在 `X-User-Id` 请求头中传递已认证的用户 ID。
 * 此中间件加载该用户并放入请求扩展，供后续中间件和处理程序使用。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::{web, App};
 * use crate::middlewares::RequireActor;
 *
 * App::new().service(
 *     web::scope("/api/v1/assignments")
 *         .wrap(RequireActor)
 *         .route("/{assignment_id}", web::get().to(get_assignment)),
 * );
 *
 * async fn get_assignment(req: HttpRequest) -> Result<HttpResponse> {
 *     let actor = RequireActor::extract_actor(&req);
 *     // ...
 * }
 * ```
 *
 * 请求头缺失、格式错误或用户不存在时返回 401。
 */

use crate::errors::GradebookError;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::extractor::is_valid_id;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

pub const ACTOR_HEADER: &str = "X-User-Id";

#[derive(Clone)]
pub struct RequireActor;

// 辅助函数：根据请求头加载当前用户
async fn load_actor(req: &ServiceRequest) -> Result<User, GradebookError> {
    let user_id = req
        .headers()
        .get(ACTOR_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| GradebookError::authentication(format!("Missing {ACTOR_HEADER} header")))?;

    if !is_valid_id(user_id) {
        return Err(GradebookError::authentication(format!(
            "Invalid {ACTOR_HEADER} header"
        )));
    }

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| GradebookError::database_config("Storage not found in app data"))?
        .get_ref()
        .clone();

    storage
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| GradebookError::authentication(format!("Unknown user: {user_id}")))
}

impl<S, B> Transform<S, ServiceRequest> for RequireActor
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireActorMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireActorMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireActorMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireActorMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // CORS 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            match load_actor(&req).await {
                Ok(user) => {
                    debug!("Acting user {} ({})", user.id, user.role);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!("Actor resolution failed for {}: {}", req.path(), err);
                    Ok(req.into_response(err.error_response().map_into_right_body()))
                }
            }
        })
    }
}

// 辅助函数：从请求中提取当前用户信息
impl RequireActor {
    /// 从请求扩展中提取当前用户
    /// 此函数应该在应用了 RequireActor 中间件的路由处理程序中使用
    pub fn extract_actor(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }
}
