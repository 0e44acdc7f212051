/*!
 * 基于角色的访问控制中间件
 *
 * 此中间件必须在 RequireActor 中间件之后使用，用于验证当前用户是否具有特定角色。
 *
 * ```rust,ignore
 * web::post()
 *     .to(create_assignment)
 *     .wrap(RequireRole::new_any(UserRole::instructor_roles()))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::errors::GradebookError;
use crate::models::users::entities::{User, UserRole};

#[derive(Clone)]
pub struct RequireRole {
    required_roles: Vec<UserRole>,
}

impl RequireRole {
    /// 创建需要特定角色的中间件
    pub fn new(role: &UserRole) -> Self {
        Self {
            required_roles: vec![role.clone()],
        }
    }

    /// 创建需要任一角色的中间件
    pub fn new_any(roles: &[&UserRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    fn permits(required_roles: &[UserRole], role: &UserRole) -> bool {
        required_roles.iter().any(|r| r == role)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<UserRole>,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
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
        let required_roles = self.required_roles.clone();

        Box::pin(async move {
            let actor = req.extensions().get::<User>().cloned();

            match actor {
                Some(user) if RequireRole::permits(&required_roles, &user.role) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some(user) => {
                    info!(
                        "Access denied for user {} (role: {}). Required roles: {:?}",
                        user.id, user.role, required_roles
                    );
                    let err = GradebookError::authorization("Access denied.");
                    Ok(req.into_response(err.error_response().map_into_right_body()))
                }
                None => {
                    info!(
                        "Role check failed: no acting user in request. Make sure RequireActor middleware is applied first."
                    );
                    let err = GradebookError::authentication("Authentication required");
                    Ok(req.into_response(err.error_response().map_into_right_body()))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permits_any_listed_role() {
        let roles: Vec<UserRole> = UserRole::instructor_roles()
            .iter()
            .map(|r| (*r).clone())
            .collect();
        assert!(RequireRole::permits(&roles, &UserRole::Instructor));
        assert!(RequireRole::permits(&roles, &UserRole::Admin));
        assert!(!RequireRole::permits(&roles, &UserRole::Student));
    }
}
