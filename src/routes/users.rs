use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
use crate::services::UserService;
use crate::utils::SafeUserId;

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

// HTTP处理程序
pub async fn create_user(
    req: HttpRequest,
    user_data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .create_user(&req, user_data.into_inner())
        .await
}

pub async fn get_user(req: HttpRequest, path: SafeUserId) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(&req, path.0).await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(middlewares::RequireActor)
            .service(
                web::resource("")
                    // 登记用户 - 仅管理员
                    .route(
                        web::post()
                            .to(create_user)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            // 学生只能查看自己，业务层校验
            .service(web::resource("/{user_id}").route(web::get().to(get_user))),
    );
}
