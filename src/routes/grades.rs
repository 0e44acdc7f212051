use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::{CreateGradeRecordRequest, UpdateGradeRecordRequest};
use crate::models::users::entities::UserRole;
use crate::services::GradeService;
use crate::utils::SafeGradeId;

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

// 录入成绩
pub async fn create_grade(
    req: HttpRequest,
    body: web::Json<CreateGradeRecordRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.create_grade(&req, body.into_inner()).await
}

pub async fn get_grade(req: HttpRequest, path: SafeGradeId) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_grade(&req, path.0).await
}

pub async fn update_grade(
    req: HttpRequest,
    path: SafeGradeId,
    body: web::Json<UpdateGradeRecordRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .update_grade(&req, path.0, body.into_inner())
        .await
}

pub async fn delete_grade(req: HttpRequest, path: SafeGradeId) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.delete_grade(&req, path.0).await
}

// 配置路由
pub fn configure_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireActor)
            .service(
                web::resource("")
                    // 录入成绩 - 仅教师和管理员
                    .route(
                        web::post()
                            .to(create_grade)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{grade_id}")
                    // 成绩详情 - 学生本人或班级教师（业务层校验）
                    .route(web::get().to(get_grade))
                    .route(
                        web::put()
                            .to(update_grade)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_grade)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            ),
    );
}
