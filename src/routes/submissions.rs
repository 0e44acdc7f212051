use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::submissions::requests::GradeSubmissionRequest;
use crate::models::users::entities::UserRole;
use crate::services::SubmissionService;
use crate::utils::SafeSubmissionId;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 获取提交详情
pub async fn get_submission(req: HttpRequest, path: SafeSubmissionId) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_submission(&req, path.0).await
}

// 评分
pub async fn grade_submission(
    req: HttpRequest,
    path: SafeSubmissionId,
    body: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_submission(&req, path.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_submissions_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireActor)
            // 提交者本人或班级教师可访问（业务层校验）
            .service(web::resource("/{submission_id}").route(web::get().to(get_submission)))
            .service(
                web::resource("/{submission_id}/grade")
                    .route(web::put().to(grade_submission))
                    .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
            ),
    );
}
