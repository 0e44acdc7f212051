use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest};
use crate::models::submissions::requests::{SubmissionListParams, SubmitAssignmentRequest};
use crate::models::users::entities::UserRole;
use crate::services::{AssignmentService, SubmissionService};
use crate::utils::SafeAssignmentId;

// 懒加载的全局服务实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

// 布置作业
pub async fn create_assignment(
    req: HttpRequest,
    body: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, body.into_inner())
        .await
}

// 获取作业详情
pub async fn get_assignment(req: HttpRequest, path: SafeAssignmentId) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(&req, path.0).await
}

// 更新作业
pub async fn update_assignment(
    req: HttpRequest,
    path: SafeAssignmentId,
    body: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, path.0, body.into_inner())
        .await
}

// 删除作业（连同提交）
pub async fn delete_assignment(req: HttpRequest, path: SafeAssignmentId) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.delete_assignment(&req, path.0).await
}

// 获取作业统计
pub async fn get_assignment_stats(
    req: HttpRequest,
    path: SafeAssignmentId,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment_stats(&req, path.0).await
}

// 作业的提交列表
pub async fn list_submissions(
    req: HttpRequest,
    path: SafeAssignmentId,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_assignment_submissions(&req, path.0, query.into_inner())
        .await
}

// 提交作业
pub async fn submit(
    req: HttpRequest,
    path: SafeAssignmentId,
    body: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .submit(&req, path.0, body.into_inner())
        .await
}

// 重新提交
pub async fn resubmit(
    req: HttpRequest,
    path: SafeAssignmentId,
    body: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .resubmit(&req, path.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_assignments_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireActor)
            .service(
                web::resource("")
                    // 布置作业 - 仅教师和管理员
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{assignment_id}")
                    // 作业详情 - 班级成员可访问（业务层校验）
                    .route(web::get().to(get_assignment))
                    // 更新作业 - 仅教师和管理员
                    .route(
                        web::put()
                            .to(update_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    )
                    // 删除作业 - 仅教师和管理员
                    .route(
                        web::delete()
                            .to(delete_assignment)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{assignment_id}/stats")
                    .route(web::get().to(get_assignment_stats))
                    .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
            )
            .service(
                web::resource("/{assignment_id}/submissions")
                    // 提交列表 - 仅教师和管理员
                    .route(
                        web::get()
                            .to(list_submissions)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    )
                    // 提交作业 - 仅学生
                    .route(
                        web::post()
                            .to(submit)
                            .wrap(middlewares::RequireRole::new(&UserRole::Student)),
                    ),
            )
            .service(
                web::resource("/{assignment_id}/submissions/my")
                    .route(web::put().to(resubmit))
                    .wrap(middlewares::RequireRole::new(&UserRole::Student)),
            ),
    );
}
