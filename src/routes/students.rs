use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::StudentAssignmentListParams;
use crate::models::submissions::requests::SubmissionListParams;
use crate::services::{AssignmentService, ReportService, SubmissionService};
use crate::utils::SafeStudentId;

// 懒加载的全局服务实例
static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);
static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

// 学生的作业列表（含个人提交状态）
pub async fn list_assignments(
    req: HttpRequest,
    path: SafeStudentId,
    query: web::Query<StudentAssignmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_student_assignments(&req, path.0, query.into_inner())
        .await
}

// 学生的提交列表
pub async fn list_submissions(
    req: HttpRequest,
    path: SafeStudentId,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_student_submissions(&req, path.0, query.into_inner())
        .await
}

// 学生的总成绩报告
pub async fn get_report(req: HttpRequest, path: SafeStudentId) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.get_overall_report(&req, path.0).await
}

// 配置路由
//
// 学生本人、其班级教师或管理员可访问，均在业务层校验。
pub fn configure_students_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireActor)
            .service(web::resource("/{student_id}/assignments").route(web::get().to(list_assignments)))
            .service(web::resource("/{student_id}/submissions").route(web::get().to(list_submissions)))
            .service(web::resource("/{student_id}/report").route(web::get().to(get_report))),
    );
}
