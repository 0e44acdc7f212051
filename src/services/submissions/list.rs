use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::SubmissionService;
use crate::errors::Result;
use crate::models::submissions::{entities::Submission, requests::SubmissionListParams};
use crate::models::{ApiResponse, PaginatedResponse};
use crate::services::access::{current_actor, ensure_can_view_student, require_managed_class};
use crate::services::assignments::require_assignment;
use crate::services::error_response;

pub async fn list_assignment_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: String,
    query: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    match load_for_assignment(service, request, &assignment_id, query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "查询成功"))),
        Err(e) => Ok(error_response(e)),
    }
}

async fn load_for_assignment(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: &str,
    query: SubmissionListParams,
) -> Result<PaginatedResponse<Submission>> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    let assignment = require_assignment(storage.as_ref(), assignment_id).await?;
    require_managed_class(storage.as_ref(), &actor, &assignment.class_id).await?;

    let submissions = storage
        .list_submissions_for_assignment(assignment_id)
        .await?
        .into_iter()
        .filter(|s| query.status.is_none_or(|status| s.status == status))
        .collect();

    Ok(PaginatedResponse::from_sorted(submissions, &query.pagination))
}

pub async fn list_student_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    student_id: String,
    query: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    match load_for_student(service, request, &student_id, query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "查询成功"))),
        Err(e) => Ok(error_response(e)),
    }
}

async fn load_for_student(
    service: &SubmissionService,
    request: &HttpRequest,
    student_id: &str,
    query: SubmissionListParams,
) -> Result<PaginatedResponse<Submission>> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    ensure_can_view_student(storage.as_ref(), &actor, student_id).await?;

    let mut submissions = storage.list_submissions_for_student(student_id).await?;

    // 教师只能看到自己班级作业的提交
    if actor.id != student_id && !actor.is_admin() {
        let managed_classes: HashSet<String> = storage
            .list_student_classes(student_id)
            .await?
            .into_iter()
            .filter(|c| c.instructor_id == actor.id)
            .map(|c| c.id)
            .collect();
        let visible: HashSet<String> = storage
            .list_assignments_for_student(student_id)
            .await?
            .into_iter()
            .filter(|a| managed_classes.contains(&a.class_id))
            .map(|a| a.id)
            .collect();
        submissions.retain(|s| visible.contains(&s.assignment_id));
    }

    let submissions = submissions
        .into_iter()
        .filter(|s| query.status.is_none_or(|status| s.status == status))
        .collect();

    Ok(PaginatedResponse::from_sorted(submissions, &query.pagination))
}
