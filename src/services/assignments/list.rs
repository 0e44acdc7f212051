use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashMap;

use super::AssignmentService;
use crate::errors::Result;
use crate::models::assignments::entities::{
    Assignment, StudentAssignment, StudentAssignmentStatus,
};
use crate::models::assignments::requests::StudentAssignmentListParams;
use crate::models::submissions::entities::{Submission, SubmissionStatus};
use crate::models::{ApiResponse, PaginatedResponse};
use crate::services::access::{current_actor, ensure_can_view_student};
use crate::services::error_response;

pub async fn list_student_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    student_id: String,
    query: StudentAssignmentListParams,
) -> ActixResult<HttpResponse> {
    match load(service, request, &student_id, query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "查询成功"))),
        Err(e) => Ok(error_response(e)),
    }
}

async fn load(
    service: &AssignmentService,
    request: &HttpRequest,
    student_id: &str,
    query: StudentAssignmentListParams,
) -> Result<PaginatedResponse<StudentAssignment>> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    ensure_can_view_student(storage.as_ref(), &actor, student_id).await?;

    let assignments = storage.list_assignments_for_student(student_id).await?;
    let submissions = storage.list_submissions_for_student(student_id).await?;

    let items: Vec<StudentAssignment> = student_view(assignments, &submissions)
        .into_iter()
        .filter(|item| query.status.is_none_or(|s| item.assignment.status == s))
        .filter(|item| query.my_status.is_none_or(|s| item.my_status == s))
        .collect();

    Ok(PaginatedResponse::from_sorted(items, &query.pagination))
}

/// 为每个作业附上该学生的提交状态与得分，保持作业原有顺序
pub(crate) fn student_view(
    assignments: Vec<Assignment>,
    submissions: &[Submission],
) -> Vec<StudentAssignment> {
    let by_assignment: HashMap<&str, &Submission> = submissions
        .iter()
        .map(|s| (s.assignment_id.as_str(), s))
        .collect();

    assignments
        .into_iter()
        .map(|assignment| {
            let submission = by_assignment.get(assignment.id.as_str()).copied();
            let my_status = match submission.map(|s| s.status) {
                None => StudentAssignmentStatus::Pending,
                Some(SubmissionStatus::Submitted) => StudentAssignmentStatus::Submitted,
                Some(SubmissionStatus::Late) => StudentAssignmentStatus::Late,
                Some(SubmissionStatus::Graded) => StudentAssignmentStatus::Graded,
            };
            let my_grade = submission.filter(|s| s.is_graded()).and_then(|s| s.grade);
            StudentAssignment {
                assignment,
                my_status,
                my_grade,
            }
        })
        .collect()
}
