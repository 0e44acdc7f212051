use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::errors::{GradebookError, Result};
use crate::models::ApiResponse;
use crate::models::submissions::entities::Submission;
use crate::services::access::{current_actor, require_managed_class};
use crate::services::assignments::require_assignment;
use crate::services::error_response;
use crate::storage::Storage;

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: String,
) -> ActixResult<HttpResponse> {
    match load(service, request, &submission_id).await {
        Ok(submission) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            submission,
            "Submission retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

async fn load(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: &str,
) -> Result<Submission> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    let submission = require_submission(storage.as_ref(), submission_id).await?;

    // 学生本人直接放行，其余需为班级管理者
    if submission.student_id != actor.id {
        let assignment = require_assignment(storage.as_ref(), &submission.assignment_id).await?;
        require_managed_class(storage.as_ref(), &actor, &assignment.class_id).await?;
    }
    Ok(submission)
}

/// 加载提交，不存在时返回 NotFound
pub(crate) async fn require_submission(
    storage: &dyn Storage,
    submission_id: &str,
) -> Result<Submission> {
    storage
        .get_submission_by_id(submission_id)
        .await?
        .ok_or_else(|| GradebookError::not_found(format!("Submission not found: {submission_id}")))
}
