use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::SubmissionService;
use super::detail::require_submission;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::submissions::{entities::Submission, requests::GradeSubmissionRequest};
use crate::services::access::{current_actor, require_managed_class};
use crate::services::assignments::require_assignment;
use crate::services::error_response;

pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: String,
    req: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    match grade(service, request, &submission_id, req).await {
        Ok(submission) => {
            info!(
                "Submission {} graded: {:?}",
                submission.id, submission.grade
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Submission graded successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn grade(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: &str,
    req: GradeSubmissionRequest,
) -> Result<Submission> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    let submission = require_submission(storage.as_ref(), submission_id).await?;
    let assignment = require_assignment(storage.as_ref(), &submission.assignment_id).await?;
    require_managed_class(storage.as_ref(), &actor, &assignment.class_id).await?;

    storage
        .grade_submission(submission_id, req, Utc::now())
        .await
}
