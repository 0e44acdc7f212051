use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::SubmissionService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::submissions::{entities::Submission, requests::SubmitAssignmentRequest};
use crate::services::access::current_actor;
use crate::services::error_response;

pub async fn submit(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: String,
    req: SubmitAssignmentRequest,
) -> ActixResult<HttpResponse> {
    match create(service, request, &assignment_id, req).await {
        Ok(submission) => {
            info!(
                "Student {} submitted assignment {} ({})",
                submission.student_id, submission.assignment_id, submission.status
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                submission,
                "Assignment submitted successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn create(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: &str,
    req: SubmitAssignmentRequest,
) -> Result<Submission> {
    let actor = current_actor(request)?;
    service
        .get_storage(request)
        .submit(assignment_id, &actor.id, req, Utc::now())
        .await
}

pub async fn resubmit(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: String,
    req: SubmitAssignmentRequest,
) -> ActixResult<HttpResponse> {
    match replace(service, request, &assignment_id, req).await {
        Ok(submission) => {
            info!(
                "Student {} resubmitted assignment {} ({})",
                submission.student_id, submission.assignment_id, submission.status
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                submission,
                "Assignment resubmitted successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn replace(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: &str,
    req: SubmitAssignmentRequest,
) -> Result<Submission> {
    let actor = current_actor(request)?;
    service
        .get_storage(request)
        .resubmit(assignment_id, &actor.id, req, Utc::now())
        .await
}
