use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, require_assignment};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::assignments::responses::AssignmentDeletion;
use crate::services::access::{current_actor, require_managed_class};
use crate::services::error_response;

pub async fn delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: String,
) -> ActixResult<HttpResponse> {
    match delete(service, request, &assignment_id).await {
        Ok(deletion) => {
            info!(
                "Assignment {} deleted with {} submissions",
                deletion.assignment_id, deletion.removed_submissions
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                deletion,
                "Assignment deleted successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn delete(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: &str,
) -> Result<AssignmentDeletion> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    let assignment = require_assignment(storage.as_ref(), assignment_id).await?;
    require_managed_class(storage.as_ref(), &actor, &assignment.class_id).await?;

    storage.delete_assignment(assignment_id).await
}
