use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, require_assignment};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::assignments::{entities::Assignment, requests::UpdateAssignmentRequest};
use crate::services::access::{current_actor, require_managed_class};
use crate::services::error_response;

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: String,
    update: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    match apply(service, request, &assignment_id, update).await {
        Ok(assignment) => {
            info!("Assignment {} updated", assignment.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                assignment,
                "Assignment updated successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn apply(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: &str,
    update: UpdateAssignmentRequest,
) -> Result<Assignment> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    let assignment = require_assignment(storage.as_ref(), assignment_id).await?;
    require_managed_class(storage.as_ref(), &actor, &assignment.class_id).await?;

    storage.update_assignment(assignment_id, update).await
}
