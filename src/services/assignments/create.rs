use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssignmentService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use crate::services::access::{current_actor, require_managed_class};
use crate::services::error_response;

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    req: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    match create(service, request, req).await {
        Ok(assignment) => {
            info!(
                "Assignment {} created in class {}",
                assignment.id, assignment.class_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                assignment,
                "Assignment created successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn create(
    service: &AssignmentService,
    request: &HttpRequest,
    req: CreateAssignmentRequest,
) -> Result<Assignment> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    require_managed_class(storage.as_ref(), &actor, &req.class_id).await?;

    storage.create_assignment(Some(&actor.id), req).await
}
