use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, require_assignment};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::assignments::entities::Assignment;
use crate::services::access::{current_actor, require_class_member};
use crate::services::error_response;

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: String,
) -> ActixResult<HttpResponse> {
    match load(service, request, &assignment_id).await {
        Ok(assignment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            assignment,
            "Assignment retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

async fn load(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: &str,
) -> Result<Assignment> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    let assignment = require_assignment(storage.as_ref(), assignment_id).await?;
    require_class_member(storage.as_ref(), &actor, &assignment.class_id).await?;
    Ok(assignment)
}
