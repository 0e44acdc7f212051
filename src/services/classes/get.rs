use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::errors::Result;
use crate::models::assignments::{entities::Assignment, requests::AssignmentListParams};
use crate::models::classes::entities::ClassDetail;
use crate::models::{ApiResponse, PaginatedResponse};
use crate::services::access::{current_actor, require_class_member};
use crate::services::error_response;

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: String,
) -> ActixResult<HttpResponse> {
    match load_detail(service, request, &class_id).await {
        Ok(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            detail,
            "Class information retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

async fn load_detail(
    service: &ClassService,
    request: &HttpRequest,
    class_id: &str,
) -> Result<ClassDetail> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    let class = require_class_member(storage.as_ref(), &actor, class_id).await?;
    let student_ids = storage.list_class_student_ids(class_id).await?;
    Ok(ClassDetail { class, student_ids })
}

pub async fn list_class_assignments(
    service: &ClassService,
    request: &HttpRequest,
    class_id: String,
    query: AssignmentListParams,
) -> ActixResult<HttpResponse> {
    match load_assignments(service, request, &class_id, query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page, "查询成功"))),
        Err(e) => Ok(error_response(e)),
    }
}

async fn load_assignments(
    service: &ClassService,
    request: &HttpRequest,
    class_id: &str,
    query: AssignmentListParams,
) -> Result<PaginatedResponse<Assignment>> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    require_class_member(storage.as_ref(), &actor, class_id).await?;

    let assignments: Vec<Assignment> = storage
        .list_assignments_for_class(class_id)
        .await?
        .into_iter()
        .filter(|a| query.status.is_none_or(|status| a.status == status))
        .collect();

    Ok(PaginatedResponse::from_sorted(assignments, &query.pagination))
}
