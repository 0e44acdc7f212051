use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradeService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::grades::{entities::GradeRecord, requests::CreateGradeRecordRequest};
use crate::services::access::{current_actor, require_managed_class};
use crate::services::error_response;

pub async fn create_grade(
    service: &GradeService,
    request: &HttpRequest,
    req: CreateGradeRecordRequest,
) -> ActixResult<HttpResponse> {
    match create(service, request, req).await {
        Ok(record) => {
            info!(
                "Grade record {} ({}) created for student {} in class {}",
                record.id, record.category, record.student_id, record.class_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                record,
                "Grade record created successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn create(
    service: &GradeService,
    request: &HttpRequest,
    req: CreateGradeRecordRequest,
) -> Result<GradeRecord> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    require_managed_class(storage.as_ref(), &actor, &req.class_id).await?;

    storage.create_grade_record(Some(&actor.id), req).await
}
