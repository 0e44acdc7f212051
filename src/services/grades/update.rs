use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{GradeService, require_grade};
use crate::errors::Result;
use crate::models::grades::{entities::GradeRecord, requests::UpdateGradeRecordRequest};
use crate::models::ApiResponse;
use crate::services::access::{current_actor, require_managed_class};
use crate::services::error_response;

pub async fn update_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: String,
    update: UpdateGradeRecordRequest,
) -> ActixResult<HttpResponse> {
    match apply(service, request, &grade_id, update).await {
        Ok(record) => {
            info!("Grade record {} updated", record.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                record,
                "Grade record updated successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn apply(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: &str,
    update: UpdateGradeRecordRequest,
) -> Result<GradeRecord> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    let record = require_grade(storage.as_ref(), grade_id).await?;
    require_managed_class(storage.as_ref(), &actor, &record.class_id).await?;

    storage.update_grade_record(grade_id, update).await
}

pub async fn delete_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: String,
) -> ActixResult<HttpResponse> {
    match remove(service, request, &grade_id).await {
        Ok(()) => {
            info!("Grade record {} deleted", grade_id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Grade record deleted successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn remove(service: &GradeService, request: &HttpRequest, grade_id: &str) -> Result<()> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    let record = require_grade(storage.as_ref(), grade_id).await?;
    require_managed_class(storage.as_ref(), &actor, &record.class_id).await?;

    storage.delete_grade_record(grade_id).await
}
