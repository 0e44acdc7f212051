use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, require_grade};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::grades::entities::GradeRecord;
use crate::services::access::{current_actor, ensure_can_view_student_in_class};
use crate::services::error_response;

pub async fn get_grade(
    service: &GradeService,
    request: &HttpRequest,
    grade_id: String,
) -> ActixResult<HttpResponse> {
    match load(service, request, &grade_id).await {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            record,
            "Grade record retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

async fn load(service: &GradeService, request: &HttpRequest, grade_id: &str) -> Result<GradeRecord> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    let record = require_grade(storage.as_ref(), grade_id).await?;
    ensure_can_view_student_in_class(
        storage.as_ref(),
        &actor,
        &record.student_id,
        &record.class_id,
    )
    .await?;
    Ok(record)
}
