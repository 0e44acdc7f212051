use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::grades::entities::GradeRecord;
use crate::services::access::{current_actor, ensure_can_view_student_in_class};
use crate::services::error_response;

pub async fn list_student_grades(
    service: &GradeService,
    request: &HttpRequest,
    class_id: String,
    student_id: String,
) -> ActixResult<HttpResponse> {
    match load(service, request, &class_id, &student_id).await {
        Ok(records) => Ok(HttpResponse::Ok().json(ApiResponse::success(records, "查询成功"))),
        Err(e) => Ok(error_response(e)),
    }
}

async fn load(
    service: &GradeService,
    request: &HttpRequest,
    class_id: &str,
    student_id: &str,
) -> Result<Vec<GradeRecord>> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    ensure_can_view_student_in_class(storage.as_ref(), &actor, student_id, class_id).await?;

    storage
        .list_grade_records_for_student_in_class(student_id, class_id)
        .await
}
