use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use super::aggregate;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::reports::responses::ClassReport;
use crate::services::access::{current_actor, ensure_can_view_student_in_class};
use crate::services::error_response;

pub async fn get_class_report(
    service: &ReportService,
    request: &HttpRequest,
    class_id: String,
    student_id: String,
) -> ActixResult<HttpResponse> {
    match load(service, request, &class_id, &student_id).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report, "查询成功"))),
        Err(e) => Ok(error_response(e)),
    }
}

async fn load(
    service: &ReportService,
    request: &HttpRequest,
    class_id: &str,
    student_id: &str,
) -> Result<ClassReport> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    ensure_can_view_student_in_class(storage.as_ref(), &actor, student_id, class_id).await?;

    aggregate::class_report(storage.as_ref(), student_id, class_id).await
}
