use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::ReportService;
use super::aggregate;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::reports::responses::OverallReport;
use crate::services::access::{current_actor, ensure_can_view_student};
use crate::services::error_response;

pub async fn get_overall_report(
    service: &ReportService,
    request: &HttpRequest,
    student_id: String,
) -> ActixResult<HttpResponse> {
    match load(service, request, &student_id).await {
        Ok(report) => {
            debug!(
                "Overall report for {}: {} classes, average {:?}",
                report.student_id,
                report.classes.len(),
                report.average
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(report, "查询成功")))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn load(
    service: &ReportService,
    request: &HttpRequest,
    student_id: &str,
) -> Result<OverallReport> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    ensure_can_view_student(storage.as_ref(), &actor, student_id).await?;

    aggregate::overall_report(storage.as_ref(), student_id).await
}
