use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::classes::{entities::Enrollment, requests::EnrollStudentRequest};
use crate::services::access::{current_actor, require_managed_class};
use crate::services::error_response;

pub async fn enroll_student(
    service: &ClassService,
    request: &HttpRequest,
    class_id: String,
    enroll_data: EnrollStudentRequest,
) -> ActixResult<HttpResponse> {
    match enroll(service, request, &class_id, enroll_data).await {
        Ok(enrollment) => {
            info!(
                "Student {} enrolled in class {}",
                enrollment.student_id, enrollment.class_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                enrollment,
                "Student enrolled successfully",
            )))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn enroll(
    service: &ClassService,
    request: &HttpRequest,
    class_id: &str,
    enroll_data: EnrollStudentRequest,
) -> Result<Enrollment> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    require_managed_class(storage.as_ref(), &actor, class_id).await?;

    storage
        .enroll_student(class_id, &enroll_data.student_id)
        .await
}
