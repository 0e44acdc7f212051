use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::errors::{GradebookError, Result};
use crate::models::ApiResponse;
use crate::models::classes::{entities::Class, requests::CreateClassRequest};
use crate::models::users::entities::{User, UserRole};
use crate::services::access::current_actor;
use crate::services::error_response;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    match create(service, request, class_data).await {
        Ok(class) => {
            info!(
                "Class {} ({}) created for instructor {}",
                class.class_name, class.id, class.instructor_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created successfully")))
        }
        Err(e) => Ok(error_response(e)),
    }
}

async fn create(
    service: &ClassService,
    request: &HttpRequest,
    class_data: CreateClassRequest,
) -> Result<Class> {
    let actor = current_actor(request)?;
    let instructor_id = resolve_instructor_id(&actor, class_data.instructor_id.as_deref())?;

    service
        .get_storage(request)
        .create_class(&instructor_id, class_data)
        .await
}

/// 确定班级的授课教师
///
/// 教师只能为自己创建班级；管理员必须指定教师。
fn resolve_instructor_id(actor: &User, requested: Option<&str>) -> Result<String> {
    match (&actor.role, requested) {
        (UserRole::Admin, Some(id)) => Ok(id.to_string()),
        (UserRole::Admin, None) => Err(GradebookError::invalid_field(
            "instructor_id",
            "Administrators must specify the class instructor",
        )),
        (UserRole::Instructor, None) => Ok(actor.id.clone()),
        (UserRole::Instructor, Some(id)) if id == actor.id => Ok(actor.id.clone()),
        (UserRole::Instructor, Some(_)) => Err(GradebookError::authorization(
            "You do not have permission to create a class for another instructor",
        )),
        (UserRole::Student, _) => Err(GradebookError::authorization(
            "You do not have permission to create a class",
        )),
    }
}
