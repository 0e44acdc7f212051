use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::errors::{GradebookError, Result};
use crate::models::ApiResponse;
use crate::models::users::entities::User;
use crate::services::access::current_actor;
use crate::services::error_response;

pub async fn get_user(
    service: &UserService,
    request: &HttpRequest,
    user_id: String,
) -> ActixResult<HttpResponse> {
    match load_user(service, request, &user_id).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            user,
            "User information retrieved successfully",
        ))),
        Err(e) => Ok(error_response(e)),
    }
}

async fn load_user(service: &UserService, request: &HttpRequest, user_id: &str) -> Result<User> {
    let actor = current_actor(request)?;
    // 学生只能查看自己
    if actor.is_student() && actor.id != user_id {
        return Err(GradebookError::authorization(
            "Students can only view their own profile",
        ));
    }

    service
        .get_storage(request)
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| GradebookError::not_found(format!("User not found: {user_id}")))
}
