pub mod access;
pub mod assignments;
pub mod classes;
pub mod grades;
pub mod reports;
pub mod submissions;
pub mod users;

pub use assignments::AssignmentService;
pub use classes::ClassService;
pub use grades::GradeService;
pub use reports::ReportService;
pub use submissions::SubmissionService;
pub use users::UserService;

use actix_web::{HttpResponse, ResponseError};
use tracing::error;

use crate::errors::GradebookError;

/// 将业务错误转换为标准错误响应，内部错误记录日志
pub(crate) fn error_response(err: GradebookError) -> HttpResponse {
    if err.kind() == "internal_error" {
        error!("{}", err.format_simple());
    }
    err.error_response()
}
