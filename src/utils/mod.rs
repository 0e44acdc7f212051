pub mod extractor;
pub mod parameter_error_handler;
pub mod validate;

pub use extractor::{
    SafeAssignmentId, SafeClassId, SafeGradeId, SafeStudentId, SafeSubmissionId, SafeUserId,
};
pub use parameter_error_handler::json_config;
pub use parameter_error_handler::query_error_handler;
