//! 路径参数提取器
//!
//! 所有资源 ID 都是不透明字符串，进入业务层前统一校验格式。

use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::{Ready, ready};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::GradebookError;

static PATH_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("Invalid path id regex"));

/// 校验 ID 格式：1-64 位字母、数字、下划线或连字符
pub fn is_valid_id(id: &str) -> bool {
    PATH_ID_RE.is_match(id)
}

fn extract_path_id(req: &HttpRequest, name: &str) -> Result<String, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    if is_valid_id(raw) {
        Ok(raw.to_string())
    } else {
        Err(GradebookError::invalid_field(name, format!("Invalid {name}: '{raw}'")).into())
    }
}

macro_rules! define_safe_path_id {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone)]
            pub struct $name(pub String);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(extract_path_id(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_path_id! {
    SafeUserId => "user_id",
    SafeClassId => "class_id",
    SafeStudentId => "student_id",
    SafeAssignmentId => "assignment_id",
    SafeSubmissionId => "submission_id",
    SafeGradeId => "grade_id",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert!(is_valid_id("admin"));
        assert!(is_valid_id("3f2b8c1e-8d4a-4f7e-9a51-0c2d1e6b7a90"));
        assert!(is_valid_id("class_A-1"));
    }

    #[test]
    fn test_invalid_ids() {
        assert!(!is_valid_id(""));
        assert!(!is_valid_id("../etc/passwd"));
        assert!(!is_valid_id("a b"));
        assert!(!is_valid_id(&"x".repeat(65)));
    }
}
