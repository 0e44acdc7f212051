//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码、类型名称、错误种类与字段级详情。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::models::common::response::ErrorDetail;
use crate::models::{ApiResponse, ErrorCode};

/// 错误载荷：消息 + 可选的出错字段
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPayload {
    pub message: String,
    pub field: Option<String>,
}

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - kind() 方法 - 返回对外暴露的错误种类
/// - message() / field() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_gradebook_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $kind:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum GradebookError {
            $($variant(ErrorPayload),)*
        }

        impl GradebookError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误种类（响应体中的 kind 字段）
            pub fn kind(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $kind,)*
                }
            }

            fn payload(&self) -> &ErrorPayload {
                match self {
                    $(GradebookError::$variant(p) => p,)*
                }
            }

            fn payload_mut(&mut self) -> &mut ErrorPayload {
                match self {
                    $(GradebookError::$variant(p) => p,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl GradebookError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GradebookError::$variant(ErrorPayload {
                            message: msg.into(),
                            field: None,
                        })
                    }
                )*
            }
        }
    };
}

define_gradebook_errors! {
    DatabaseConfig("E001", "Database Configuration Error", "internal_error"),
    DatabaseConnection("E002", "Database Connection Error", "internal_error"),
    DatabaseOperation("E003", "Database Operation Error", "internal_error"),
    FileOperation("E004", "File Operation Error", "internal_error"),
    Serialization("E005", "Serialization Error", "internal_error"),
    DateParse("E006", "Date Parse Error", "validation_error"),
    Validation("E007", "Validation Error", "validation_error"),
    NotFound("E008", "Resource Not Found", "not_found_error"),
    Conflict("E009", "Conflict Error", "conflict_error"),
    Authentication("E010", "Authentication Error", "authorization_error"),
    Authorization("E011", "Authorization Error", "authorization_error"),
}

impl GradebookError {
    /// 获取错误详情
    pub fn message(&self) -> &str {
        &self.payload().message
    }

    /// 获取出错字段（仅校验类错误会携带）
    pub fn field(&self) -> Option<&str> {
        self.payload().field.as_deref()
    }

    /// 附加出错字段
    pub fn with_field<T: Into<String>>(mut self, field: T) -> Self {
        self.payload_mut().field = Some(field.into());
        self
    }

    /// 字段校验失败的快捷构造
    pub fn invalid_field<F: Into<String>, M: Into<String>>(field: F, msg: M) -> Self {
        Self::validation(msg).with_field(field)
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == "validation_error"
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, GradebookError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, GradebookError::Conflict(_))
    }

    /// 对应的业务错误码
    pub fn error_code(&self) -> ErrorCode {
        match self {
            GradebookError::Validation(_) | GradebookError::DateParse(_) => {
                ErrorCode::ValidationFailed
            }
            GradebookError::NotFound(_) => ErrorCode::NotFound,
            GradebookError::Conflict(_) => ErrorCode::Conflict,
            GradebookError::Authentication(_) => ErrorCode::Unauthorized,
            GradebookError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        match self.field() {
            Some(field) => format!("{} ({}): {}", self.error_type(), field, self.message()),
            None => format!("{}: {}", self.error_type(), self.message()),
        }
    }
}

impl fmt::Display for GradebookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GradebookError {}

impl ResponseError for GradebookError {
    fn status_code(&self) -> StatusCode {
        match self {
            GradebookError::Validation(_) | GradebookError::DateParse(_) => {
                StatusCode::BAD_REQUEST
            }
            GradebookError::NotFound(_) => StatusCode::NOT_FOUND,
            GradebookError::Conflict(_) => StatusCode::CONFLICT,
            GradebookError::Authentication(_) => StatusCode::UNAUTHORIZED,
            GradebookError::Authorization(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = ErrorDetail {
            kind: self.kind().to_string(),
            field: self.field().map(str::to_string),
        };
        HttpResponse::build(self.status_code()).json(ApiResponse::error(
            self.error_code(),
            detail,
            self.message(),
        ))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GradebookError {
    fn from(err: sea_orm::DbErr) -> Self {
        // 唯一约束冲突对调用方而言是业务冲突，而非数据库故障
        if let Some(sea_orm::SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return GradebookError::conflict(detail);
        }
        GradebookError::database_operation(err.to_string())
    }
}

impl From<std::io::Error> for GradebookError {
    fn from(err: std::io::Error) -> Self {
        GradebookError::file_operation(err.to_string())
    }
}

impl From<serde_json::Error> for GradebookError {
    fn from(err: serde_json::Error) -> Self {
        GradebookError::serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for GradebookError {
    fn from(err: chrono::ParseError) -> Self {
        GradebookError::date_parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GradebookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GradebookError::database_config("test").code(), "E001");
        assert_eq!(GradebookError::validation("test").code(), "E007");
        assert_eq!(GradebookError::not_found("test").code(), "E008");
        assert_eq!(GradebookError::conflict("test").code(), "E009");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(GradebookError::validation("x").kind(), "validation_error");
        assert_eq!(GradebookError::date_parse("x").kind(), "validation_error");
        assert_eq!(GradebookError::not_found("x").kind(), "not_found_error");
        assert_eq!(GradebookError::conflict("x").kind(), "conflict_error");
        assert_eq!(
            GradebookError::database_operation("x").kind(),
            "internal_error"
        );
    }

    #[test]
    fn test_error_field() {
        let err = GradebookError::invalid_field("total_points", "must be greater than 0");
        assert_eq!(err.field(), Some("total_points"));
        assert_eq!(err.message(), "must be greater than 0");
        assert!(err.is_validation());
        assert!(GradebookError::not_found("x").field().is_none());
    }

    #[test]
    fn test_format_simple() {
        let err = GradebookError::invalid_field("due_at", "Invalid timestamp");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("due_at"));
        assert!(formatted.contains("Invalid timestamp"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            GradebookError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GradebookError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GradebookError::conflict("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            GradebookError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
