//! 业务数据模型
//!
//! 按资源划分：每个资源下 `entities` 为业务实体，`requests` 为入参，
//! `responses` 为对外响应结构。

pub mod assignments;
pub mod classes;
pub mod common;
pub mod grades;
pub mod reports;
pub mod submissions;
pub mod users;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    InternalServerError = 1006,
}
