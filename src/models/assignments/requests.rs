use crate::models::assignments::entities::{AssignmentStatus, StudentAssignmentStatus};
use crate::models::common::pagination::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

/// 创建作业请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub class_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_at: String, // ISO 8601 格式，如 "2025-12-20T00:00:00Z"
    pub total_points: f64,
}

/// 更新作业请求（仅合并提供的字段）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<String>, // ISO 8601 格式
    pub total_points: Option<f64>,
    pub status: Option<AssignmentStatus>,
}

/// 班级作业列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<AssignmentStatus>,
}

/// 学生作业列表查询参数（HTTP 请求）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct StudentAssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    /// 作业状态过滤（active/closed/archived）
    pub status: Option<AssignmentStatus>,
    /// 学生视角状态过滤（pending/submitted/late/graded）
    pub my_status: Option<StudentAssignmentStatus>,
}
