use serde::Deserialize;
use ts_rs::TS;

use super::entities::GradeCategory;

/// 创建成绩记录请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct CreateGradeRecordRequest {
    pub student_id: String,
    pub class_id: String,
    pub category: GradeCategory,
    pub title: String,
    pub score: f64,
    pub max_score: f64,
    pub comments: Option<String>,
}

/// 更新成绩记录请求（合并后整体校验 score/max_score）
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct UpdateGradeRecordRequest {
    pub category: Option<GradeCategory>,
    pub title: Option<String>,
    pub score: Option<f64>,
    pub max_score: Option<f64>,
    /// 缺省时保留原评语，传入空白字符串时清除
    pub comments: Option<String>,
}
