use serde::Serialize;
use ts_rs::TS;

use crate::models::grades::entities::GradeCategory;

/// 成绩条目来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub enum ReportItemSource {
    Assignment, // 已评分的作业提交
    Manual,     // 手动成绩记录
}

/// 成绩单中的一条记录
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ReportItem {
    pub source: ReportItemSource,
    // 提交 ID 或成绩记录 ID
    pub reference_id: String,
    pub title: String,
    pub category: Option<GradeCategory>,
    pub score: f64,
    pub max_score: f64,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

/// 单个班级的成绩报告
///
/// `average` 为 `None` 表示尚无已评分内容，序列化为 `null`。
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ClassReport {
    pub student_id: String,
    pub class_id: String,
    pub class_name: String,
    pub items: Vec<ReportItem>,
    pub total_score: f64,
    pub total_max_score: f64,
    pub average: Option<f64>,
}

/// 学生的总成绩报告（按分值加权）
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct OverallReport {
    pub student_id: String,
    pub classes: Vec<ClassReport>,
    pub total_score: f64,
    pub total_max_score: f64,
    pub average: Option<f64>,
}
