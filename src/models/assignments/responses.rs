use serde::Serialize;
use ts_rs::TS;

/// 删除作业的结果
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentDeletion {
    pub assignment_id: String,
    // 随作业一并删除的提交数
    pub removed_submissions: u64,
}

/// 作业统计响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentStatsResponse {
    pub assignment_id: String,
    pub total_students: i64,
    pub submitted_count: i64,
    pub graded_count: i64,
    pub late_count: i64,
    pub submission_rate: f64,
    pub score_stats: Option<ScoreStats>,
    pub score_distribution: Vec<ScoreRange>,
    pub unsubmitted_students: Vec<String>,
}

/// 分数统计
#[derive(Debug, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ScoreStats {
    pub average: f64,
    pub max: f64,
    pub min: f64,
}

/// 分数区间
#[derive(Debug, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct ScoreRange {
    pub range: String,
    pub count: i64,
}
