use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 作业状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum AssignmentStatus {
    Active,   // 进行中，可提交
    Closed,   // 已关闭，不再接受提交
    Archived, // 已归档
}

impl AssignmentStatus {
    pub const ACTIVE: &'static str = "active";
    pub const CLOSED: &'static str = "closed";
    pub const ARCHIVED: &'static str = "archived";

    /// 是否接受新的提交
    pub fn accepts_submissions(&self) -> bool {
        *self == AssignmentStatus::Active
    }
}

impl<'de> Deserialize<'de> for AssignmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AssignmentStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的作业状态: '{s}'. 支持的状态: active, closed, archived"
            ))
        })
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentStatus::Active => write!(f, "{}", AssignmentStatus::ACTIVE),
            AssignmentStatus::Closed => write!(f, "{}", AssignmentStatus::CLOSED),
            AssignmentStatus::Archived => write!(f, "{}", AssignmentStatus::ARCHIVED),
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            AssignmentStatus::ACTIVE => Ok(AssignmentStatus::Active),
            AssignmentStatus::CLOSED => Ok(AssignmentStatus::Closed),
            AssignmentStatus::ARCHIVED => Ok(AssignmentStatus::Archived),
            _ => Err(format!("Invalid assignment status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    // 唯一 ID
    pub id: String,
    // 所属班级 ID
    pub class_id: String,
    // 作业标题
    pub title: String,
    // 作业描述
    pub description: String,
    // 截止时间
    pub due_at: chrono::DateTime<chrono::Utc>,
    // 作业总分
    pub total_points: f64,
    // 作业状态
    pub status: AssignmentStatus,
    // 创建者 ID
    pub created_by: Option<String>,
    // 作业创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 作业更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 学生视角下的作业状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum StudentAssignmentStatus {
    Pending,   // 未提交
    Submitted, // 已按时提交
    Late,      // 迟交
    Graded,    // 已评分
}

/// 学生作业列表项
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct StudentAssignment {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub my_status: StudentAssignmentStatus,
    pub my_grade: Option<f64>,
}
