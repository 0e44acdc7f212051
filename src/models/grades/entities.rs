use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 手动成绩类别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub enum GradeCategory {
    Quiz,
    Exam,
    Participation,
    Homework,
    Project,
    Other,
}

impl std::fmt::Display for GradeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GradeCategory::Quiz => "quiz",
            GradeCategory::Exam => "exam",
            GradeCategory::Participation => "participation",
            GradeCategory::Homework => "homework",
            GradeCategory::Project => "project",
            GradeCategory::Other => "other",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for GradeCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quiz" => Ok(GradeCategory::Quiz),
            "exam" => Ok(GradeCategory::Exam),
            "participation" => Ok(GradeCategory::Participation),
            "homework" => Ok(GradeCategory::Homework),
            "project" => Ok(GradeCategory::Project),
            "other" => Ok(GradeCategory::Other),
            _ => Err(format!("Invalid grade category: {s}")),
        }
    }
}

/// 手动录入的成绩记录（与正式作业无关）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeRecord {
    pub id: String,
    pub student_id: String,
    pub class_id: String,
    pub category: GradeCategory,
    pub title: String,
    pub score: f64,
    pub max_score: f64,
    pub comments: Option<String>,
    pub created_by: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
