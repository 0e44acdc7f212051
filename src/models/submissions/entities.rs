use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 提交状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Submitted, // 按时提交
    Late,      // 迟交
    Graded,    // 已评分
}

impl SubmissionStatus {
    pub const SUBMITTED: &'static str = "submitted";
    pub const LATE: &'static str = "late";
    pub const GRADED: &'static str = "graded";

    /// 根据提交时间与截止时间确定初始状态（截止时刻本身视为按时）
    pub fn for_submission_time(
        submitted_at: chrono::DateTime<chrono::Utc>,
        due_at: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        if submitted_at <= due_at {
            SubmissionStatus::Submitted
        } else {
            SubmissionStatus::Late
        }
    }
}

impl<'de> Deserialize<'de> for SubmissionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<SubmissionStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的提交状态: '{s}'. 支持的状态: submitted, late, graded"
            ))
        })
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Submitted => write!(f, "{}", SubmissionStatus::SUBMITTED),
            SubmissionStatus::Late => write!(f, "{}", SubmissionStatus::LATE),
            SubmissionStatus::Graded => write!(f, "{}", SubmissionStatus::GRADED),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            SubmissionStatus::SUBMITTED => Ok(SubmissionStatus::Submitted),
            SubmissionStatus::LATE => Ok(SubmissionStatus::Late),
            SubmissionStatus::GRADED => Ok(SubmissionStatus::Graded),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
    // 文本内容
    pub content: Option<String>,
    // 附件引用（外部文件存储的 token / URL）
    pub attachments: Vec<String>,
    pub status: SubmissionStatus,
    // 评分，仅在 status = graded 时存在
    pub grade: Option<f64>,
    pub feedback: Option<String>,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.status == SubmissionStatus::Graded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_status_for_submission_time() {
        let due = Utc.with_ymd_and_hms(2025, 12, 20, 0, 0, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2025, 12, 19, 12, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2025, 12, 21, 0, 0, 0).unwrap();

        assert_eq!(
            SubmissionStatus::for_submission_time(early, due),
            SubmissionStatus::Submitted
        );
        assert_eq!(
            SubmissionStatus::for_submission_time(due, due),
            SubmissionStatus::Submitted
        );
        assert_eq!(
            SubmissionStatus::for_submission_time(late, due),
            SubmissionStatus::Late
        );
    }
}
