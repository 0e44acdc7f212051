//! 输入校验
//!
//! 所有函数都返回带出错字段的 `GradebookError::Validation`。

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{GradebookError, Result};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

const MAX_TITLE_LEN: usize = 200;
const MAX_NAME_LEN: usize = 100;

/// 解析 ISO 8601 / RFC 3339 时间戳
pub fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            GradebookError::invalid_field(field, format!("Invalid timestamp '{value}': {e}"))
        })
}

/// 标题不能为空白，返回去除首尾空白后的值
pub fn validate_title(field: &str, title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(GradebookError::invalid_field(field, "must not be blank"));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(GradebookError::invalid_field(
            field,
            format!("must be at most {MAX_TITLE_LEN} characters"),
        ));
    }
    Ok(title.to_string())
}

/// 姓名、班级名等短文本
pub fn validate_name(field: &str, name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(GradebookError::invalid_field(
            field,
            format!("length must be between 1 and {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(name.to_string())
}

pub fn validate_email(email: &str) -> Result<()> {
    if !EMAIL_RE.is_match(email) {
        return Err(GradebookError::invalid_field("email", "Email format is invalid"));
    }
    Ok(())
}

/// 分值必须为正的有限数
pub fn validate_points(field: &str, points: f64) -> Result<()> {
    if !points.is_finite() || points <= 0.0 {
        return Err(GradebookError::invalid_field(
            field,
            format!("must be a finite number greater than 0, got {points}"),
        ));
    }
    Ok(())
}

/// 得分必须落在 [0, max] 内
pub fn validate_score_range(field: &str, score: f64, max: f64) -> Result<()> {
    if !score.is_finite() || score < 0.0 || score > max {
        return Err(GradebookError::invalid_field(
            field,
            format!("must be between 0 and {max}, got {score}"),
        ));
    }
    Ok(())
}

/// 提交内容：正文与附件至少提供其一，附件引用不能为空白
pub fn validate_submission_payload(content: Option<&str>, attachments: &[String]) -> Result<()> {
    if attachments.iter().any(|a| a.trim().is_empty()) {
        return Err(GradebookError::invalid_field(
            "attachments",
            "attachment references must not be blank",
        ));
    }
    let has_content = content.is_some_and(|c| !c.trim().is_empty());
    if !has_content && attachments.is_empty() {
        return Err(GradebookError::invalid_field(
            "content",
            "either content or at least one attachment is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        let dt = parse_timestamp("due_at", "2025-12-20T00:00:00Z").unwrap();
        assert_eq!(dt.timestamp(), 1766188800);

        let offset = parse_timestamp("due_at", "2025-12-20T08:00:00+08:00").unwrap();
        assert_eq!(offset, dt);

        let err = parse_timestamp("due_at", "next friday").unwrap_err();
        assert_eq!(err.field(), Some("due_at"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("title", "  Essay 1 ").unwrap(), "Essay 1");
        assert!(validate_title("title", "   ").is_err());
        assert!(validate_title("title", &"a".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_points() {
        assert!(validate_points("total_points", 100.0).is_ok());
        assert!(validate_points("total_points", 0.0).is_err());
        assert!(validate_points("total_points", -5.0).is_err());
        assert!(validate_points("total_points", f64::NAN).is_err());
        assert!(validate_points("total_points", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_score_range() {
        assert!(validate_score_range("grade", 0.0, 100.0).is_ok());
        assert!(validate_score_range("grade", 100.0, 100.0).is_ok());
        let err = validate_score_range("grade", 105.0, 100.0).unwrap_err();
        assert_eq!(err.field(), Some("grade"));
        assert!(validate_score_range("grade", -1.0, 100.0).is_err());
        assert!(validate_score_range("grade", f64::NAN, 100.0).is_err());
    }

    #[test]
    fn test_validate_submission_payload() {
        assert!(validate_submission_payload(Some("answer"), &[]).is_ok());
        assert!(validate_submission_payload(None, &["file-token".to_string()]).is_ok());
        assert!(validate_submission_payload(Some("  "), &[]).is_err());
        assert!(validate_submission_payload(None, &[]).is_err());

        let err = validate_submission_payload(Some("answer"), &[" ".to_string()]).unwrap_err();
        assert_eq!(err.field(), Some("attachments"));
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("student@school.edu").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }
}
