use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::HashSet;

use super::{AssignmentService, require_assignment};
use crate::errors::Result;
use crate::models::ApiResponse;
use crate::models::assignments::entities::Assignment;
use crate::models::assignments::responses::{AssignmentStatsResponse, ScoreRange, ScoreStats};
use crate::models::submissions::entities::Submission;
use crate::services::access::{current_actor, require_managed_class};
use crate::services::error_response;

/// 获取作业统计（仅班级教师或管理员）
pub async fn get_assignment_stats(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: String,
) -> ActixResult<HttpResponse> {
    match load_stats(service, request, &assignment_id).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(stats, "查询成功"))),
        Err(e) => Ok(error_response(e)),
    }
}

async fn load_stats(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: &str,
) -> Result<AssignmentStatsResponse> {
    let storage = service.get_storage(request);
    let actor = current_actor(request)?;
    let assignment = require_assignment(storage.as_ref(), assignment_id).await?;
    require_managed_class(storage.as_ref(), &actor, &assignment.class_id).await?;

    let student_ids = storage.list_class_student_ids(&assignment.class_id).await?;
    let submissions = storage.list_submissions_for_assignment(assignment_id).await?;

    Ok(compute_assignment_stats(&assignment, &student_ids, &submissions))
}

/// 根据班级学生与提交记录计算作业统计
///
/// 只统计当前仍在班级中的学生的提交。迟交按提交时间与截止时间比较判定，
/// 评分后状态变为 graded 也仍计入迟交。
pub(crate) fn compute_assignment_stats(
    assignment: &Assignment,
    student_ids: &[String],
    submissions: &[Submission],
) -> AssignmentStatsResponse {
    let enrolled: HashSet<&str> = student_ids.iter().map(String::as_str).collect();
    let counted: Vec<&Submission> = submissions
        .iter()
        .filter(|s| enrolled.contains(s.student_id.as_str()))
        .collect();

    let total_students = student_ids.len() as i64;
    let submitted_count = counted.len() as i64;
    let late_count = counted
        .iter()
        .filter(|s| s.submitted_at > assignment.due_at)
        .count() as i64;

    let scores: Vec<f64> = counted
        .iter()
        .filter(|s| s.is_graded())
        .filter_map(|s| s.grade)
        .collect();
    let graded_count = scores.len() as i64;

    // 计算分数统计
    let score_stats = if !scores.is_empty() {
        let sum: f64 = scores.iter().sum();
        let average = sum / scores.len() as f64;
        let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
        Some(ScoreStats {
            average: (average * 100.0).round() / 100.0, // 保留两位小数
            max,
            min,
        })
    } else {
        None
    };

    let score_distribution = calculate_score_distribution(&scores, assignment.total_points);

    // 计算提交率
    let submission_rate = if total_students > 0 {
        (submitted_count as f64 / total_students as f64 * 100.0 * 100.0).round() / 100.0
    } else {
        0.0
    };

    let submitted: HashSet<&str> = counted.iter().map(|s| s.student_id.as_str()).collect();
    let mut unsubmitted_students: Vec<String> = student_ids
        .iter()
        .filter(|id| !submitted.contains(id.as_str()))
        .cloned()
        .collect();
    unsubmitted_students.sort();

    AssignmentStatsResponse {
        assignment_id: assignment.id.clone(),
        total_students,
        submitted_count,
        graded_count,
        late_count,
        submission_rate,
        score_stats,
        score_distribution,
        unsubmitted_students,
    }
}

const SCORE_RANGES: [(&str, f64); 5] = [
    ("90-100", 90.0),
    ("80-89", 80.0),
    ("70-79", 70.0),
    ("60-69", 60.0),
    ("0-59", f64::NEG_INFINITY),
];

/// 计算分数分布（基于作业总分换算为百分比）
fn calculate_score_distribution(scores: &[f64], total_points: f64) -> Vec<ScoreRange> {
    if total_points <= 0.0 {
        return vec![];
    }

    let mut counts = [0i64; SCORE_RANGES.len()];
    for &score in scores {
        let percentage = (score / total_points) * 100.0;
        if let Some(idx) = SCORE_RANGES
            .iter()
            .position(|(_, lower)| percentage >= *lower)
        {
            counts[idx] += 1;
        }
    }

    SCORE_RANGES
        .iter()
        .zip(counts)
        .map(|((range, _), count)| ScoreRange {
            range: range.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentStatus;
    use crate::models::submissions::entities::SubmissionStatus;
    use chrono::{DateTime, Utc};

    fn at(ts: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc)
    }

    fn assignment() -> Assignment {
        Assignment {
            id: "hw1".to_string(),
            class_id: "class-a".to_string(),
            title: "Homework 1".to_string(),
            description: String::new(),
            due_at: at("2025-12-20T00:00:00Z"),
            total_points: 100.0,
            status: AssignmentStatus::Active,
            created_by: Some("teacher".to_string()),
            created_at: at("2025-12-01T00:00:00Z"),
            updated_at: at("2025-12-01T00:00:00Z"),
        }
    }

    fn submission(student_id: &str, submitted_at: &str, grade: Option<f64>) -> Submission {
        let submitted_at = at(submitted_at);
        let status = match grade {
            Some(_) => SubmissionStatus::Graded,
            None => SubmissionStatus::for_submission_time(submitted_at, assignment().due_at),
        };
        Submission {
            id: format!("sub-{student_id}"),
            assignment_id: "hw1".to_string(),
            student_id: student_id.to_string(),
            content: Some("answer".to_string()),
            attachments: vec![],
            status,
            grade,
            feedback: None,
            submitted_at,
            graded_at: grade.map(|_| submitted_at),
            updated_at: submitted_at,
        }
    }

    fn students(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_stats_counts_and_rates() {
        let submissions = vec![
            submission("alice", "2025-12-19T12:00:00Z", Some(95.0)),
            submission("bob", "2025-12-21T00:00:00Z", Some(72.0)),
            submission("carol", "2025-12-19T08:00:00Z", None),
        ];
        let stats = compute_assignment_stats(
            &assignment(),
            &students(&["alice", "bob", "carol", "dave"]),
            &submissions,
        );

        assert_eq!(stats.total_students, 4);
        assert_eq!(stats.submitted_count, 3);
        assert_eq!(stats.graded_count, 2);
        // 评分后的迟交仍计入
        assert_eq!(stats.late_count, 1);
        assert_eq!(stats.submission_rate, 75.0);
        assert_eq!(
            stats.score_stats,
            Some(ScoreStats {
                average: 83.5,
                max: 95.0,
                min: 72.0,
            })
        );
        assert_eq!(stats.unsubmitted_students, vec!["dave".to_string()]);
    }

    #[test]
    fn test_stats_without_students_or_grades() {
        let stats = compute_assignment_stats(&assignment(), &[], &[]);
        assert_eq!(stats.submission_rate, 0.0);
        assert!(stats.score_stats.is_none());
        assert!(stats.score_distribution.iter().all(|r| r.count == 0));
        assert!(stats.unsubmitted_students.is_empty());
    }

    #[test]
    fn test_stats_ignore_unenrolled_submissions() {
        let submissions = vec![submission("ghost", "2025-12-19T12:00:00Z", Some(50.0))];
        let stats = compute_assignment_stats(&assignment(), &students(&["alice"]), &submissions);
        assert_eq!(stats.submitted_count, 0);
        assert_eq!(stats.graded_count, 0);
        assert_eq!(stats.unsubmitted_students, vec!["alice".to_string()]);
    }

    #[test]
    fn test_score_distribution_buckets() {
        let distribution =
            calculate_score_distribution(&[100.0, 90.0, 89.9, 75.0, 60.0, 59.9, 0.0], 100.0);
        let counts: Vec<(String, i64)> = distribution
            .into_iter()
            .map(|r| (r.range, r.count))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("90-100".to_string(), 2),
                ("80-89".to_string(), 1),
                ("70-79".to_string(), 1),
                ("60-69".to_string(), 1),
                ("0-59".to_string(), 2),
            ]
        );
    }

    #[test]
    fn test_score_distribution_scales_by_total_points() {
        let distribution = calculate_score_distribution(&[45.0], 50.0);
        assert_eq!(distribution[0].count, 1);
        assert!(calculate_score_distribution(&[1.0], 0.0).is_empty());
    }
}
