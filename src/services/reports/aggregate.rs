//! 成绩汇总
//!
//! 纯读取计算，不持有任何状态。班级成绩由已评分的作业提交与手动成绩记录组成，
//! 平均分为得分总和占满分总和的百分比（保留一位小数）。满分总和为 0 时平均分为 `None`。

use std::collections::HashMap;

use crate::errors::{GradebookError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::classes::entities::Class;
use crate::models::grades::entities::GradeRecord;
use crate::models::reports::responses::{ClassReport, OverallReport, ReportItem, ReportItemSource};
use crate::models::submissions::entities::Submission;
use crate::storage::Storage;

/// 保留一位小数
pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// 百分比，满分不为正数时没有意义
pub(crate) fn percentage(score: f64, max_score: f64) -> Option<f64> {
    if max_score > 0.0 {
        Some(round_one_decimal(score / max_score * 100.0))
    } else {
        None
    }
}

/// 汇总学生在某班级的全部成绩
pub(crate) fn build_class_report(
    student_id: &str,
    class: &Class,
    assignments: &[Assignment],
    submissions: &[Submission],
    records: &[GradeRecord],
) -> ClassReport {
    let class_assignments: HashMap<&str, &Assignment> = assignments
        .iter()
        .filter(|a| a.class_id == class.id)
        .map(|a| (a.id.as_str(), a))
        .collect();

    let graded = submissions
        .iter()
        .filter(|s| s.student_id == student_id && s.is_graded())
        .filter_map(|s| {
            let assignment = class_assignments.get(s.assignment_id.as_str())?;
            let score = s.grade?;
            Some(ReportItem {
                source: ReportItemSource::Assignment,
                reference_id: s.id.clone(),
                title: assignment.title.clone(),
                category: None,
                score,
                max_score: assignment.total_points,
                recorded_at: s.graded_at.unwrap_or(s.submitted_at),
            })
        });

    let manual = records
        .iter()
        .filter(|r| r.student_id == student_id && r.class_id == class.id)
        .map(|r| ReportItem {
            source: ReportItemSource::Manual,
            reference_id: r.id.clone(),
            title: r.title.clone(),
            category: Some(r.category),
            score: r.score,
            max_score: r.max_score,
            recorded_at: r.created_at,
        });

    let mut items: Vec<ReportItem> = graded.chain(manual).collect();
    items.sort_by(|a, b| {
        a.recorded_at
            .cmp(&b.recorded_at)
            .then(a.source.cmp(&b.source))
            .then_with(|| a.reference_id.cmp(&b.reference_id))
    });

    let total_score: f64 = items.iter().map(|i| i.score).sum();
    let total_max_score: f64 = items.iter().map(|i| i.max_score).sum();

    ClassReport {
        student_id: student_id.to_string(),
        class_id: class.id.clone(),
        class_name: class.class_name.clone(),
        items,
        total_score,
        total_max_score,
        average: percentage(total_score, total_max_score),
    }
}

/// 合并各班级报告，总平均分按分值加权
pub(crate) fn build_overall_report(student_id: &str, classes: Vec<ClassReport>) -> OverallReport {
    let total_score: f64 = classes.iter().map(|c| c.total_score).sum();
    let total_max_score: f64 = classes.iter().map(|c| c.total_max_score).sum();

    OverallReport {
        student_id: student_id.to_string(),
        classes,
        total_score,
        total_max_score,
        average: percentage(total_score, total_max_score),
    }
}

/// 生成学生在某班级的成绩报告
///
/// 班级、学生不存在或学生未选该班级时返回 NotFound。
pub(crate) async fn class_report(
    storage: &dyn Storage,
    student_id: &str,
    class_id: &str,
) -> Result<ClassReport> {
    let class = storage
        .get_class_by_id(class_id)
        .await?
        .ok_or_else(|| GradebookError::not_found(format!("Class not found: {class_id}")))?;
    require_student(storage, student_id).await?;
    if !storage.is_enrolled(class_id, student_id).await? {
        return Err(GradebookError::not_found(format!(
            "Student {student_id} is not enrolled in class {class_id}"
        )));
    }

    let assignments = storage.list_assignments_for_class(class_id).await?;
    let submissions = storage.list_submissions_for_student(student_id).await?;
    let records = storage
        .list_grade_records_for_student_in_class(student_id, class_id)
        .await?;

    Ok(build_class_report(
        student_id,
        &class,
        &assignments,
        &submissions,
        &records,
    ))
}

/// 生成学生的总成绩报告，班级按名称、ID 排序
pub(crate) async fn overall_report(storage: &dyn Storage, student_id: &str) -> Result<OverallReport> {
    require_student(storage, student_id).await?;

    let classes = storage.list_student_classes(student_id).await?;
    let assignments = storage.list_assignments_for_student(student_id).await?;
    let submissions = storage.list_submissions_for_student(student_id).await?;

    let mut reports = Vec::with_capacity(classes.len());
    for class in &classes {
        let records = storage
            .list_grade_records_for_student_in_class(student_id, &class.id)
            .await?;
        reports.push(build_class_report(
            student_id,
            class,
            &assignments,
            &submissions,
            &records,
        ));
    }

    Ok(build_overall_report(student_id, reports))
}

async fn require_student(storage: &dyn Storage, student_id: &str) -> Result<()> {
    storage
        .get_user_by_id(student_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| GradebookError::not_found(format!("Student not found: {student_id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::grades::{entities::GradeCategory, requests::CreateGradeRecordRequest};
    use crate::models::submissions::requests::{GradeSubmissionRequest, SubmitAssignmentRequest};
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::{SeaOrmStorage, fixtures};

    async fn submit_and_grade(
        storage: &SeaOrmStorage,
        assignment_id: &str,
        student_id: &str,
        grade: f64,
        graded_at: &str,
    ) {
        let s: &dyn Storage = storage;
        let submission = s
            .submit(
                assignment_id,
                student_id,
                SubmitAssignmentRequest {
                    content: Some("answer".to_string()),
                    attachments: vec![],
                },
                fixtures::at("2025-12-19T12:00:00Z"),
            )
            .await
            .unwrap();
        s.grade_submission(
            &submission.id,
            GradeSubmissionRequest {
                grade,
                feedback: None,
            },
            fixtures::at(graded_at),
        )
        .await
        .unwrap();
    }

    /// alice 选修 Class A 与 Class B
    async fn two_classes(storage: &SeaOrmStorage) {
        fixtures::classroom(storage).await;
        fixtures::class(storage, "class-b", "teacher", "Class B").await;
        fixtures::enroll(storage, "class-b", "alice").await;
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(percentage(130.0, 150.0), Some(86.7));
        assert_eq!(percentage(1.0, 3.0), Some(33.3));
        assert_eq!(percentage(0.0, 0.0), None);
        assert_eq!(round_one_decimal(85.04), 85.0);
    }

    #[tokio::test]
    async fn test_overall_average_is_point_weighted() {
        let storage = fixtures::storage().await;
        two_classes(&storage).await;
        let a = fixtures::assignment(&storage, "class-a", "A1", "2025-12-20T00:00:00Z", 100.0).await;
        let b = fixtures::assignment(&storage, "class-b", "B1", "2025-12-20T00:00:00Z", 50.0).await;
        submit_and_grade(&storage, &a.id, "alice", 90.0, "2025-12-22T00:00:00Z").await;
        submit_and_grade(&storage, &b.id, "alice", 40.0, "2025-12-22T00:00:00Z").await;

        let report = overall_report(&storage, "alice").await.unwrap();
        assert_eq!(report.classes.len(), 2);
        assert_eq!(report.classes[0].class_name, "Class A");
        assert_eq!(report.classes[0].average, Some(90.0));
        assert_eq!(report.classes[1].average, Some(80.0));
        assert_eq!(report.total_score, 130.0);
        assert_eq!(report.total_max_score, 150.0);
        // 按分值加权而非两个班级平均分的简单平均（85.0）
        assert_eq!(report.average, Some(86.7));
    }

    #[tokio::test]
    async fn test_report_without_graded_items_has_no_average() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let a = fixtures::assignment(&storage, "class-a", "A1", "2025-12-20T00:00:00Z", 100.0).await;
        // 已提交但未评分的作业不计入
        let s: &dyn Storage = &storage;
        s.submit(
            &a.id,
            "alice",
            SubmitAssignmentRequest {
                content: Some("draft".to_string()),
                attachments: vec![],
            },
            fixtures::at("2025-12-19T12:00:00Z"),
        )
        .await
        .unwrap();

        let report = class_report(&storage, "alice", "class-a").await.unwrap();
        assert!(report.items.is_empty());
        assert_eq!(report.total_max_score, 0.0);
        assert_eq!(report.average, None);

        let overall = overall_report(&storage, "alice").await.unwrap();
        assert_eq!(overall.average, None);
        let json = serde_json::to_value(&overall).unwrap();
        assert!(json["average"].is_null());
    }

    #[tokio::test]
    async fn test_class_report_combines_submissions_and_records() {
        let storage = fixtures::storage().await;
        two_classes(&storage).await;
        let a = fixtures::assignment(&storage, "class-a", "A1", "2025-12-20T00:00:00Z", 100.0).await;
        let b = fixtures::assignment(&storage, "class-b", "B1", "2025-12-20T00:00:00Z", 50.0).await;
        submit_and_grade(&storage, &a.id, "alice", 80.0, "2025-12-22T00:00:00Z").await;
        submit_and_grade(&storage, &b.id, "alice", 50.0, "2025-12-22T00:00:00Z").await;

        let s: &dyn Storage = &storage;
        s.create_grade_record(
            Some("teacher"),
            CreateGradeRecordRequest {
                student_id: "alice".to_string(),
                class_id: "class-a".to_string(),
                category: GradeCategory::Quiz,
                title: "Quiz 1".to_string(),
                score: 7.0,
                max_score: 10.0,
                comments: None,
            },
        )
        .await
        .unwrap();

        let report = class_report(&storage, "alice", "class-a").await.unwrap();
        assert_eq!(report.items.len(), 2);
        assert_eq!(report.items[0].source, ReportItemSource::Assignment);
        assert_eq!(report.items[1].category, Some(GradeCategory::Quiz));
        assert_eq!(report.total_score, 87.0);
        assert_eq!(report.total_max_score, 110.0);
        assert_eq!(report.average, Some(79.1));

        // 重复生成结果一致
        let again = class_report(&storage, "alice", "class-a").await.unwrap();
        assert_eq!(report, again);
    }

    #[tokio::test]
    async fn test_report_targets_must_exist() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        fixtures::user(&storage, "bob", UserRole::Student).await;

        let err = class_report(&storage, "alice", "missing").await.unwrap_err();
        assert!(err.is_not_found());
        let err = class_report(&storage, "nobody", "class-a").await.unwrap_err();
        assert!(err.is_not_found());
        // 未选课同样视为无效目标
        let err = class_report(&storage, "bob", "class-a").await.unwrap_err();
        assert!(err.is_not_found());
        let err = overall_report(&storage, "nobody").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
