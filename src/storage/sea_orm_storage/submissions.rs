//! 提交存储操作

use chrono::{DateTime, Utc};

use super::{SeaOrmStorage, new_id, write_error};
use crate::entity::assignments::Entity as Assignments;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{GradebookError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::{GradeSubmissionRequest, SubmitAssignmentRequest},
};
use crate::utils::validate::{validate_score_range, validate_submission_payload};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};

/// 作业必须处于可提交状态
fn ensure_accepts_submissions(assignment: &Assignment) -> Result<()> {
    if !assignment.status.accepts_submissions() {
        return Err(GradebookError::invalid_field(
            "assignment_id",
            format!(
                "Assignment {} is {} and no longer accepts submissions",
                assignment.id, assignment.status
            ),
        ));
    }
    Ok(())
}

fn encode_attachments(attachments: &[String]) -> Result<String> {
    Ok(serde_json::to_string(attachments)?)
}

impl SeaOrmStorage {
    /// 学生提交作业
    ///
    /// 同一 (作业, 学生) 只能有一条提交，重复提交由唯一索引拒绝。
    pub async fn submit_impl(
        &self,
        assignment_id: &str,
        student_id: &str,
        req: SubmitAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        validate_submission_payload(req.content.as_deref(), &req.attachments)?;

        let assignment = self.require_assignment(assignment_id).await?;
        self.require_user(student_id).await?;
        ensure_accepts_submissions(&assignment)?;
        if !self.is_enrolled_impl(&assignment.class_id, student_id).await? {
            return Err(GradebookError::invalid_field(
                "student_id",
                format!(
                    "Student {student_id} is not enrolled in class {}",
                    assignment.class_id
                ),
            ));
        }

        let status = SubmissionStatus::for_submission_time(now, assignment.due_at);
        let ts = now.timestamp();

        let model = ActiveModel {
            id: Set(new_id()),
            assignment_id: Set(assignment_id.to_string()),
            student_id: Set(student_id.to_string()),
            content: Set(req.content),
            attachments: Set(encode_attachments(&req.attachments)?),
            status: Set(status.to_string()),
            grade: Set(None),
            feedback: Set(None),
            submitted_at: Set(ts),
            graded_at: Set(None),
            updated_at: Set(ts),
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            write_error(
                e,
                "A submission already exists for this assignment and student",
                "创建提交失败",
            )
        })?;

        Ok(result.into_submission())
    }

    /// 截止前覆盖未评分的提交
    pub async fn resubmit_impl(
        &self,
        assignment_id: &str,
        student_id: &str,
        req: SubmitAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        validate_submission_payload(req.content.as_deref(), &req.attachments)?;

        let assignment = self.require_assignment(assignment_id).await?;
        ensure_accepts_submissions(&assignment)?;
        if now > assignment.due_at {
            return Err(GradebookError::invalid_field(
                "due_at",
                "The due date has passed; the submission can no longer be replaced",
            ));
        }

        let existing = self
            .find_submission(assignment_id, student_id)
            .await?
            .ok_or_else(|| {
                GradebookError::not_found(format!(
                    "No submission from {student_id} for assignment {assignment_id}"
                ))
            })?;
        if existing.is_graded() {
            return Err(GradebookError::conflict(
                "The submission has already been graded",
            ));
        }

        let status = SubmissionStatus::for_submission_time(now, assignment.due_at);
        let ts = now.timestamp();

        // 条件更新：评分与覆盖并发时，以评分为准
        let result = Submissions::update_many()
            .col_expr(Column::Content, Expr::value(req.content))
            .col_expr(
                Column::Attachments,
                Expr::value(encode_attachments(&req.attachments)?),
            )
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::SubmittedAt, Expr::value(ts))
            .col_expr(Column::UpdatedAt, Expr::value(ts))
            .filter(
                Condition::all()
                    .add(Column::Id.eq(existing.id.as_str()))
                    .add(Column::Status.ne(SubmissionStatus::GRADED)),
            )
            .exec(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("更新提交失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(GradebookError::conflict(
                "The submission has already been graded",
            ));
        }

        self.require_submission(&existing.id).await
    }

    /// 评分（允许重新评分）
    pub async fn grade_submission_impl(
        &self,
        submission_id: &str,
        req: GradeSubmissionRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradebookError::database_operation(format!("开启事务失败: {e}")))?;

        let submission = Submissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| {
                GradebookError::not_found(format!("Submission not found: {submission_id}"))
            })?;

        // 锁定作业行，评分校验与总分修改互斥
        let assignment = Assignments::find_by_id(submission.assignment_id.as_str())
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业失败: {e}")))?
            .ok_or_else(|| {
                GradebookError::not_found(format!(
                    "Assignment not found: {}",
                    submission.assignment_id
                ))
            })?;

        validate_score_range("grade", req.grade, assignment.total_points)?;

        // 状态、分数、评语与评分时间在同一条语句中写入
        let ts = now.timestamp();
        Submissions::update_many()
            .col_expr(Column::Status, Expr::value(SubmissionStatus::GRADED))
            .col_expr(Column::Grade, Expr::value(req.grade))
            .col_expr(Column::Feedback, Expr::value(req.feedback))
            .col_expr(Column::GradedAt, Expr::value(ts))
            .col_expr(Column::UpdatedAt, Expr::value(ts))
            .filter(Column::Id.eq(submission_id))
            .exec(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("评分失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| GradebookError::database_operation(format!("提交事务失败: {e}")))?;

        self.require_submission(submission_id).await
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: &str,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    async fn require_submission(&self, submission_id: &str) -> Result<Submission> {
        self.get_submission_by_id_impl(submission_id)
            .await?
            .ok_or_else(|| GradebookError::not_found(format!("Submission not found: {submission_id}")))
    }

    async fn find_submission(
        &self,
        assignment_id: &str,
        student_id: &str,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出作业的全部提交
    pub async fn list_submissions_for_assignment_impl(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<Submission>> {
        self.require_assignment(assignment_id).await?;

        let models = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 列出学生的全部提交
    pub async fn list_submissions_for_student_impl(
        &self,
        student_id: &str,
    ) -> Result<Vec<Submission>> {
        self.require_user(student_id).await?;

        let models = Submissions::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_submission()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use crate::models::assignments::{
        entities::AssignmentStatus, requests::UpdateAssignmentRequest,
    };
    use crate::models::submissions::{
        entities::SubmissionStatus,
        requests::{GradeSubmissionRequest, SubmitAssignmentRequest},
    };
    use crate::models::users::entities::UserRole;

    const DUE: &str = "2025-12-20T00:00:00Z";

    fn answer(text: &str) -> SubmitAssignmentRequest {
        SubmitAssignmentRequest {
            content: Some(text.to_string()),
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn test_on_time_and_late_submissions() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let first = fixtures::assignment(&storage, "class-a", "First", DUE, 100.0).await;
        let second = fixtures::assignment(&storage, "class-a", "Second", DUE, 100.0).await;

        let on_time = storage
            .submit_impl(&first.id, "alice", answer("a"), fixtures::at("2025-12-19T12:00:00Z"))
            .await
            .unwrap();
        assert_eq!(on_time.status, SubmissionStatus::Submitted);

        let late = storage
            .submit_impl(&second.id, "alice", answer("b"), fixtures::at("2025-12-21T00:00:00Z"))
            .await
            .unwrap();
        assert_eq!(late.status, SubmissionStatus::Late);
        assert!(late.grade.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_submission_is_conflict() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let assignment = fixtures::assignment(&storage, "class-a", "Essay", DUE, 100.0).await;
        let now = fixtures::at("2025-12-19T12:00:00Z");

        storage
            .submit_impl(&assignment.id, "alice", answer("first"), now)
            .await
            .unwrap();
        let err = storage
            .submit_impl(&assignment.id, "alice", answer("second"), now)
            .await
            .unwrap_err();
        assert!(err.is_conflict());

        let all = storage
            .list_submissions_for_assignment_impl(&assignment.id)
            .await
            .unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].content.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_submit_rejections() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        fixtures::user(&storage, "outsider", UserRole::Student).await;
        let assignment = fixtures::assignment(&storage, "class-a", "Essay", DUE, 100.0).await;
        let now = fixtures::at("2025-12-19T12:00:00Z");

        let err = storage
            .submit_impl(&assignment.id, "alice", SubmitAssignmentRequest::default(), now)
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("content"));

        let err = storage
            .submit_impl(&assignment.id, "outsider", answer("x"), now)
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("student_id"));

        let err = storage
            .submit_impl("missing", "alice", answer("x"), now)
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let err = storage
            .submit_impl(&assignment.id, "ghost", answer("x"), now)
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        storage
            .update_assignment_impl(
                &assignment.id,
                UpdateAssignmentRequest {
                    status: Some(AssignmentStatus::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let err = storage
            .submit_impl(&assignment.id, "alice", answer("x"), now)
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("assignment_id"));
    }

    #[tokio::test]
    async fn test_attachments_round_trip() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let assignment = fixtures::assignment(&storage, "class-a", "Essay", DUE, 100.0).await;

        let submission = storage
            .submit_impl(
                &assignment.id,
                "alice",
                SubmitAssignmentRequest {
                    content: None,
                    attachments: vec!["file-1".to_string(), "file-2".to_string()],
                },
                fixtures::at("2025-12-19T12:00:00Z"),
            )
            .await
            .unwrap();

        let fetched = storage
            .get_submission_by_id_impl(&submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.attachments, vec!["file-1", "file-2"]);
        assert!(fetched.content.is_none());
    }

    #[tokio::test]
    async fn test_grade_out_of_range_is_rejected() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let assignment = fixtures::assignment(&storage, "class-a", "Essay", DUE, 100.0).await;
        let submission = storage
            .submit_impl(&assignment.id, "alice", answer("a"), fixtures::at("2025-12-19T12:00:00Z"))
            .await
            .unwrap();

        let err = storage
            .grade_submission_impl(
                &submission.id,
                GradeSubmissionRequest {
                    grade: 105.0,
                    feedback: None,
                },
                fixtures::at("2025-12-22T00:00:00Z"),
            )
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.field(), Some("grade"));

        let unchanged = storage
            .get_submission_by_id_impl(&submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unchanged.status, SubmissionStatus::Submitted);
        assert!(unchanged.grade.is_none());
    }

    #[tokio::test]
    async fn test_grade_and_regrade() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let assignment = fixtures::assignment(&storage, "class-a", "Essay", DUE, 100.0).await;
        let submission = storage
            .submit_impl(&assignment.id, "alice", answer("a"), fixtures::at("2025-12-21T00:00:00Z"))
            .await
            .unwrap();

        let graded = storage
            .grade_submission_impl(
                &submission.id,
                GradeSubmissionRequest {
                    grade: 88.0,
                    feedback: Some("Good".to_string()),
                },
                fixtures::at("2025-12-22T00:00:00Z"),
            )
            .await
            .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.grade, Some(88.0));
        assert_eq!(graded.feedback.as_deref(), Some("Good"));
        assert_eq!(graded.graded_at, Some(fixtures::at("2025-12-22T00:00:00Z")));

        let regraded = storage
            .grade_submission_impl(
                &submission.id,
                GradeSubmissionRequest {
                    grade: 100.0,
                    feedback: None,
                },
                fixtures::at("2025-12-23T00:00:00Z"),
            )
            .await
            .unwrap();
        assert_eq!(regraded.grade, Some(100.0));

        let err = storage
            .grade_submission_impl(
                "missing",
                GradeSubmissionRequest {
                    grade: 1.0,
                    feedback: None,
                },
                fixtures::at("2025-12-23T00:00:00Z"),
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_resubmit_rules() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let assignment = fixtures::assignment(&storage, "class-a", "Essay", DUE, 100.0).await;

        let err = storage
            .resubmit_impl(&assignment.id, "alice", answer("x"), fixtures::at("2025-12-18T00:00:00Z"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let original = storage
            .submit_impl(&assignment.id, "alice", answer("v1"), fixtures::at("2025-12-18T00:00:00Z"))
            .await
            .unwrap();
        let replaced = storage
            .resubmit_impl(&assignment.id, "alice", answer("v2"), fixtures::at("2025-12-19T00:00:00Z"))
            .await
            .unwrap();
        assert_eq!(replaced.id, original.id);
        assert_eq!(replaced.content.as_deref(), Some("v2"));
        assert_eq!(replaced.submitted_at, fixtures::at("2025-12-19T00:00:00Z"));

        let err = storage
            .resubmit_impl(&assignment.id, "alice", answer("v3"), fixtures::at("2025-12-21T00:00:00Z"))
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("due_at"));

        storage
            .grade_submission_impl(
                &original.id,
                GradeSubmissionRequest {
                    grade: 70.0,
                    feedback: None,
                },
                fixtures::at("2025-12-19T06:00:00Z"),
            )
            .await
            .unwrap();
        let err = storage
            .resubmit_impl(&assignment.id, "alice", answer("v4"), fixtures::at("2025-12-19T12:00:00Z"))
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_student_submissions_sorted_by_time() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let first = fixtures::assignment(&storage, "class-a", "First", DUE, 10.0).await;
        let second = fixtures::assignment(&storage, "class-a", "Second", DUE, 10.0).await;

        storage
            .submit_impl(&second.id, "alice", answer("b"), fixtures::at("2025-12-10T00:00:00Z"))
            .await
            .unwrap();
        storage
            .submit_impl(&first.id, "alice", answer("a"), fixtures::at("2025-12-11T00:00:00Z"))
            .await
            .unwrap();

        let list = storage
            .list_submissions_for_student_impl("alice")
            .await
            .unwrap();
        let ids: Vec<_> = list.iter().map(|s| s.assignment_id.as_str()).collect();
        assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
    }
}
