//! 作业存储操作

use super::{SeaOrmStorage, new_id};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{GradebookError, Result};
use crate::models::assignments::{
    entities::{Assignment, AssignmentStatus},
    requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    responses::AssignmentDeletion,
};
use crate::models::submissions::entities::SubmissionStatus;
use crate::utils::validate::{parse_timestamp, validate_points, validate_title};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};

/// 作业列表的统一排序：截止时间、创建时间、ID
fn ordered(select: Select<Assignments>) -> Select<Assignments> {
    select
        .order_by_asc(Column::DueAt)
        .order_by_asc(Column::CreatedAt)
        .order_by_asc(Column::Id)
}

impl SeaOrmStorage {
    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        created_by: Option<&str>,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let title = validate_title("title", &req.title)?;
        validate_points("total_points", req.total_points)?;
        let due_at = parse_timestamp("due_at", &req.due_at)?;
        self.require_class(&req.class_id).await?;

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(new_id()),
            class_id: Set(req.class_id),
            title: Set(title),
            description: Set(req.description.unwrap_or_default()),
            due_at: Set(due_at.timestamp()),
            total_points: Set(req.total_points),
            status: Set(AssignmentStatus::Active.to_string()),
            created_by: Set(created_by.map(str::to_string)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(
        &self,
        assignment_id: &str,
    ) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 查询作业，不存在时返回 NotFound
    pub(crate) async fn require_assignment(&self, assignment_id: &str) -> Result<Assignment> {
        self.get_assignment_by_id_impl(assignment_id)
            .await?
            .ok_or_else(|| {
                GradebookError::not_found(format!("Assignment not found: {assignment_id}"))
            })
    }

    /// 更新作业（合并提供的字段）
    pub async fn update_assignment_impl(
        &self,
        assignment_id: &str,
        update: UpdateAssignmentRequest,
    ) -> Result<Assignment> {
        let title = update
            .title
            .as_deref()
            .map(|t| validate_title("title", t))
            .transpose()?;
        let due_at = update
            .due_at
            .as_deref()
            .map(|d| parse_timestamp("due_at", d))
            .transpose()?;
        if let Some(points) = update.total_points {
            validate_points("total_points", points)?;
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradebookError::database_operation(format!("开启事务失败: {e}")))?;

        // SELECT ... FOR UPDATE：并发评分须等待本事务结束
        let existing = Assignments::find_by_id(assignment_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业失败: {e}")))?
            .ok_or_else(|| {
                GradebookError::not_found(format!("Assignment not found: {assignment_id}"))
            })?;

        // 降低总分时，已评分的成绩不能超过新的总分
        if let Some(points) = update.total_points
            && points < existing.total_points
        {
            let exceeding = Submissions::find()
                .filter(
                    Condition::all()
                        .add(SubmissionColumn::AssignmentId.eq(assignment_id))
                        .add(SubmissionColumn::Status.eq(SubmissionStatus::GRADED))
                        .add(SubmissionColumn::Grade.gt(points)),
                )
                .count(&txn)
                .await
                .map_err(|e| GradebookError::database_operation(format!("查询提交失败: {e}")))?;
            if exceeding > 0 {
                return Err(GradebookError::invalid_field(
                    "total_points",
                    format!("{exceeding} graded submission(s) exceed the new total of {points}"),
                ));
            }
        }

        let mut model = existing.into_active_model();
        if let Some(title) = title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(description);
        }
        if let Some(due_at) = due_at {
            model.due_at = Set(due_at.timestamp());
        }
        if let Some(points) = update.total_points {
            model.total_points = Set(points);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("更新作业失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| GradebookError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 删除作业，同一事务内删除其全部提交
    pub async fn delete_assignment_impl(&self, assignment_id: &str) -> Result<AssignmentDeletion> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradebookError::database_operation(format!("开启事务失败: {e}")))?;

        let removed = Submissions::delete_many()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .exec(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("删除作业提交失败: {e}")))?;

        let result = Assignments::delete_by_id(assignment_id)
            .exec(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("删除作业失败: {e}")))?;

        if result.rows_affected == 0 {
            // 事务随 txn 丢弃回滚
            return Err(GradebookError::not_found(format!(
                "Assignment not found: {assignment_id}"
            )));
        }

        txn.commit()
            .await
            .map_err(|e| GradebookError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(AssignmentDeletion {
            assignment_id: assignment_id.to_string(),
            removed_submissions: removed.rows_affected,
        })
    }

    /// 列出班级作业
    pub async fn list_assignments_for_class_impl(&self, class_id: &str) -> Result<Vec<Assignment>> {
        self.require_class(class_id).await?;

        let models = ordered(Assignments::find().filter(Column::ClassId.eq(class_id)))
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 列出学生所在全部班级的作业
    pub async fn list_assignments_for_student_impl(
        &self,
        student_id: &str,
    ) -> Result<Vec<Assignment>> {
        self.require_user(student_id).await?;
        let class_ids = self.student_class_ids(student_id).await?;
        if class_ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = ordered(Assignments::find().filter(Column::ClassId.is_in(class_ids)))
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_assignment()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use crate::models::assignments::{
        entities::AssignmentStatus,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    };
    use crate::models::submissions::entities::SubmissionStatus;
    use crate::models::submissions::requests::{GradeSubmissionRequest, SubmitAssignmentRequest};

    fn create_request(total_points: f64, due_at: &str) -> CreateAssignmentRequest {
        CreateAssignmentRequest {
            class_id: "class-a".to_string(),
            title: "Essay".to_string(),
            description: Some("Write an essay".to_string()),
            due_at: due_at.to_string(),
            total_points,
        }
    }

    #[tokio::test]
    async fn test_create_assignment_defaults() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;

        let assignment = storage
            .create_assignment_impl(Some("teacher"), create_request(100.0, "2025-12-20T00:00:00Z"))
            .await
            .unwrap();

        assert_eq!(assignment.status, AssignmentStatus::Active);
        assert_eq!(assignment.due_at, fixtures::at("2025-12-20T00:00:00Z"));
        assert_eq!(assignment.created_by.as_deref(), Some("teacher"));
    }

    #[tokio::test]
    async fn test_create_assignment_validation() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;

        for points in [0.0, -10.0, f64::NAN] {
            let err = storage
                .create_assignment_impl(None, create_request(points, "2025-12-20T00:00:00Z"))
                .await
                .unwrap_err();
            assert_eq!(err.field(), Some("total_points"));
        }

        let err = storage
            .create_assignment_impl(None, create_request(10.0, "2025-13-40"))
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("due_at"));

        let mut req = create_request(10.0, "2025-12-20T00:00:00Z");
        req.class_id = "nowhere".to_string();
        let err = storage.create_assignment_impl(None, req).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let assignment =
            fixtures::assignment(&storage, "class-a", "Essay", "2025-12-20T00:00:00Z", 100.0).await;

        let updated = storage
            .update_assignment_impl(
                &assignment.id,
                UpdateAssignmentRequest {
                    title: Some("Essay (revised)".to_string()),
                    status: Some(AssignmentStatus::Closed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Essay (revised)");
        assert_eq!(updated.status, AssignmentStatus::Closed);
        assert_eq!(updated.total_points, 100.0);
        assert_eq!(updated.description, assignment.description);

        let err = storage
            .update_assignment_impl("missing", UpdateAssignmentRequest::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_total_points_cannot_drop_below_existing_grade() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let assignment =
            fixtures::assignment(&storage, "class-a", "Essay", "2025-12-20T00:00:00Z", 100.0).await;
        let submission = storage
            .submit_impl(
                &assignment.id,
                "alice",
                SubmitAssignmentRequest {
                    content: Some("answer".to_string()),
                    attachments: vec![],
                },
                fixtures::at("2025-12-19T12:00:00Z"),
            )
            .await
            .unwrap();
        storage
            .grade_submission_impl(
                &submission.id,
                GradeSubmissionRequest {
                    grade: 90.0,
                    feedback: None,
                },
                fixtures::at("2025-12-21T00:00:00Z"),
            )
            .await
            .unwrap();

        let err = storage
            .update_assignment_impl(
                &assignment.id,
                UpdateAssignmentRequest {
                    total_points: Some(80.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("total_points"));

        let updated = storage
            .update_assignment_impl(
                &assignment.id,
                UpdateAssignmentRequest {
                    total_points: Some(90.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.total_points, 90.0);
    }

    #[tokio::test]
    async fn test_update_rejects_non_positive_total_points() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let assignment =
            fixtures::assignment(&storage, "class-a", "Essay", "2025-12-20T00:00:00Z", 100.0).await;

        for points in [0.0, -1.0, f64::NAN] {
            let err = storage
                .update_assignment_impl(
                    &assignment.id,
                    UpdateAssignmentRequest {
                        total_points: Some(points),
                        ..Default::default()
                    },
                )
                .await
                .unwrap_err();
            assert_eq!(err.field(), Some("total_points"));
        }

        let stored = storage.require_assignment(&assignment.id).await.unwrap();
        assert_eq!(stored.total_points, 100.0);
    }

    #[tokio::test]
    async fn test_grade_checked_against_lowered_total() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let assignment =
            fixtures::assignment(&storage, "class-a", "Essay", "2025-12-20T00:00:00Z", 100.0).await;
        let submission = storage
            .submit_impl(
                &assignment.id,
                "alice",
                SubmitAssignmentRequest {
                    content: Some("answer".to_string()),
                    attachments: vec![],
                },
                fixtures::at("2025-12-19T12:00:00Z"),
            )
            .await
            .unwrap();

        // 未评分时可以降低总分，之后的评分按新总分校验
        storage
            .update_assignment_impl(
                &assignment.id,
                UpdateAssignmentRequest {
                    total_points: Some(80.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let err = storage
            .grade_submission_impl(
                &submission.id,
                GradeSubmissionRequest {
                    grade: 95.0,
                    feedback: None,
                },
                fixtures::at("2025-12-21T00:00:00Z"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("grade"));

        let stored = storage
            .get_submission_by_id_impl(&submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, SubmissionStatus::Submitted);
        assert!(stored.grade.is_none());
    }

    #[tokio::test]
    async fn test_delete_cascades_submissions() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let assignment =
            fixtures::assignment(&storage, "class-a", "Essay", "2025-12-20T00:00:00Z", 100.0).await;
        let submission = storage
            .submit_impl(
                &assignment.id,
                "alice",
                SubmitAssignmentRequest {
                    content: Some("answer".to_string()),
                    attachments: vec![],
                },
                fixtures::at("2025-12-19T12:00:00Z"),
            )
            .await
            .unwrap();

        let deletion = storage.delete_assignment_impl(&assignment.id).await.unwrap();
        assert_eq!(deletion.removed_submissions, 1);
        assert!(
            storage
                .get_submission_by_id_impl(&submission.id)
                .await
                .unwrap()
                .is_none()
        );

        let err = storage
            .delete_assignment_impl(&assignment.id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_lists_sorted_by_due_date() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        fixtures::assignment(&storage, "class-a", "Late one", "2025-12-30T00:00:00Z", 10.0).await;
        fixtures::assignment(&storage, "class-a", "Early one", "2025-12-01T00:00:00Z", 10.0).await;

        let titles: Vec<_> = storage
            .list_assignments_for_class_impl("class-a")
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["Early one", "Late one"]);

        let for_student = storage
            .list_assignments_for_student_impl("alice")
            .await
            .unwrap();
        assert_eq!(for_student.len(), 2);
        assert_eq!(for_student[0].title, "Early one");

        assert!(
            storage
                .list_assignments_for_class_impl("missing")
                .await
                .unwrap_err()
                .is_not_found()
        );
        assert!(
            storage
                .list_assignments_for_student_impl("ghost")
                .await
                .unwrap_err()
                .is_not_found()
        );
    }
}
