//! 手动成绩存储操作

use super::{SeaOrmStorage, new_id};
use crate::entity::grade_records::{ActiveModel, Column, Entity as GradeRecords};
use crate::errors::{GradebookError, Result};
use crate::models::grades::{
    entities::GradeRecord,
    requests::{CreateGradeRecordRequest, UpdateGradeRecordRequest},
};
use crate::utils::validate::{validate_points, validate_score_range, validate_title};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

/// 成绩记录的分值约束：max_score > 0 且 0 <= score <= max_score
fn validate_record_scores(score: f64, max_score: f64) -> Result<()> {
    validate_points("max_score", max_score)?;
    validate_score_range("score", score, max_score)
}

impl SeaOrmStorage {
    /// 创建成绩记录
    pub async fn create_grade_record_impl(
        &self,
        created_by: Option<&str>,
        req: CreateGradeRecordRequest,
    ) -> Result<GradeRecord> {
        let title = validate_title("title", &req.title)?;
        validate_record_scores(req.score, req.max_score)?;

        self.require_class(&req.class_id).await?;
        self.require_user(&req.student_id).await?;
        if !self.is_enrolled_impl(&req.class_id, &req.student_id).await? {
            return Err(GradebookError::invalid_field(
                "student_id",
                format!(
                    "Student {} is not enrolled in class {}",
                    req.student_id, req.class_id
                ),
            ));
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(new_id()),
            student_id: Set(req.student_id),
            class_id: Set(req.class_id),
            category: Set(req.category.to_string()),
            title: Set(title),
            score: Set(req.score),
            max_score: Set(req.max_score),
            comments: Set(req.comments),
            created_by: Set(created_by.map(str::to_string)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("创建成绩记录失败: {e}")))?;

        Ok(result.into_grade_record())
    }

    /// 通过 ID 获取成绩记录
    pub async fn get_grade_record_by_id_impl(&self, grade_id: &str) -> Result<Option<GradeRecord>> {
        let result = GradeRecords::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩记录失败: {e}")))?;

        Ok(result.map(|m| m.into_grade_record()))
    }

    /// 更新成绩记录，合并后整体校验分值
    pub async fn update_grade_record_impl(
        &self,
        grade_id: &str,
        update: UpdateGradeRecordRequest,
    ) -> Result<GradeRecord> {
        let existing = GradeRecords::find_by_id(grade_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩记录失败: {e}")))?
            .ok_or_else(|| GradebookError::not_found(format!("Grade record not found: {grade_id}")))?;

        let score = update.score.unwrap_or(existing.score);
        let max_score = update.max_score.unwrap_or(existing.max_score);
        validate_record_scores(score, max_score)?;
        let title = update
            .title
            .as_deref()
            .map(|t| validate_title("title", t))
            .transpose()?;

        let mut model = existing.into_active_model();
        model.score = Set(score);
        model.max_score = Set(max_score);
        if let Some(title) = title {
            model.title = Set(title);
        }
        if let Some(category) = update.category {
            model.category = Set(category.to_string());
        }
        // 空白评语表示清除
        if let Some(comments) = update.comments {
            model.comments = Set(Some(comments).filter(|c| !c.trim().is_empty()));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("更新成绩记录失败: {e}")))?;

        Ok(result.into_grade_record())
    }

    /// 删除成绩记录
    pub async fn delete_grade_record_impl(&self, grade_id: &str) -> Result<()> {
        let result = GradeRecords::delete_by_id(grade_id)
            .exec(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("删除成绩记录失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(GradebookError::not_found(format!(
                "Grade record not found: {grade_id}"
            )));
        }
        Ok(())
    }

    /// 列出学生在某班级的成绩记录
    pub async fn list_grade_records_for_student_in_class_impl(
        &self,
        student_id: &str,
        class_id: &str,
    ) -> Result<Vec<GradeRecord>> {
        self.require_class(class_id).await?;
        self.require_user(student_id).await?;

        let models = GradeRecords::find()
            .filter(
                Condition::all()
                    .add(Column::StudentId.eq(student_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩记录失败: {e}")))?;

        Ok(models.into_iter().map(|m| m.into_grade_record()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use crate::models::grades::{
        entities::GradeCategory,
        requests::{CreateGradeRecordRequest, UpdateGradeRecordRequest},
    };
    use crate::models::users::entities::UserRole;

    fn quiz(score: f64, max_score: f64) -> CreateGradeRecordRequest {
        CreateGradeRecordRequest {
            student_id: "alice".to_string(),
            class_id: "class-a".to_string(),
            category: GradeCategory::Quiz,
            title: "Quiz 1".to_string(),
            score,
            max_score,
            comments: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_records() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;

        let record = storage
            .create_grade_record_impl(Some("teacher"), quiz(8.0, 10.0))
            .await
            .unwrap();
        assert_eq!(record.category, GradeCategory::Quiz);
        assert_eq!(record.created_by.as_deref(), Some("teacher"));

        let records = storage
            .list_grade_records_for_student_in_class_impl("alice", "class-a")
            .await
            .unwrap();
        assert_eq!(records, vec![record]);
    }

    #[tokio::test]
    async fn test_score_invariants() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;

        let err = storage
            .create_grade_record_impl(None, quiz(11.0, 10.0))
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("score"));

        let err = storage
            .create_grade_record_impl(None, quiz(0.0, 0.0))
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("max_score"));

        let record = storage
            .create_grade_record_impl(None, quiz(8.0, 10.0))
            .await
            .unwrap();

        // 合并后的结果必须满足约束
        let err = storage
            .update_grade_record_impl(
                &record.id,
                UpdateGradeRecordRequest {
                    max_score: Some(5.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("score"));

        let updated = storage
            .update_grade_record_impl(
                &record.id,
                UpdateGradeRecordRequest {
                    score: Some(4.0),
                    max_score: Some(5.0),
                    category: Some(GradeCategory::Exam),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.score, 4.0);
        assert_eq!(updated.category, GradeCategory::Exam);
        assert_eq!(updated.title, "Quiz 1");
    }

    #[tokio::test]
    async fn test_update_sets_and_clears_comments() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let record = storage
            .create_grade_record_impl(None, quiz(8.0, 10.0))
            .await
            .unwrap();

        let updated = storage
            .update_grade_record_impl(
                &record.id,
                UpdateGradeRecordRequest {
                    comments: Some("Good work".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.comments.as_deref(), Some("Good work"));

        // 未提供评语时保留原值
        let updated = storage
            .update_grade_record_impl(
                &record.id,
                UpdateGradeRecordRequest {
                    score: Some(9.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.comments.as_deref(), Some("Good work"));

        let cleared = storage
            .update_grade_record_impl(
                &record.id,
                UpdateGradeRecordRequest {
                    comments: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.comments.is_none());
    }

    #[tokio::test]
    async fn test_create_requires_enrollment() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        fixtures::user(&storage, "bob", UserRole::Student).await;

        let mut req = quiz(5.0, 10.0);
        req.student_id = "bob".to_string();
        let err = storage.create_grade_record_impl(None, req).await.unwrap_err();
        assert_eq!(err.field(), Some("student_id"));

        let mut req = quiz(5.0, 10.0);
        req.class_id = "missing".to_string();
        let err = storage.create_grade_record_impl(None, req).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_record() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;
        let record = storage
            .create_grade_record_impl(None, quiz(5.0, 10.0))
            .await
            .unwrap();

        storage.delete_grade_record_impl(&record.id).await.unwrap();
        assert!(
            storage
                .get_grade_record_by_id_impl(&record.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .delete_grade_record_impl(&record.id)
                .await
                .unwrap_err()
                .is_not_found()
        );
    }
}
