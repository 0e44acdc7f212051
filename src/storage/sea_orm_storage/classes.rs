//! 班级与选课存储操作

use super::{SeaOrmStorage, new_id, write_error};
use crate::entity::class_users::{
    ActiveModel as ClassUserActiveModel, Column as ClassUserColumn, Entity as ClassUsers,
};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{GradebookError, Result};
use crate::models::{
    classes::{
        entities::{Class, Enrollment},
        requests::CreateClassRequest,
    },
    users::entities::UserRole,
};
use crate::utils::extractor::is_valid_id;
use crate::utils::validate::validate_name;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 创建班级
    pub async fn create_class_impl(
        &self,
        instructor_id: &str,
        req: CreateClassRequest,
    ) -> Result<Class> {
        let id = match req.id {
            Some(id) if is_valid_id(&id) => id,
            Some(id) => {
                return Err(GradebookError::invalid_field(
                    "id",
                    format!("Invalid class id: '{id}'"),
                ));
            }
            None => new_id(),
        };
        let class_name = validate_name("class_name", &req.class_name)?;
        let course_id = validate_name("course_id", &req.course_id)?;

        let instructor = self.require_user(instructor_id).await?;
        if instructor.role == UserRole::Student {
            return Err(GradebookError::invalid_field(
                "instructor_id",
                format!("User {instructor_id} is not an instructor"),
            ));
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(id),
            course_id: Set(course_id),
            class_name: Set(class_name),
            instructor_id: Set(instructor.id),
            schedule: Set(req.schedule),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "Class id already exists", "创建班级失败"))?;

        Ok(result.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: &str) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 查询班级，不存在时返回 NotFound
    pub(crate) async fn require_class(&self, class_id: &str) -> Result<Class> {
        self.get_class_by_id_impl(class_id)
            .await?
            .ok_or_else(|| GradebookError::not_found(format!("Class not found: {class_id}")))
    }

    /// 学生选课
    pub async fn enroll_student_impl(&self, class_id: &str, student_id: &str) -> Result<Enrollment> {
        self.require_class(class_id).await?;
        let student = self.require_user(student_id).await?;
        if !student.is_student() {
            return Err(GradebookError::invalid_field(
                "student_id",
                format!("User {student_id} is not a student"),
            ));
        }

        let model = ClassUserActiveModel {
            class_id: Set(class_id.to_string()),
            user_id: Set(student_id.to_string()),
            joined_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            write_error(e, "Student is already enrolled in this class", "选课失败")
        })?;

        Ok(result.into_enrollment())
    }

    /// 列出班级学生 ID
    pub async fn list_class_student_ids_impl(&self, class_id: &str) -> Result<Vec<String>> {
        ClassUsers::find()
            .select_only()
            .column(ClassUserColumn::UserId)
            .filter(ClassUserColumn::ClassId.eq(class_id))
            .order_by_asc(ClassUserColumn::UserId)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级成员失败: {e}")))
    }

    /// 学生所在班级的 ID 列表
    pub(crate) async fn student_class_ids(&self, student_id: &str) -> Result<Vec<String>> {
        ClassUsers::find()
            .select_only()
            .column(ClassUserColumn::ClassId)
            .filter(ClassUserColumn::UserId.eq(student_id))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询选课记录失败: {e}")))
    }

    /// 列出学生所在班级
    pub async fn list_student_classes_impl(&self, student_id: &str) -> Result<Vec<Class>> {
        self.require_user(student_id).await?;
        let class_ids = self.student_class_ids(student_id).await?;
        if class_ids.is_empty() {
            return Ok(Vec::new());
        }

        let classes = Classes::find()
            .filter(Column::Id.is_in(class_ids))
            .order_by_asc(Column::ClassName)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }

    /// 学生是否已选该班级
    pub async fn is_enrolled_impl(&self, class_id: &str, student_id: &str) -> Result<bool> {
        let count = ClassUsers::find()
            .filter(
                Condition::all()
                    .add(ClassUserColumn::ClassId.eq(class_id))
                    .add(ClassUserColumn::UserId.eq(student_id)),
            )
            .count(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询选课记录失败: {e}")))?;

        Ok(count > 0)
    }
}
