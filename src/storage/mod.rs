use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::models::{
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentDeletion,
    },
    classes::{
        entities::{Class, Enrollment},
        requests::CreateClassRequest,
    },
    grades::{
        entities::GradeRecord,
        requests::{CreateGradeRecordRequest, UpdateGradeRecordRequest},
    },
    submissions::{
        entities::Submission,
        requests::{GradeSubmissionRequest, SubmitAssignmentRequest},
    },
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 存储接口
///
/// 业务不变量（分值范围、唯一提交、截止时间等）在实现内部保证，
/// 违反时返回 Validation / NotFound / Conflict 错误。
/// 列表方法返回按固定规则排序的完整序列，分页由调用方切片。
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 班级管理方法
    // 创建班级，instructor_id 由服务层确定
    async fn create_class(&self, instructor_id: &str, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: &str) -> Result<Option<Class>>;
    // 学生选课
    async fn enroll_student(&self, class_id: &str, student_id: &str) -> Result<Enrollment>;
    // 列出班级学生ID
    async fn list_class_student_ids(&self, class_id: &str) -> Result<Vec<String>>;
    // 列出学生所在班级（按班级名称、ID 排序）
    async fn list_student_classes(&self, student_id: &str) -> Result<Vec<Class>>;
    // 学生是否在班级中
    async fn is_enrolled(&self, class_id: &str, student_id: &str) -> Result<bool>;

    /// 作业管理方法
    async fn create_assignment(
        &self,
        created_by: Option<&str>,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: &str) -> Result<Option<Assignment>>;
    async fn update_assignment(
        &self,
        assignment_id: &str,
        update: UpdateAssignmentRequest,
    ) -> Result<Assignment>;
    // 删除作业及其全部提交
    async fn delete_assignment(&self, assignment_id: &str) -> Result<AssignmentDeletion>;
    // 按截止时间、创建时间、ID 升序
    async fn list_assignments_for_class(&self, class_id: &str) -> Result<Vec<Assignment>>;
    async fn list_assignments_for_student(&self, student_id: &str) -> Result<Vec<Assignment>>;

    /// 提交管理方法
    async fn submit(
        &self,
        assignment_id: &str,
        student_id: &str,
        req: SubmitAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission>;
    // 截止前覆盖未评分的提交
    async fn resubmit(
        &self,
        assignment_id: &str,
        student_id: &str,
        req: SubmitAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission>;
    async fn grade_submission(
        &self,
        submission_id: &str,
        req: GradeSubmissionRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: &str) -> Result<Option<Submission>>;
    // 按提交时间、ID 升序
    async fn list_submissions_for_assignment(&self, assignment_id: &str)
    -> Result<Vec<Submission>>;
    async fn list_submissions_for_student(&self, student_id: &str) -> Result<Vec<Submission>>;

    /// 手动成绩管理方法
    async fn create_grade_record(
        &self,
        created_by: Option<&str>,
        req: CreateGradeRecordRequest,
    ) -> Result<GradeRecord>;
    async fn get_grade_record_by_id(&self, grade_id: &str) -> Result<Option<GradeRecord>>;
    async fn update_grade_record(
        &self,
        grade_id: &str,
        update: UpdateGradeRecordRequest,
    ) -> Result<GradeRecord>;
    async fn delete_grade_record(&self, grade_id: &str) -> Result<()>;
    // 按创建时间、ID 升序
    async fn list_grade_records_for_student_in_class(
        &self,
        student_id: &str,
        class_id: &str,
    ) -> Result<Vec<GradeRecord>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
