//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod classes;
mod grade_records;
mod submissions;
mod users;

#[cfg(test)]
pub(crate) mod fixtures;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{GradebookError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database).await
    }

    /// 根据数据库配置连接并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Self::migrate(&db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// 单连接的内存 SQLite，连接关闭即丢弃数据
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Result<Self> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| GradebookError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("SQLite 连接失败: {e}")))?;

        let db = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);
        Self::migrate(&db).await?;
        Ok(Self { db })
    }

    async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .map_err(|e| GradebookError::database_operation(format!("数据库迁移失败: {e}")))
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GradebookError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GradebookError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 写入失败的错误转换：唯一约束冲突为业务冲突，其余为数据库错误
pub(crate) fn write_error(err: DbErr, conflict_message: &str, context: &str) -> GradebookError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => GradebookError::conflict(conflict_message),
        _ => GradebookError::database_operation(format!("{context}: {err}")),
    }
}

/// 生成新的资源 ID
pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 班级模块
    async fn create_class(&self, instructor_id: &str, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(instructor_id, class).await
    }

    async fn get_class_by_id(&self, class_id: &str) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn enroll_student(&self, class_id: &str, student_id: &str) -> Result<Enrollment> {
        self.enroll_student_impl(class_id, student_id).await
    }

    async fn list_class_student_ids(&self, class_id: &str) -> Result<Vec<String>> {
        self.list_class_student_ids_impl(class_id).await
    }

    async fn list_student_classes(&self, student_id: &str) -> Result<Vec<Class>> {
        self.list_student_classes_impl(student_id).await
    }

    async fn is_enrolled(&self, class_id: &str, student_id: &str) -> Result<bool> {
        self.is_enrolled_impl(class_id, student_id).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        created_by: Option<&str>,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(created_by, req).await
    }

    async fn get_assignment_by_id(&self, assignment_id: &str) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn update_assignment(
        &self,
        assignment_id: &str,
        update: UpdateAssignmentRequest,
    ) -> Result<Assignment> {
        self.update_assignment_impl(assignment_id, update).await
    }

    async fn delete_assignment(&self, assignment_id: &str) -> Result<AssignmentDeletion> {
        self.delete_assignment_impl(assignment_id).await
    }

    async fn list_assignments_for_class(&self, class_id: &str) -> Result<Vec<Assignment>> {
        self.list_assignments_for_class_impl(class_id).await
    }

    async fn list_assignments_for_student(&self, student_id: &str) -> Result<Vec<Assignment>> {
        self.list_assignments_for_student_impl(student_id).await
    }

    // 提交模块
    async fn submit(
        &self,
        assignment_id: &str,
        student_id: &str,
        req: SubmitAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        self.submit_impl(assignment_id, student_id, req, now).await
    }

    async fn resubmit(
        &self,
        assignment_id: &str,
        student_id: &str,
        req: SubmitAssignmentRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        self.resubmit_impl(assignment_id, student_id, req, now)
            .await
    }

    async fn grade_submission(
        &self,
        submission_id: &str,
        req: GradeSubmissionRequest,
        now: DateTime<Utc>,
    ) -> Result<Submission> {
        self.grade_submission_impl(submission_id, req, now).await
    }

    async fn get_submission_by_id(&self, submission_id: &str) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn list_submissions_for_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<Submission>> {
        self.list_submissions_for_assignment_impl(assignment_id)
            .await
    }

    async fn list_submissions_for_student(&self, student_id: &str) -> Result<Vec<Submission>> {
        self.list_submissions_for_student_impl(student_id).await
    }

    // 手动成绩模块
    async fn create_grade_record(
        &self,
        created_by: Option<&str>,
        req: CreateGradeRecordRequest,
    ) -> Result<GradeRecord> {
        self.create_grade_record_impl(created_by, req).await
    }

    async fn get_grade_record_by_id(&self, grade_id: &str) -> Result<Option<GradeRecord>> {
        self.get_grade_record_by_id_impl(grade_id).await
    }

    async fn update_grade_record(
        &self,
        grade_id: &str,
        update: UpdateGradeRecordRequest,
    ) -> Result<GradeRecord> {
        self.update_grade_record_impl(grade_id, update).await
    }

    async fn delete_grade_record(&self, grade_id: &str) -> Result<()> {
        self.delete_grade_record_impl(grade_id).await
    }

    async fn list_grade_records_for_student_in_class(
        &self,
        student_id: &str,
        class_id: &str,
    ) -> Result<Vec<GradeRecord>> {
        self.list_grade_records_for_student_in_class_impl(student_id, class_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("gradebook.db").unwrap(),
            "sqlite://gradebook.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").unwrap(),
            "postgres://u:p@localhost/db"
        );
        assert!(SeaOrmStorage::build_database_url("ftp://nowhere").is_err());
    }
}
