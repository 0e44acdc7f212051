//! 存储层测试用的数据构造

use chrono::{DateTime, Utc};

use super::SeaOrmStorage;
use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    classes::{entities::Class, requests::CreateClassRequest},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};

pub(crate) async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::new_in_memory()
        .await
        .expect("in-memory storage")
}

pub(crate) fn at(ts: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(ts)
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

pub(crate) async fn user(storage: &SeaOrmStorage, id: &str, role: UserRole) -> User {
    storage
        .create_user_impl(CreateUserRequest {
            id: Some(id.to_string()),
            display_name: format!("User {id}"),
            email: None,
            role,
        })
        .await
        .expect("create user")
}

pub(crate) async fn class(
    storage: &SeaOrmStorage,
    id: &str,
    instructor_id: &str,
    class_name: &str,
) -> Class {
    storage
        .create_class_impl(
            instructor_id,
            CreateClassRequest {
                id: Some(id.to_string()),
                course_id: "course-1".to_string(),
                class_name: class_name.to_string(),
                instructor_id: None,
                schedule: None,
            },
        )
        .await
        .expect("create class")
}

pub(crate) async fn enroll(storage: &SeaOrmStorage, class_id: &str, student_id: &str) {
    storage
        .enroll_student_impl(class_id, student_id)
        .await
        .expect("enroll student");
}

pub(crate) async fn assignment(
    storage: &SeaOrmStorage,
    class_id: &str,
    title: &str,
    due_at: &str,
    total_points: f64,
) -> Assignment {
    storage
        .create_assignment_impl(
            Some("teacher"),
            CreateAssignmentRequest {
                class_id: class_id.to_string(),
                title: title.to_string(),
                description: None,
                due_at: due_at.to_string(),
                total_points,
            },
        )
        .await
        .expect("create assignment")
}

/// 一名教师、一个班级、一名已选课学生
pub(crate) async fn classroom(storage: &SeaOrmStorage) {
    user(storage, "teacher", UserRole::Instructor).await;
    user(storage, "alice", UserRole::Student).await;
    class(storage, "class-a", "teacher", "Class A").await;
    enroll(storage, "class-a", "alice").await;
}
