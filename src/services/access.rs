//! 资源访问校验
//!
//! 角色由路由上的 RequireRole 粗粒度限制，这里负责到具体班级、学生的细粒度校验。

use actix_web::HttpRequest;

use crate::errors::{GradebookError, Result};
use crate::middlewares::RequireActor;
use crate::models::classes::entities::Class;
use crate::models::users::entities::User;
use crate::storage::Storage;

/// 取出当前用户
pub(crate) fn current_actor(request: &HttpRequest) -> Result<User> {
    RequireActor::extract_actor(request)
        .ok_or_else(|| GradebookError::authentication("Authentication required"))
}

/// 班级教师或管理员可以管理班级
pub(crate) fn can_manage_class(actor: &User, class: &Class) -> bool {
    actor.is_admin() || class.instructor_id == actor.id
}

/// 加载班级并要求当前用户可管理
pub(crate) async fn require_managed_class(
    storage: &dyn Storage,
    actor: &User,
    class_id: &str,
) -> Result<Class> {
    let class = storage
        .get_class_by_id(class_id)
        .await?
        .ok_or_else(|| GradebookError::not_found(format!("Class not found: {class_id}")))?;

    if !can_manage_class(actor, &class) {
        return Err(GradebookError::authorization(
            "Only the class instructor or an administrator can perform this action",
        ));
    }
    Ok(class)
}

/// 加载班级并要求当前用户为班级管理者或已选课学生
pub(crate) async fn require_class_member(
    storage: &dyn Storage,
    actor: &User,
    class_id: &str,
) -> Result<Class> {
    let class = storage
        .get_class_by_id(class_id)
        .await?
        .ok_or_else(|| GradebookError::not_found(format!("Class not found: {class_id}")))?;

    if can_manage_class(actor, &class) || storage.is_enrolled(class_id, &actor.id).await? {
        Ok(class)
    } else {
        Err(GradebookError::authorization(
            "You are not a member of this class",
        ))
    }
}

/// 学生本人、其任一班级的教师或管理员可以查看学生数据
pub(crate) async fn ensure_can_view_student(
    storage: &dyn Storage,
    actor: &User,
    student_id: &str,
) -> Result<()> {
    if actor.id == student_id || actor.is_admin() {
        return Ok(());
    }
    if !actor.is_student() {
        let classes = storage.list_student_classes(student_id).await?;
        if classes.iter().any(|c| c.instructor_id == actor.id) {
            return Ok(());
        }
    }
    Err(GradebookError::authorization(
        "You do not have permission to view this student's records",
    ))
}

/// 学生本人或该班级的管理者
pub(crate) async fn ensure_can_view_student_in_class(
    storage: &dyn Storage,
    actor: &User,
    student_id: &str,
    class_id: &str,
) -> Result<()> {
    if actor.id == student_id {
        return Ok(());
    }
    require_managed_class(storage, actor, class_id).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::fixtures;

    fn user(id: &str, role: UserRole) -> User {
        User {
            id: id.to_string(),
            display_name: id.to_string(),
            email: None,
            role,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_class_management_permissions() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;

        let teacher = user("teacher", UserRole::Instructor);
        let other = user("other", UserRole::Instructor);
        let admin = user("root", UserRole::Admin);

        assert!(require_managed_class(&storage, &teacher, "class-a").await.is_ok());
        assert!(require_managed_class(&storage, &admin, "class-a").await.is_ok());
        let err = require_managed_class(&storage, &other, "class-a")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "authorization_error");
        assert!(
            require_managed_class(&storage, &teacher, "missing")
                .await
                .unwrap_err()
                .is_not_found()
        );
    }

    #[tokio::test]
    async fn test_student_visibility() {
        let storage = fixtures::storage().await;
        fixtures::classroom(&storage).await;

        let alice = user("alice", UserRole::Student);
        let bob = user("bob", UserRole::Student);
        let teacher = user("teacher", UserRole::Instructor);
        let stranger = user("stranger", UserRole::Instructor);

        assert!(ensure_can_view_student(&storage, &alice, "alice").await.is_ok());
        assert!(ensure_can_view_student(&storage, &teacher, "alice").await.is_ok());
        assert!(ensure_can_view_student(&storage, &bob, "alice").await.is_err());
        assert!(ensure_can_view_student(&storage, &stranger, "alice").await.is_err());
    }
}
