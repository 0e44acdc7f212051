use super::{SeaOrmStorage, new_id, write_error};
use crate::entity::users::{ActiveModel, Entity as Users};
use crate::errors::{GradebookError, Result};
use crate::models::users::{entities::User, requests::CreateUserRequest};
use crate::utils::extractor::is_valid_id;
use crate::utils::validate::{validate_email, validate_name};
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let id = match req.id {
            Some(id) if is_valid_id(&id) => id,
            Some(id) => {
                return Err(GradebookError::invalid_field(
                    "id",
                    format!("Invalid user id: '{id}'"),
                ));
            }
            None => new_id(),
        };
        let display_name = validate_name("display_name", &req.display_name)?;
        if let Some(ref email) = req.email {
            validate_email(email)?;
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(id),
            display_name: Set(display_name),
            email: Set(req.email),
            role: Set(req.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "User id already exists", "创建用户失败"))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: &str) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 查询用户，不存在时返回 NotFound
    pub(crate) async fn require_user(&self, id: &str) -> Result<User> {
        self.get_user_by_id_impl(id)
            .await?
            .ok_or_else(|| GradebookError::not_found(format!("User not found: {id}")))
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("统计用户数量失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};

    #[tokio::test]
    async fn test_create_and_get_user() {
        let storage = fixtures::storage().await;
        let user = storage
            .create_user_impl(CreateUserRequest {
                id: None,
                display_name: "  Alice  ".to_string(),
                email: Some("alice@school.edu".to_string()),
                role: UserRole::Student,
            })
            .await
            .unwrap();

        assert_eq!(user.display_name, "Alice");
        let fetched = storage.get_user_by_id_impl(&user.id).await.unwrap().unwrap();
        assert_eq!(fetched.role, UserRole::Student);
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_user_id_is_conflict() {
        let storage = fixtures::storage().await;
        fixtures::user(&storage, "bob", UserRole::Student).await;

        let err = storage
            .create_user_impl(CreateUserRequest {
                id: Some("bob".to_string()),
                display_name: "Bob again".to_string(),
                email: None,
                role: UserRole::Student,
            })
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_invalid_user_input() {
        let storage = fixtures::storage().await;
        let err = storage
            .create_user_impl(CreateUserRequest {
                id: Some("bad id".to_string()),
                display_name: "X".to_string(),
                email: None,
                role: UserRole::Student,
            })
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("id"));

        let err = storage
            .create_user_impl(CreateUserRequest {
                id: None,
                display_name: "X".to_string(),
                email: Some("nope".to_string()),
                role: UserRole::Student,
            })
            .await
            .unwrap_err();
        assert_eq!(err.field(), Some("email"));
    }
}
