use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 初始化默认管理员账号
/// 如果数据库中没有任何用户，则以配置中的 admin_id 创建管理员
async fn seed_admin(storage: &Arc<dyn Storage>) {
    // 检查是否已有用户
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let config = AppConfig::get();
    let admin_request = CreateUserRequest {
        id: Some(config.app.admin_id.clone()),
        display_name: "Administrator".to_string(),
        email: None,
        role: UserRole::Admin,
    };

    match storage.create_user(admin_request).await {
        Ok(user) => {
            warn!("==========================================================");
            warn!("  Default admin account created (ID: {})", user.id);
            warn!("  Send it in the X-User-Id header to act as administrator");
            warn!("==========================================================");
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储初始化、数据库迁移和管理员账号
pub async fn prepare_server_startup() -> StartupContext {
    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认管理员账号（如果需要）
    seed_admin(&storage).await;

    StartupContext { storage }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::fixtures;

    #[tokio::test]
    async fn test_seed_admin_only_on_empty_database() {
        let storage: Arc<dyn Storage> = Arc::new(fixtures::storage().await);

        seed_admin(&storage).await;
        assert_eq!(storage.count_users().await.unwrap(), 1);
        let admin_id = &AppConfig::get().app.admin_id;
        let admin = storage.get_user_by_id(admin_id).await.unwrap().unwrap();
        assert!(admin.is_admin());

        // 再次执行不会重复创建
        seed_admin(&storage).await;
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }
}
