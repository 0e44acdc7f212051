use super::entities::UserRole;
use serde::Deserialize;
use ts_rs::TS;

// 用户创建请求
//
// 身份认证由外部网关负责，这里只登记学生/教师的基本信息。
// id 可由调用方指定（与外部身份系统对齐），不填则自动生成。
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub id: Option<String>,
    pub display_name: String,
    pub email: Option<String>,
    pub role: UserRole,
}
