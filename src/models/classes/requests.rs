use serde::Deserialize;
use ts_rs::TS;

// 创建班级请求
//
// # instructor_id 字段说明
// - **教师创建**：可选字段，不填写则使用当前教师的 ID
// - **管理员创建**：必填字段，用于指定负责该班级的教师
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct CreateClassRequest {
    pub id: Option<String>,
    pub course_id: String,
    pub class_name: String,
    pub instructor_id: Option<String>,
    pub schedule: Option<String>,
}

// 学生选课请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct EnrollStudentRequest {
    pub student_id: String,
}
