use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Class {
    // 班级ID
    pub id: String,
    // 所属课程（外部引用）
    pub course_id: String,
    // 班级名称
    pub class_name: String,
    // 授课教师ID
    pub instructor_id: String,
    // 课表信息
    pub schedule: Option<String>,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct Enrollment {
    pub class_id: String,
    pub student_id: String,
    pub joined_at: chrono::DateTime<chrono::Utc>,
}

// 班级详情（含选课学生）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub class: Class,
    pub student_ids: Vec<String>,
}
