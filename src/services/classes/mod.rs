pub mod create;
pub mod enroll;
pub mod get;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::assignments::requests::AssignmentListParams;
use crate::models::classes::requests::{CreateClassRequest, EnrollStudentRequest};
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn create_class(
        &self,
        request: &HttpRequest,
        class_data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_class(self, request, class_data).await
    }

    // 根据班级 ID 获取班级信息（含选课学生）
    pub async fn get_class(&self, request: &HttpRequest, class_id: String) -> ActixResult<HttpResponse> {
        get::get_class(self, request, class_id).await
    }

    // 学生选课
    pub async fn enroll_student(
        &self,
        request: &HttpRequest,
        class_id: String,
        enroll_data: EnrollStudentRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::enroll_student(self, request, class_id, enroll_data).await
    }

    // 班级作业列表
    pub async fn list_class_assignments(
        &self,
        request: &HttpRequest,
        class_id: String,
        query: AssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        get::list_class_assignments(self, request, class_id, query).await
    }
}
