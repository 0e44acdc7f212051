pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod stats;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{GradebookError, Result};
use crate::models::assignments::entities::Assignment;
use crate::models::assignments::requests::{
    CreateAssignmentRequest, StudentAssignmentListParams, UpdateAssignmentRequest,
};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
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

    // 布置作业
    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        req: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, req).await
    }

    // 获取作业详情
    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: String,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, request, assignment_id).await
    }

    // 更新作业
    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: String,
        update: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, request, assignment_id, update).await
    }

    // 删除作业
    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: String,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, request, assignment_id).await
    }

    // 作业统计
    pub async fn get_assignment_stats(
        &self,
        request: &HttpRequest,
        assignment_id: String,
    ) -> ActixResult<HttpResponse> {
        stats::get_assignment_stats(self, request, assignment_id).await
    }

    // 学生作业列表
    pub async fn list_student_assignments(
        &self,
        request: &HttpRequest,
        student_id: String,
        query: StudentAssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_student_assignments(self, request, student_id, query).await
    }
}

/// 加载作业，不存在时返回 NotFound
pub(crate) async fn require_assignment(
    storage: &dyn Storage,
    assignment_id: &str,
) -> Result<Assignment> {
    storage
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or_else(|| GradebookError::not_found(format!("Assignment not found: {assignment_id}")))
}
