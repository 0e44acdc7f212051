pub mod create;
pub mod detail;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{GradebookError, Result};
use crate::models::grades::entities::GradeRecord;
use crate::models::grades::requests::{CreateGradeRecordRequest, UpdateGradeRecordRequest};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
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

    // 录入手动成绩
    pub async fn create_grade(
        &self,
        request: &HttpRequest,
        req: CreateGradeRecordRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_grade(self, request, req).await
    }

    pub async fn get_grade(&self, request: &HttpRequest, grade_id: String) -> ActixResult<HttpResponse> {
        detail::get_grade(self, request, grade_id).await
    }

    pub async fn update_grade(
        &self,
        request: &HttpRequest,
        grade_id: String,
        update: UpdateGradeRecordRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_grade(self, request, grade_id, update).await
    }

    pub async fn delete_grade(
        &self,
        request: &HttpRequest,
        grade_id: String,
    ) -> ActixResult<HttpResponse> {
        update::delete_grade(self, request, grade_id).await
    }

    // 学生在某班级的手动成绩
    pub async fn list_student_grades(
        &self,
        request: &HttpRequest,
        class_id: String,
        student_id: String,
    ) -> ActixResult<HttpResponse> {
        list::list_student_grades(self, request, class_id, student_id).await
    }
}

/// 加载成绩记录，不存在时返回 NotFound
pub(crate) async fn require_grade(storage: &dyn Storage, grade_id: &str) -> Result<GradeRecord> {
    storage
        .get_grade_record_by_id(grade_id)
        .await?
        .ok_or_else(|| GradebookError::not_found(format!("Grade record not found: {grade_id}")))
}
