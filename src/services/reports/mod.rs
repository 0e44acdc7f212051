pub mod aggregate;
pub mod class_report;
pub mod overall_report;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::storage::Storage;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
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

    // 学生在单个班级的成绩报告
    pub async fn get_class_report(
        &self,
        request: &HttpRequest,
        class_id: String,
        student_id: String,
    ) -> ActixResult<HttpResponse> {
        class_report::get_class_report(self, request, class_id, student_id).await
    }

    // 学生的总成绩报告
    pub async fn get_overall_report(
        &self,
        request: &HttpRequest,
        student_id: String,
    ) -> ActixResult<HttpResponse> {
        overall_report::get_overall_report(self, request, student_id).await
    }
}
