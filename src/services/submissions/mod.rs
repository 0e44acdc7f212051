pub mod detail;
pub mod grade;
pub mod list;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::{
    GradeSubmissionRequest, SubmissionListParams, SubmitAssignmentRequest,
};
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
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

    // 学生提交作业
    pub async fn submit(
        &self,
        request: &HttpRequest,
        assignment_id: String,
        req: SubmitAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit(self, request, assignment_id, req).await
    }

    // 学生在截止前重新提交
    pub async fn resubmit(
        &self,
        request: &HttpRequest,
        assignment_id: String,
        req: SubmitAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        submit::resubmit(self, request, assignment_id, req).await
    }

    // 教师评分
    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        submission_id: String,
        req: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, request, submission_id, req).await
    }

    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        submission_id: String,
    ) -> ActixResult<HttpResponse> {
        detail::get_submission(self, request, submission_id).await
    }

    // 作业的全部提交
    pub async fn list_assignment_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: String,
        query: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_assignment_submissions(self, request, assignment_id, query).await
    }

    // 学生的全部提交
    pub async fn list_student_submissions(
        &self,
        request: &HttpRequest,
        student_id: String,
        query: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_student_submissions(self, request, student_id, query).await
    }
}
