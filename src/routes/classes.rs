use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::AssignmentListParams;
use crate::models::classes::requests::{CreateClassRequest, EnrollStudentRequest};
use crate::models::users::entities::UserRole;
use crate::services::{ClassService, GradeService, ReportService};
use crate::utils::{SafeClassId, SafeStudentId};

// 懒加载的全局服务实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);
static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

// 创建班级
pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

// 获取班级详情
pub async fn get_class(req: HttpRequest, class_id: SafeClassId) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req, class_id.0).await
}

// 学生选课
pub async fn enroll_student(
    req: HttpRequest,
    class_id: SafeClassId,
    enroll_data: web::Json<EnrollStudentRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .enroll_student(&req, class_id.0, enroll_data.into_inner())
        .await
}

// 班级作业列表
pub async fn list_class_assignments(
    req: HttpRequest,
    class_id: SafeClassId,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .list_class_assignments(&req, class_id.0, query.into_inner())
        .await
}

// 学生在班级中的手动成绩
pub async fn list_student_grades(
    req: HttpRequest,
    class_id: SafeClassId,
    student_id: SafeStudentId,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .list_student_grades(&req, class_id.0, student_id.0)
        .await
}

// 学生的班级成绩报告
pub async fn get_class_report(
    req: HttpRequest,
    class_id: SafeClassId,
    student_id: SafeStudentId,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .get_class_report(&req, class_id.0, student_id.0)
        .await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireActor)
            .service(
                web::resource("")
                    // 创建班级 - 仅教师和管理员
                    .route(
                        web::post()
                            .to(create_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            // 班级详情 - 班级成员可访问（业务层校验）
            .service(web::resource("/{class_id}").route(web::get().to(get_class)))
            .service(
                web::resource("/{class_id}/students")
                    // 选课 - 仅教师和管理员
                    .route(
                        web::post()
                            .to(enroll_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::instructor_roles())),
                    ),
            )
            .service(
                web::resource("/{class_id}/assignments").route(web::get().to(list_class_assignments)),
            )
            // 学生本人或班级教师可访问（业务层校验）
            .service(
                web::resource("/{class_id}/students/{student_id}/grades")
                    .route(web::get().to(list_student_grades)),
            )
            .service(
                web::resource("/{class_id}/students/{student_id}/report")
                    .route(web::get().to(get_class_report)),
            ),
    );
}
