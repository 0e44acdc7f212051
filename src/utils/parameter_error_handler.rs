//! 请求参数解析失败时的统一错误处理
//!
//! 将 actix 默认的纯文本错误转换为带 `validation_error` 的标准响应。

use actix_web::{
    HttpRequest,
    error::{JsonPayloadError, QueryPayloadError},
    web,
};
use tracing::debug;

use crate::errors::GradebookError;

/// JSON 解析配置：`Json<T>` 不读取 `PayloadConfig`，体积上限需单独设置
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(json_error_handler)
}

pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("JSON payload rejected for {}: {}", req.path(), err);
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::Deserialize(e) => format!("Invalid request body: {e}"),
        JsonPayloadError::Overflow { limit } | JsonPayloadError::OverflowKnownLength { limit, .. } => {
            format!("Request body exceeds the {limit} byte limit")
        }
        other => format!("Invalid request body: {other}"),
    };
    GradebookError::invalid_field("body", message).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Query string rejected for {}: {}", req.path(), err);
    GradebookError::invalid_field("query", format!("Invalid query parameters: {err}")).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, http::StatusCode, test};

    async fn echo(body: web::Json<serde_json::Value>) -> HttpResponse {
        HttpResponse::Ok().json(body.into_inner())
    }

    #[actix_web::test]
    async fn test_json_config_applies_limit() {
        let app = test::init_service(
            App::new()
                .app_data(json_config(32))
                .route("/", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/")
            .set_json(serde_json::json!({ "content": "ok" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/")
            .set_json(serde_json::json!({ "content": "x".repeat(64) }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_malformed_json_is_validation_error() {
        let app = test::init_service(
            App::new()
                .app_data(json_config(1024))
                .route("/", web::post().to(echo)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
