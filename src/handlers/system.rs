//! 시스템 정보 핸들러

use actix_web::{HttpResponse, get};
use serde_json::json;

use crate::config::ServerConfig;

/// `{version, version_date}`
#[get("/version")]
pub async fn version() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "version": ServerConfig::api_version(),
        "version_date": ServerConfig::api_version_date(),
    }))
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "message": "시스템이 정상적으로 작동 중입니다.",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    #[actix_web::test]
    async fn test_health_and_version() {
        let app = test::init_service(
            App::new().service(web::scope("/system").service(health).service(version)),
        )
        .await;

        let req = test::TestRequest::get().uri("/system/health").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["message"], "시스템이 정상적으로 작동 중입니다.");

        let req = test::TestRequest::get().uri("/system/version").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["version"].is_string());
        assert!(body["version_date"].is_string());
    }
}
