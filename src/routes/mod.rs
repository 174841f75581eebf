//! API 라우트 설정 모듈
//!
//! 모든 엔드포인트는 `/{API_PREFIX}` (기본 `api`) 아래에 등록됩니다.
//!
//! | 스코프 | 핸들러 |
//! |--------|--------|
//! | `/user` | 회원가입, 로그인, 로그아웃, 프로필, 토큰 갱신 |
//! | `/` | 인증번호 발송/확인 |
//! | `/google`, `/kakao`, `/naver` | 소셜 로그인 |
//! | `/system` | 버전, 헬스체크 |
//!
//! 인증이 필요한 핸들러는 `wrap = "AuthMiddleware::required()"`로 개별 지정합니다.
//!
//! ```rust,ignore
//! let app = App::new().configure(configure_all_routes);
//! ```

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, web};

use crate::config::ServerConfig;
use crate::core::errors::AppError;
use crate::handlers;

pub const MISSING_BODY_MESSAGE: &str = "요청 데이터가 없습니다.";

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    configure_routes(cfg, &ServerConfig::api_prefix());
}

/// 지정한 접두사 아래에 라우트를 등록합니다. 빈 접두사는 루트에 등록합니다.
pub fn configure_routes(cfg: &mut web::ServiceConfig, prefix: &str) {
    let scope_path = if prefix.is_empty() {
        String::new()
    } else {
        format!("/{}", prefix)
    };

    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::scope(&scope_path)
                .service(user_scope())
                .service(oauth_scope("/google", configure_google))
                .service(oauth_scope("/kakao", configure_kakao))
                .service(oauth_scope("/naver", configure_naver))
                .service(
                    web::scope("/system")
                        .service(handlers::system::version)
                        .service(handlers::system::health),
                )
                .service(handlers::certification::send_certification_code)
                .service(handlers::certification::verify_certification_code),
        );
}

fn user_scope() -> actix_web::Scope {
    web::scope("/user")
        .service(handlers::users::register)
        .service(handlers::users::login)
        .service(handlers::users::logout)
        .service(handlers::users::get_profile)
        .service(handlers::users::update_profile)
        .service(handlers::users::refresh_token)
}

fn oauth_scope(path: &str, configure: fn(&mut web::ServiceConfig)) -> actix_web::Scope {
    web::scope(path).configure(configure)
}

fn configure_google(cfg: &mut web::ServiceConfig) {
    use handlers::google::*;
    cfg.service(login)
        .service(auth_url)
        .service(callback)
        .service(callback_redirect)
        .service(refresh_token)
        .service(user_info)
        .service(debug);
}

fn configure_kakao(cfg: &mut web::ServiceConfig) {
    use handlers::kakao::*;
    cfg.service(login)
        .service(auth_url)
        .service(callback)
        .service(callback_redirect)
        .service(refresh_token)
        .service(user_info)
        .service(send_message)
        .service(debug);
}

fn configure_naver(cfg: &mut web::ServiceConfig) {
    use handlers::naver::*;
    cfg.service(login)
        .service(auth_url)
        .service(callback)
        .service(callback_redirect)
        .service(refresh_token)
        .service(user_info)
        .service(debug);
}

/// 본문 누락/파싱 실패는 모두 400 "요청 데이터가 없습니다."
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("JSON 요청 파싱 실패: {}", err);
    AppError::ValidationError(MISSING_BODY_MESSAGE.to_string()).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    log::warn!("쿼리 파라미터 파싱 실패: {}", err);
    AppError::ValidationError(MISSING_BODY_MESSAGE.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test};

    #[actix_web::test]
    async fn test_routes_are_mounted_under_prefix() {
        let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, "api"))).await;

        let req = test::TestRequest::get().uri("/api/system/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let req = test::TestRequest::get().uri("/system/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_missing_body_is_rejected() {
        let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, "api"))).await;

        let req = test::TestRequest::post()
            .uri("/api/user/register")
            .insert_header(("Content-Type", "application/json"))
            .set_payload("not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], MISSING_BODY_MESSAGE);
        assert_eq!(body["error"], "VALIDATION_ERROR");
    }

    #[actix_web::test]
    async fn test_callback_error_param_is_bad_request() {
        let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, "api"))).await;

        let req = test::TestRequest::get()
            .uri("/api/kakao/callback?error=access_denied&error_description=user%20cancelled")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
    }

    #[actix_web::test]
    async fn test_protected_route_requires_token() {
        let app = test::init_service(App::new().configure(|cfg| configure_routes(cfg, "api"))).await;

        let req = test::TestRequest::post().uri("/api/user/logout").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);
    }
}
