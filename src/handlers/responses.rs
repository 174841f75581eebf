//! 핸들러 공통 응답 조립
//!
//! 로그인 성공 시 JWT는 본문과 함께 `X-Access-Token` / `X-Refresh-Token`
//! 헤더로도 내려가며, GET 콜백은 같은 값을 쿠키로 설정합니다.

use actix_web::cookie::{Cookie, SameSite};
use actix_web::{HttpResponse, HttpResponseBuilder};
use serde::Serialize;

use crate::config::CookieConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::oauth::{OAuthCallbackQuery, OAuthCallbackResponse};
use crate::domain::models::token::token::TokenPair;
use crate::services::auth::OAuthLoginResult;

pub const ACCESS_TOKEN_HEADER: &str = "X-Access-Token";
pub const REFRESH_TOKEN_HEADER: &str = "X-Refresh-Token";
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

pub fn with_token_headers<'a>(
    builder: &'a mut HttpResponseBuilder,
    tokens: &TokenPair,
) -> &'a mut HttpResponseBuilder {
    builder
        .insert_header((ACCESS_TOKEN_HEADER, tokens.access_token.as_str()))
        .insert_header((REFRESH_TOKEN_HEADER, tokens.refresh_token.as_str()))
}

/// HttpOnly, SameSite=Lax, `COOKIE_SECURE`에 따른 Secure
pub fn token_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build(name, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .finish()
}

#[derive(Debug, Serialize)]
pub struct OAuthLoginData {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    #[serde(flatten)]
    pub provider_info: serde_json::Map<String, serde_json::Value>,
}

/// `/login` 응답: 토큰 + `<provider>_info`, 토큰 헤더 포함
pub fn oauth_login_response(result: OAuthLoginResult, message: &str) -> HttpResponse {
    let provider_info = result.profile.login_info(&result.user.email);

    let tokens = result.tokens;
    let data = OAuthLoginData {
        access_token: tokens.access_token.clone(),
        refresh_token: tokens.refresh_token.clone(),
        token_type: tokens.token_type.clone(),
        provider_info,
    };

    with_token_headers(&mut HttpResponse::Ok(), &tokens).json(ApiResponse::success(message, data))
}

/// `/callback` 응답. `set_cookies`가 참이면 토큰 쿠키를 함께 설정합니다.
pub fn oauth_callback_response(result: OAuthLoginResult, set_cookies: bool) -> HttpResponse {
    let tokens = result.tokens;
    let data = OAuthCallbackResponse {
        is_need_info: result.is_new_user,
        access_token: tokens.access_token.clone(),
        refresh_token: tokens.refresh_token.clone(),
    };

    let mut builder = HttpResponse::Ok();
    with_token_headers(&mut builder, &tokens);

    if set_cookies {
        let secure = CookieConfig::secure();
        builder
            .cookie(token_cookie(ACCESS_TOKEN_COOKIE, tokens.access_token, secure))
            .cookie(token_cookie(REFRESH_TOKEN_COOKIE, tokens.refresh_token, secure));
    }

    builder.json(ApiResponse::success("로그인이 완료되었습니다.", data))
}

/// GET 콜백 쿼리에서 인가 코드를 꺼냅니다. 프로바이더가 `error`를 보냈으면 400.
pub fn callback_code(query: &OAuthCallbackQuery) -> AppResult<String> {
    if let Some(error) = query.error.as_deref() {
        let description = query.error_description.as_deref().unwrap_or(error);
        log::warn!("OAuth 콜백 오류: {} ({})", error, description);
        return Err(AppError::ValidationError(format!("인증이 거부되었습니다: {}", description)));
    }

    query
        .code
        .clone()
        .filter(|code| !code.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError("인증 코드가 필요합니다.".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoginType;
    use crate::domain::entities::users::user::Model as User;
    use crate::domain::models::oauth::profile::OAuthProfile;
    use actix_web::body::to_bytes;
    use chrono::Utc;
    use serde_json::{Value, json};

    fn login_result() -> OAuthLoginResult {
        let now = Utc::now();
        OAuthLoginResult {
            user: User {
                id: 1,
                email: "naver@example.com".to_string(),
                name: "네이버".to_string(),
                nickname: Some("네이버닉".to_string()),
                bio: None,
                gender: None,
                birth: None,
                password: None,
                login_type: LoginType::Naver,
                login_yn: true,
                user_ip_id: None,
                user_agent_id: None,
                user_setting_id: None,
                created_at: now,
                updated_at: now,
            },
            tokens: TokenPair::bearer("access".to_string(), "refresh".to_string()),
            is_new_user: true,
            profile: OAuthProfile::from_naver(json!({
                "resultcode": "00",
                "response": { "email": "naver@example.com", "nickname": "네이버닉", "name": "홍길동" }
            })),
        }
    }

    #[actix_web::test]
    async fn test_oauth_login_response_shape() {
        let response = oauth_login_response(login_result(), "네이버 로그인이 완료되었습니다.");
        assert_eq!(response.headers().get(ACCESS_TOKEN_HEADER).unwrap(), "access");
        assert_eq!(response.headers().get(REFRESH_TOKEN_HEADER).unwrap(), "refresh");

        let body: Value = serde_json::from_slice(&to_bytes(response.into_body()).await.unwrap()).unwrap();
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["token_type"], "Bearer");
        assert_eq!(body["data"]["naver_info"]["email"], "naver@example.com");
        assert_eq!(body["data"]["naver_info"]["name"], "홍길동");
    }

    #[actix_web::test]
    async fn test_callback_response_sets_cookies() {
        let response = oauth_callback_response(login_result(), true);
        let cookies: Vec<_> = response.cookies().collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.http_only() == Some(true)));
        assert!(cookies.iter().all(|c| c.same_site() == Some(SameSite::Lax)));

        let body: Value = serde_json::from_slice(&to_bytes(response.into_body()).await.unwrap()).unwrap();
        assert_eq!(body["data"]["is_need_info"], true);

        let response = oauth_callback_response(login_result(), false);
        assert_eq!(response.cookies().count(), 0);
    }

    #[test]
    fn test_callback_code() {
        let query = |code: Option<&str>, error: Option<&str>| OAuthCallbackQuery {
            code: code.map(str::to_string),
            state: None,
            error: error.map(str::to_string),
            error_description: None,
        };

        assert_eq!(callback_code(&query(Some("abc"), None)).unwrap(), "abc");
        assert!(matches!(
            callback_code(&query(Some("abc"), Some("access_denied"))),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            callback_code(&query(None, None)),
            Err(AppError::ValidationError(_))
        ));
    }
}
