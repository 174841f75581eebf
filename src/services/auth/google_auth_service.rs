//! # Google OAuth 2.0 서비스
//!
//! 인가 코드 방식(Authorization Code Flow)으로 Google 계정 로그인을 처리합니다.
//!
//! ```text
//! Client ──▶ /google/auth ──▶ auth_url (accounts.google.com)
//!   │
//!   └─ 사용자 동의 후 code ──▶ /google/login
//!                                 │
//!                                 ├─ exchange_code_for_token (oauth2.googleapis.com/token)
//!                                 ├─ get_user_info (oauth2/v2/userinfo)
//!                                 └─ OAuthLoginService::login_with_profile
//! ```
//!
//! `access_type=offline`으로 요청하므로 최초 동의 시 리프레시 토큰이 발급됩니다.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::{Value, json};

use super::OAuthProvider;
use super::oauth_http::{access_token_of, build_url, fetch_json, http_client};
use crate::config::{GoogleOAuthConfig, LoginType};
use crate::core::errors::AppResult;
use crate::domain::dto::oauth::AuthUrlResponse;
use crate::domain::models::oauth::profile::OAuthProfile;
use crate::register_service;
use crate::utils::string_utils::mask_secret;

pub const GOOGLE_DEFAULT_SCOPE: &str = "email profile";
pub const GOOGLE_DEFAULT_PROMPT: &str = "consent select_account";

pub struct GoogleAuthService {
    http: Client,
}

impl GoogleAuthService {
    fn new() -> AppResult<Self> {
        Ok(Self { http: http_client()? })
    }

    /// 인증 URL 생성
    ///
    /// # Errors
    ///
    /// `GOOGLE_CLIENT_ID` 미설정 시 `AppError::InternalError`
    pub fn auth_url(&self, scope: Option<&str>, prompt: Option<&str>) -> AppResult<AuthUrlResponse> {
        let client_id = GoogleOAuthConfig::client_id()?;
        Ok(Self::authorize_url(
            &GoogleOAuthConfig::auth_uri(),
            &client_id,
            &GoogleOAuthConfig::redirect_uri(),
            scope.unwrap_or(GOOGLE_DEFAULT_SCOPE),
            prompt.unwrap_or(GOOGLE_DEFAULT_PROMPT),
        ))
    }

    fn authorize_url(
        base: &str,
        client_id: &str,
        redirect_uri: &str,
        scope: &str,
        prompt: &str,
    ) -> AuthUrlResponse {
        let auth_url = build_url(
            base,
            &[
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", scope),
                ("prompt", prompt),
                ("access_type", "offline"),
            ],
        );

        AuthUrlResponse {
            auth_url,
            scope: scope.to_string(),
            prompt: Some(prompt.to_string()),
            state: None,
        }
    }

    pub async fn exchange_code_for_token(&self, code: &str) -> AppResult<Value> {
        let client_id = GoogleOAuthConfig::client_id()?;
        let client_secret = GoogleOAuthConfig::client_secret()?;
        let redirect_uri = GoogleOAuthConfig::redirect_uri();

        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("code", code),
        ];

        fetch_json(
            self.http.post(GoogleOAuthConfig::token_uri()).form(&params),
            "Google 토큰 교환",
        )
        .await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<Value> {
        let client_id = GoogleOAuthConfig::client_id()?;
        let client_secret = GoogleOAuthConfig::client_secret()?;

        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];

        fetch_json(
            self.http.post(GoogleOAuthConfig::token_uri()).form(&params),
            "Google 토큰 갱신",
        )
        .await
    }

    pub async fn get_user_info(&self, access_token: &str) -> AppResult<Value> {
        fetch_json(
            self.http
                .get(GoogleOAuthConfig::user_info_uri())
                .bearer_auth(access_token),
            "Google 사용자 정보 조회",
        )
        .await
    }

    pub async fn get_token_info(&self, access_token: &str) -> AppResult<Value> {
        fetch_json(
            self.http
                .get(GoogleOAuthConfig::token_info_uri())
                .query(&[("access_token", access_token)]),
            "Google 토큰 정보 조회",
        )
        .await
    }

    /// 토큰 정보 조회가 성공하면 유효
    pub async fn validate_token(&self, access_token: &str) -> bool {
        self.get_token_info(access_token).await.is_ok()
    }

    /// 설정(마스킹)과 토큰 상태
    pub async fn get_debug_info(&self, access_token: Option<&str>) -> Value {
        let client_id = GoogleOAuthConfig::client_id().ok();
        let client_secret = GoogleOAuthConfig::client_secret().ok();

        let mut info = json!({
            "client_id": mask_secret(client_id.as_deref()),
            "client_secret": mask_secret(client_secret.as_deref()),
            "redirect_uri": GoogleOAuthConfig::redirect_uri(),
            "timestamp": Utc::now().to_rfc3339(),
        });

        if let Some(token) = access_token {
            match self.get_token_info(token).await {
                Ok(token_info) => {
                    info["token_info"] = token_info;
                    info["token_valid"] = json!(true);
                }
                Err(e) => {
                    info["token_valid"] = json!(false);
                    info["error"] = json!(e.client_message());
                }
            }
        }

        info
    }
}

#[async_trait]
impl OAuthProvider for GoogleAuthService {
    fn login_type(&self) -> LoginType {
        LoginType::Google
    }

    async fn exchange_code(&self, code: &str, _state: Option<&str>) -> AppResult<String> {
        let token_response = self.exchange_code_for_token(code).await?;
        access_token_of(&token_response)
    }

    async fn fetch_profile(&self, access_token: &str) -> AppResult<OAuthProfile> {
        Ok(OAuthProfile::from_google(self.get_user_info(access_token).await?))
    }
}

register_service!(GoogleAuthService, "google_auth_service", GoogleAuthService::new);
