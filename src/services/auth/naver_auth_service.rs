//! # Naver OAuth 2.0 서비스
//!
//! 네이버 로그인은 CSRF 방지를 위해 `state`가 필수입니다. 인증 URL을 만들 때
//! 생성한 값을 클라이언트가 보관했다가 콜백/로그인 요청에 함께 보내야 합니다.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use reqwest::Client;
use serde_json::{Value, json};

use super::OAuthProvider;
use super::oauth_http::{access_token_of, build_url, fetch_json, http_client};
use crate::config::{LoginType, NaverOAuthConfig};
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::oauth::AuthUrlResponse;
use crate::domain::models::oauth::profile::OAuthProfile;
use crate::register_service;
use crate::utils::string_utils::mask_secret;

pub const NAVER_DEFAULT_SCOPE: &str = "profile,email";
pub const STATE_REQUIRED_MESSAGE: &str = "상태값이 필요합니다.";

pub struct NaverAuthService {
    http: Client,
}

impl NaverAuthService {
    fn new() -> AppResult<Self> {
        Ok(Self { http: http_client()? })
    }

    fn token_url() -> String {
        format!("{}/oauth2.0/token", NaverOAuthConfig::auth_host())
    }

    /// 32바이트 난수를 URL-safe base64로 인코딩한 state
    pub fn generate_state() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill(&mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// 인증 URL 생성. `state`가 없으면 새로 생성해 응답에 담습니다.
    pub fn auth_url(&self, state: Option<&str>, scope: Option<&str>) -> AppResult<AuthUrlResponse> {
        let client_id = NaverOAuthConfig::client_id()?;
        let state = state
            .map(str::to_string)
            .unwrap_or_else(Self::generate_state);

        Ok(Self::authorize_url(
            &NaverOAuthConfig::auth_host(),
            &client_id,
            &NaverOAuthConfig::redirect_uri(),
            &state,
            scope.unwrap_or(NAVER_DEFAULT_SCOPE),
        ))
    }

    fn authorize_url(
        auth_host: &str,
        client_id: &str,
        redirect_uri: &str,
        state: &str,
        scope: &str,
    ) -> AuthUrlResponse {
        let auth_url = build_url(
            &format!("{}/oauth2.0/authorize", auth_host),
            &[
                ("response_type", "code"),
                ("client_id", client_id),
                ("redirect_uri", redirect_uri),
                ("state", state),
                ("scope", scope),
            ],
        );

        AuthUrlResponse {
            auth_url,
            scope: scope.to_string(),
            prompt: None,
            state: Some(state.to_string()),
        }
    }

    pub async fn exchange_code_for_token(&self, code: &str, state: &str) -> AppResult<Value> {
        let client_id = NaverOAuthConfig::client_id()?;
        let client_secret = NaverOAuthConfig::client_secret()?;

        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("code", code),
            ("state", state),
        ];

        fetch_json(
            self.http.post(Self::token_url()).form(&params),
            "네이버 토큰 교환",
        )
        .await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<Value> {
        let client_id = NaverOAuthConfig::client_id()?;
        let client_secret = NaverOAuthConfig::client_secret()?;

        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id.as_str()),
            ("client_secret", client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];

        fetch_json(
            self.http.post(Self::token_url()).form(&params),
            "네이버 토큰 갱신",
        )
        .await
    }

    pub async fn get_user_info(&self, access_token: &str) -> AppResult<Value> {
        let body = fetch_json(
            self.http
                .get(format!("{}/v1/nid/me", NaverOAuthConfig::api_host()))
                .bearer_auth(access_token),
            "네이버 사용자 정보 조회",
        )
        .await?;

        // 성공 응답은 resultcode "00"
        match body.get("resultcode").and_then(Value::as_str) {
            Some("00") | None => Ok(body),
            Some(_) => Err(AppError::ExternalServiceError(format!(
                "네이버 사용자 정보 조회 실패: {}",
                body["message"].as_str().unwrap_or("알 수 없는 오류")
            ))),
        }
    }

    /// 네이버는 별도 토큰 검증 API가 없어 사용자 정보 조회로 판단합니다.
    pub async fn validate_token(&self, access_token: &str) -> bool {
        self.get_user_info(access_token).await.is_ok()
    }

    pub async fn get_debug_info(&self, access_token: Option<&str>) -> Value {
        let client_id = NaverOAuthConfig::client_id().ok();
        let client_secret = NaverOAuthConfig::client_secret().ok();

        let mut info = json!({
            "api_keys": {
                "client_id": mask_secret(client_id.as_deref()),
                "client_secret": mask_secret(client_secret.as_deref()),
                "redirect_uri": NaverOAuthConfig::redirect_uri(),
            },
            "token_info": {
                "has_token": access_token.is_some(),
                "is_valid": false,
            }
        });

        if let Some(token) = access_token {
            match self.get_user_info(token).await {
                Ok(_) => info["token_info"]["is_valid"] = json!(true),
                Err(e) => info["token_info"]["error"] = json!(e.client_message()),
            }
        }

        info
    }
}

#[async_trait]
impl OAuthProvider for NaverAuthService {
    fn login_type(&self) -> LoginType {
        LoginType::Naver
    }

    async fn exchange_code(&self, code: &str, state: Option<&str>) -> AppResult<String> {
        let state = state
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::ValidationError(STATE_REQUIRED_MESSAGE.to_string()))?;

        let token_response = self.exchange_code_for_token(code, state).await?;
        access_token_of(&token_response)
    }

    async fn fetch_profile(&self, access_token: &str) -> AppResult<OAuthProfile> {
        Ok(OAuthProfile::from_naver(self.get_user_info(access_token).await?))
    }
}

register_service!(NaverAuthService, "naver_auth_service", NaverAuthService::new);
