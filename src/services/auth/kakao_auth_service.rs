//! # Kakao OAuth 2.0 서비스
//!
//! 카카오 로그인과 카카오톡 메시지 API를 다룹니다.
//!
//! - 인증 서버: `kauth.kakao.com` (인가, 토큰 발급/갱신)
//! - API 서버: `kapi.kakao.com` (사용자 정보, 동의 항목, 친구 목록, 메시지)
//!
//! 메시지 전송에는 `friends`, `talk_message` 동의가 필요하며
//! [`KakaoAuthService::check_required_scope`]로 확인할 수 있습니다.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use super::OAuthProvider;
use super::oauth_http::{access_token_of, build_url, fetch_json, http_client};
use crate::config::{KakaoOAuthConfig, LoginType};
use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::oauth::AuthUrlResponse;
use crate::domain::models::oauth::profile::OAuthProfile;
use crate::register_service;
use crate::utils::string_utils::mask_secret;

/// 로그인용 기본 동의 항목
pub const KAKAO_DEFAULT_SCOPE: &str = "account_email,profile_nickname";
/// 메시지 기능용 추가 동의 항목 (`/kakao/auth` 기본값)
pub const KAKAO_MESSAGE_SCOPE: &str = "friends,talk_message";
pub const KAKAO_DEFAULT_PROMPT: &str = "consent,login";

const REQUIRED_SCOPES: [&str; 2] = ["friends", "talk_message"];
const DEFAULT_LINK_URL: &str = "https://kakao.com";

pub struct KakaoAuthService {
    http: Client,
}

impl KakaoAuthService {
    fn new() -> AppResult<Self> {
        Ok(Self { http: http_client()? })
    }

    fn api(path: &str) -> String {
        format!("{}{}", KakaoOAuthConfig::api_host(), path)
    }

    fn oauth_token_url() -> String {
        format!("{}/oauth/token", KakaoOAuthConfig::auth_host())
    }

    pub fn auth_url(&self, scope: Option<&str>, prompt: Option<&str>) -> AppResult<AuthUrlResponse> {
        let rest_api_key = KakaoOAuthConfig::rest_api_key()?;
        Ok(Self::authorize_url(
            &KakaoOAuthConfig::auth_host(),
            &rest_api_key,
            &KakaoOAuthConfig::redirect_uri(),
            scope.unwrap_or(KAKAO_DEFAULT_SCOPE),
            prompt.unwrap_or(KAKAO_DEFAULT_PROMPT),
        ))
    }

    fn authorize_url(
        auth_host: &str,
        rest_api_key: &str,
        redirect_uri: &str,
        scope: &str,
        prompt: &str,
    ) -> AuthUrlResponse {
        let auth_url = build_url(
            &format!("{}/oauth/authorize", auth_host),
            &[
                ("client_id", rest_api_key),
                ("redirect_uri", redirect_uri),
                ("response_type", "code"),
                ("scope", scope),
                ("prompt", prompt),
            ],
        );

        AuthUrlResponse {
            auth_url,
            scope: scope.to_string(),
            prompt: Some(prompt.to_string()),
            state: None,
        }
    }

    /// 클라이언트 시크릿은 설정된 경우에만 전송합니다.
    pub async fn exchange_code_for_token(&self, code: &str) -> AppResult<Value> {
        let rest_api_key = KakaoOAuthConfig::rest_api_key()?;
        let redirect_uri = KakaoOAuthConfig::redirect_uri();

        let mut params = vec![
            ("grant_type", "authorization_code".to_string()),
            ("client_id", rest_api_key),
            ("redirect_uri", redirect_uri),
            ("code", code.to_string()),
        ];
        if let Some(secret) = KakaoOAuthConfig::client_secret() {
            params.push(("client_secret", secret));
        }

        fetch_json(
            self.http.post(Self::oauth_token_url()).form(&params),
            "카카오 토큰 교환",
        )
        .await
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<Value> {
        let mut params = vec![
            ("grant_type", "refresh_token".to_string()),
            ("client_id", KakaoOAuthConfig::rest_api_key()?),
            ("refresh_token", refresh_token.to_string()),
        ];
        if let Some(secret) = KakaoOAuthConfig::client_secret() {
            params.push(("client_secret", secret));
        }

        fetch_json(
            self.http.post(Self::oauth_token_url()).form(&params),
            "카카오 토큰 갱신",
        )
        .await
    }

    pub async fn get_token_info(&self, access_token: &str) -> AppResult<Value> {
        fetch_json(
            self.http
                .get(Self::api("/v1/user/access_token_info"))
                .bearer_auth(access_token),
            "토큰 정보 조회",
        )
        .await
    }

    pub async fn get_user_scopes(&self, access_token: &str) -> AppResult<Value> {
        fetch_json(
            self.http.get(Self::api("/v2/user/scopes")).bearer_auth(access_token),
            "동의 항목 조회",
        )
        .await
    }

    pub async fn get_user_info(&self, access_token: &str) -> AppResult<Value> {
        fetch_json(
            self.http.get(Self::api("/v2/user/me")).bearer_auth(access_token),
            "사용자 정보 조회",
        )
        .await
    }

    pub async fn get_friends(&self, access_token: &str) -> AppResult<Value> {
        fetch_json(
            self.http
                .get(Self::api("/v1/api/talk/friends"))
                .bearer_auth(access_token),
            "친구 목록 조회",
        )
        .await
    }

    pub async fn validate_token(&self, access_token: &str) -> bool {
        match self.get_token_info(access_token).await {
            Ok(_) => true,
            Err(e) => {
                log::error!("토큰 유효성 검사 실패: {}", e);
                false
            }
        }
    }

    /// 메시지 전송에 필요한 동의 항목별 동의 여부. 조회 실패 시 모두 `false`
    pub async fn check_required_scope(&self, access_token: &str) -> BTreeMap<String, bool> {
        match self.get_user_scopes(access_token).await {
            Ok(scopes) => scope_status(&scopes),
            Err(e) => {
                log::error!("필요한 권한 확인 실패: {}", e);
                REQUIRED_SCOPES
                    .iter()
                    .map(|scope| (scope.to_string(), false))
                    .collect()
            }
        }
    }

    /// 나에게 보내기. 성공 여부만 반환합니다.
    pub async fn send_message_to_self(
        &self,
        access_token: &str,
        message: &str,
        link_url: Option<&str>,
    ) -> bool {
        self.send_memo(access_token, message, link_url, None).await
    }

    pub async fn send_message_to_friend(
        &self,
        access_token: &str,
        friend_uuid: &str,
        message: &str,
        link_url: Option<&str>,
    ) -> bool {
        self.send_memo(access_token, message, link_url, Some(friend_uuid)).await
    }

    async fn send_memo(
        &self,
        access_token: &str,
        message: &str,
        link_url: Option<&str>,
        friend_uuid: Option<&str>,
    ) -> bool {
        let template = text_template(message, link_url);
        let mut params = vec![("template_object", template.to_string())];
        if let Some(uuid) = friend_uuid {
            params.push(("receiver_uuids", json!([uuid]).to_string()));
        }

        let result = fetch_json(
            self.http
                .post(Self::api("/v2/api/talk/memo/default/send"))
                .bearer_auth(access_token)
                .form(&params),
            "카카오 메시지 전송",
        )
        .await;

        match result {
            Ok(_) => true,
            Err(e) => {
                log::error!("카카오 메시지 전송 실패: {}", e);
                false
            }
        }
    }

    /// 설정(마스킹)과 토큰/동의 항목 상태
    pub async fn get_debug_info(&self, access_token: Option<&str>) -> Value {
        let rest_api_key = KakaoOAuthConfig::rest_api_key().ok();
        let client_secret = KakaoOAuthConfig::client_secret();
        let redirect_uri = Some(KakaoOAuthConfig::redirect_uri()).filter(|uri| !uri.is_empty());

        let mut info = json!({
            "api_keys": {
                "rest_api_key": mask_secret(rest_api_key.as_deref()),
                "client_secret": mask_secret(client_secret.as_deref()),
                "redirect_uri": mask_secret(redirect_uri.as_deref()),
            },
            "token_info": {
                "has_token": access_token.is_some(),
                "is_valid": false,
            }
        });

        let Some(token) = access_token else {
            return info;
        };

        let details = async {
            let token_info = self.get_token_info(token).await?;
            let scopes = self.get_user_scopes(token).await?;
            Ok::<_, AppError>((token_info, scopes))
        }
        .await;

        match details {
            Ok((token_info, scopes)) => {
                info["token_info"]["is_valid"] = json!(true);
                info["token_info"]["expires_in"] = token_info["expires_in"].clone();
                info["token_info"]["app_id"] = token_info["app_id"].clone();
                info["token_info"]["scopes"] = scope_summary(&scopes);
            }
            Err(e) => {
                info["token_info"]["error"] = json!(e.client_message());
            }
        }

        info
    }
}

#[async_trait]
impl OAuthProvider for KakaoAuthService {
    fn login_type(&self) -> LoginType {
        LoginType::Kakao
    }

    async fn exchange_code(&self, code: &str, _state: Option<&str>) -> AppResult<String> {
        let token_response = self.exchange_code_for_token(code).await?;
        access_token_of(&token_response)
    }

    async fn fetch_profile(&self, access_token: &str) -> AppResult<OAuthProfile> {
        Ok(OAuthProfile::from_kakao(self.get_user_info(access_token).await?))
    }
}

register_service!(KakaoAuthService, "kakao_auth_service", KakaoAuthService::new);

/// 카카오톡 텍스트 템플릿
fn text_template(message: &str, link_url: Option<&str>) -> Value {
    let link = link_url.filter(|url| !url.is_empty()).unwrap_or(DEFAULT_LINK_URL);
    json!({
        "object_type": "text",
        "text": message,
        "link": {
            "web_url": link,
            "mobile_web_url": link,
        },
        "button_title": "확인",
    })
}

fn scope_status(scopes: &Value) -> BTreeMap<String, bool> {
    let agreed: Vec<&str> = scopes["scopes"]
        .as_array()
        .map(|items| items.iter().filter_map(|s| s["id"].as_str()).collect())
        .unwrap_or_default();

    REQUIRED_SCOPES
        .iter()
        .map(|scope| (scope.to_string(), agreed.contains(scope)))
        .collect()
}

fn scope_summary(scopes: &Value) -> Value {
    let items = scopes["scopes"].as_array().cloned().unwrap_or_default();
    Value::Array(
        items
            .iter()
            .map(|scope| {
                json!({
                    "id": scope["id"],
                    "display_name": scope["display_name"],
                    "using": scope["using"].as_bool().unwrap_or(false),
                })
            })
            .collect(),
    )
}
