//! OAuth 엔드포인트 공통 요청/응답 DTO
//!
//! Google, Kakao, Naver 엔드포인트가 같은 요청 구조를 공유합니다.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::string_utils::deserialize_optional_string;

/// 인가 코드 교환 요청 (`/login`, `/callback`)
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OAuthCodeRequest {
    #[validate(length(min = 1, message = "인증 코드가 필요합니다."))]
    pub code: String,

    /// Naver 전용
    pub state: Option<String>,
}

/// GET 콜백 쿼리. 사용자가 동의를 거부하면 `error`가 전달됩니다.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// 인증 URL 생성 요청 (`/auth`). 빈 값은 프로바이더 기본값으로 대체됩니다.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthAuthUrlRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub scope: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub prompt: Option<String>,
    /// Naver 전용. 없으면 서버에서 생성합니다.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OAuthAccessTokenRequest {
    #[validate(length(min = 1, message = "액세스 토큰이 필요합니다."))]
    pub access_token: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OAuthRefreshRequest {
    #[validate(length(min = 1, message = "리프레시 토큰이 필요합니다."))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OAuthDebugRequest {
    pub access_token: Option<String>,
}

/// 카카오톡 메시지 전송 요청. `friend_uuid`가 있으면 친구에게 전송합니다.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct KakaoMessageRequest {
    #[validate(length(min = 1, message = "액세스 토큰이 필요합니다."))]
    pub access_token: String,

    #[validate(length(min = 1, max = 200, message = "메시지는 1-200자 사이여야 합니다"))]
    pub message: String,

    pub link_url: Option<String>,

    pub friend_uuid: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthUrlResponse {
    pub auth_url: String,
    pub scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OAuthCallbackResponse {
    /// 최초 가입 사용자면 추가 정보 입력이 필요합니다.
    pub is_need_info: bool,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct KakaoMessageResponse {
    pub success: bool,
    pub message_sent: String,
    pub link_url: Option<String>,
    pub friend_uuid: Option<String>,
}
