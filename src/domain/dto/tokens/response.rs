use serde::Serialize;

/// 액세스 토큰 재발급 응답
#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
}
