//! # Authentication Configuration Module
//!
//! JWT 토큰, OAuth 프로바이더(Google/Kakao/Naver), 인증 쿠키, 로그인 유형 등
//! 인증 관련 설정을 관리하는 모듈입니다.
//!
//! ## 지원하는 인증 방식
//!
//! 1. **이메일 인증**: 이메일/비밀번호 기반 로그인
//! 2. **Google OAuth 2.0**
//! 3. **Kakao OAuth 2.0**: 카카오톡 메시지 전송 권한 포함
//! 4. **Naver OAuth 2.0**: `state` 매개변수 필수
//!
//! ## 필수 환경 변수 설정
//!
//! ```bash
//! export JWT_SECRET_KEY="your-super-secret-jwt-key"
//! export JWT_ACCESS_TOKEN_EXPIRE_MINUTES="30"
//! export JWT_REFRESH_TOKEN_EXPIRE_MINUTES="43200"
//!
//! export GOOGLE_CLIENT_ID="..."
//! export GOOGLE_CLIENT_SECRET="..."
//! export GOOGLE_REDIRECT_URI="http://localhost:8080/api/google/callback"
//!
//! export KAKAO_REST_API_KEY="..."
//! export KAKAO_CLIENT_SECRET="..."
//! export KAKAO_REDIRECT_URI="http://localhost:8080/api/kakao/callback"
//!
//! export NAVER_CLIENT_ID="..."
//! export NAVER_CLIENT_SECRET="..."
//! export NAVER_REDIRECT_URI="http://localhost:8080/api/naver/callback"
//! ```
//!
//! OAuth 클라이언트 정보는 서버 부팅 시점이 아니라 실제 요청 시점에 검사합니다.
//! 설정되지 않은 프로바이더의 엔드포인트만 실패하고 나머지는 정상 동작합니다.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::{env_flag, env_opt, env_or, env_parse};
use crate::core::errors::{AppError, AppResult};

fn required(key: &str) -> AppResult<String> {
    env_opt(key).ok_or_else(|| AppError::InternalError(format!("{} 설정이 되지 않았습니다.", key)))
}

/// JSON Web Token (JWT) 관련 설정
///
/// HS256 대칭키 서명을 사용합니다. 액세스 토큰은 짧게, 리프레시 토큰은 길게 유지합니다.
///
/// ## 기본값
///
/// - 액세스 토큰: 30분
/// - 리프레시 토큰: 43200분 (30일)
pub struct JwtConfig;

impl JwtConfig {
    /// JWT 서명에 사용할 비밀키를 반환합니다.
    ///
    /// 환경 변수가 설정되지 않은 경우 `default_secret_key`를 사용하며
    /// 경고 로그가 출력됩니다. 프로덕션에서는 반드시 설정해야 합니다.
    ///
    /// ```bash
    /// openssl rand -base64 32
    /// ```
    pub fn secret() -> String {
        env_opt("JWT_SECRET_KEY").unwrap_or_else(|| {
            log::warn!("JWT_SECRET_KEY not set, using default (not secure for production!)");
            "default_secret_key".to_string()
        })
    }

    /// 액세스 토큰 만료 시간(분)
    pub fn access_token_expire_minutes() -> i64 {
        env_parse("JWT_ACCESS_TOKEN_EXPIRE_MINUTES", 30)
    }

    /// 리프레시 토큰 만료 시간(분)
    pub fn refresh_token_expire_minutes() -> i64 {
        env_parse("JWT_REFRESH_TOKEN_EXPIRE_MINUTES", 60 * 24 * 30)
    }
}

/// Google OAuth 2.0 설정
///
/// Google Cloud Console에서 생성한 OAuth 클라이언트 정보입니다.
/// 리디렉션 URI는 콘솔의 승인된 리디렉션 URI 목록에 등록되어 있어야 합니다.
pub struct GoogleOAuthConfig;

impl GoogleOAuthConfig {
    /// # Errors
    ///
    /// `GOOGLE_CLIENT_ID`가 없으면 `AppError::InternalError`
    pub fn client_id() -> AppResult<String> {
        required("GOOGLE_CLIENT_ID")
    }

    /// 토큰 교환 시에만 사용되는 민감 정보입니다. 로그에 출력하지 마세요.
    pub fn client_secret() -> AppResult<String> {
        required("GOOGLE_CLIENT_SECRET")
    }

    pub fn redirect_uri() -> String {
        env_or("GOOGLE_REDIRECT_URI", "")
    }

    pub fn auth_uri() -> String {
        env_or("GOOGLE_AUTH_URI", "https://accounts.google.com/o/oauth2/v2/auth")
    }

    pub fn token_uri() -> String {
        env_or("GOOGLE_TOKEN_URI", "https://oauth2.googleapis.com/token")
    }

    pub fn user_info_uri() -> String {
        env_or(
            "GOOGLE_USER_INFO_URI",
            "https://www.googleapis.com/oauth2/v2/userinfo",
        )
    }

    pub fn token_info_uri() -> String {
        env_or("GOOGLE_TOKEN_INFO_URI", "https://oauth2.googleapis.com/tokeninfo")
    }
}

/// Kakao OAuth 2.0 설정
///
/// 카카오 디벨로퍼스의 REST API 키를 `client_id`로 사용합니다.
pub struct KakaoOAuthConfig;

impl KakaoOAuthConfig {
    pub fn rest_api_key() -> AppResult<String> {
        required("KAKAO_REST_API_KEY")
    }

    /// 클라이언트 시크릿은 카카오 콘솔에서 활성화한 경우에만 필요합니다.
    pub fn client_secret() -> Option<String> {
        env_opt("KAKAO_CLIENT_SECRET")
    }

    pub fn redirect_uri() -> String {
        env_or("KAKAO_REDIRECT_URI", "")
    }

    pub fn auth_host() -> String {
        env_or("KAKAO_AUTH_HOST", "https://kauth.kakao.com")
    }

    pub fn api_host() -> String {
        env_or("KAKAO_API_HOST", "https://kapi.kakao.com")
    }
}

/// Naver OAuth 2.0 설정
pub struct NaverOAuthConfig;

impl NaverOAuthConfig {
    pub fn client_id() -> AppResult<String> {
        required("NAVER_CLIENT_ID")
    }

    pub fn client_secret() -> AppResult<String> {
        required("NAVER_CLIENT_SECRET")
    }

    pub fn redirect_uri() -> String {
        env_or("NAVER_REDIRECT_URI", "")
    }

    pub fn auth_host() -> String {
        env_or("NAVER_AUTH_HOST", "https://nid.naver.com")
    }

    pub fn api_host() -> String {
        env_or("NAVER_API_HOST", "https://openapi.naver.com")
    }
}

/// OAuth 콜백(GET)에서 발급하는 토큰 쿠키 설정
pub struct CookieConfig;

impl CookieConfig {
    /// HTTPS가 아닌 로컬 개발 환경에서는 `COOKIE_SECURE=false`로 설정합니다.
    pub fn secure() -> bool {
        env_flag("COOKIE_SECURE", true)
    }
}

/// 요청 빈도 제한 설정 (IP 단위)
pub struct RateLimitConfig;

impl RateLimitConfig {
    pub fn per_second() -> u64 {
        env_parse("RATE_LIMIT_PER_SECOND", 100)
    }

    pub fn burst_size() -> u32 {
        env_parse("RATE_LIMIT_BURST_SIZE", 200)
    }
}

/// 사용자 계정의 로그인 유형
///
/// `user.login_type` 컬럼에 소문자 문자열로 저장되며, 마지막으로 사용한
/// 로그인 수단을 나타냅니다.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum LoginType {
    #[sea_orm(string_value = "email")]
    Email,
    #[sea_orm(string_value = "google")]
    Google,
    #[sea_orm(string_value = "kakao")]
    Kakao,
    #[sea_orm(string_value = "naver")]
    Naver,
}

impl LoginType {
    /// 문자열에서 로그인 유형을 생성합니다 (대소문자 무관).
    ///
    /// ```rust,ignore
    /// assert_eq!(LoginType::from_str("Kakao")?, LoginType::Kakao);
    /// assert!(LoginType::from_str("twitter").is_err());
    /// ```
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(LoginType::Email),
            "google" => Ok(LoginType::Google),
            "kakao" => Ok(LoginType::Kakao),
            "naver" => Ok(LoginType::Naver),
            _ => Err(format!("Unsupported login type: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoginType::Email => "email",
            LoginType::Google => "google",
            LoginType::Kakao => "kakao",
            LoginType::Naver => "naver",
        }
    }

    /// 외부 OAuth 프로바이더 여부
    pub fn is_oauth(&self) -> bool {
        !matches!(self, LoginType::Email)
    }
}

impl std::fmt::Display for LoginType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
