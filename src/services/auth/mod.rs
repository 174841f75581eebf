//! 인증 서비스 모듈
//!
//! JWT 발급/검증과 소셜 로그인(Google, Kakao, Naver)을 제공합니다.
//!
//! 각 프로바이더 서비스는 [`OAuthProvider`]를 구현하며,
//! [`OAuthLoginService`]가 인가 코드 교환부터 로컬 사용자 생성/갱신,
//! JWT 발급까지의 공통 흐름을 처리합니다.
//!
//! ```rust,ignore
//! use crate::services::auth::{KakaoAuthService, OAuthLoginService};
//!
//! let kakao = KakaoAuthService::instance()?;
//! let result = OAuthLoginService::instance()?
//!     .login_with_code(kakao.as_ref(), &code, None, &client)
//!     .await?;
//! ```

pub mod google_auth_service;
pub mod kakao_auth_service;
pub mod naver_auth_service;
pub mod oauth_http;
pub mod oauth_login_service;
pub mod token_service;

pub use google_auth_service::GoogleAuthService;
pub use kakao_auth_service::KakaoAuthService;
pub use naver_auth_service::NaverAuthService;
pub use oauth_login_service::{OAuthLoginResult, OAuthLoginService};
pub use token_service::TokenService;

use async_trait::async_trait;

use crate::config::LoginType;
use crate::core::errors::AppResult;
use crate::domain::models::oauth::profile::OAuthProfile;

/// 소셜 로그인 프로바이더
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    fn login_type(&self) -> LoginType;

    /// 인가 코드를 액세스 토큰으로 교환합니다. `state`는 Naver만 사용합니다.
    async fn exchange_code(&self, code: &str, state: Option<&str>) -> AppResult<String>;

    async fn fetch_profile(&self, access_token: &str) -> AppResult<OAuthProfile>;
}
