//! 인증된 사용자 추출기
//!
//! 인증 미들웨어가 검증한 토큰의 사용자 정보를 요청 확장에 넣고,
//! 핸들러는 `AuthenticatedUser`를 인자로 받아 사용합니다.
//!
//! ```rust,ignore
//! #[get("/profile")]
//! async fn get_profile(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
//!     let profile = UserService::instance()?.get_profile(&user.email).await?;
//!     Ok(HttpResponse::Ok().json(profile))
//! }
//! ```

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;
use crate::domain::models::token::token::TokenClaims;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub email: String,

    pub nickname: String,

    /// 요청에 사용된 원본 액세스 토큰 (로그아웃 시 폐기 대상)
    #[serde(skip_serializing)]
    pub token: String,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: TokenClaims, token: String) -> Self {
        Self {
            email: claims.email,
            nickname: claims.nickname,
            token,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::AuthenticationError(
                "토큰이 없습니다.".to_string(),
            ))),
        }
    }
}
