//! # Domain Models
//!
//! 영속화되지 않는 도메인 모델입니다.
//!
//! - [`auth`] - 인증된 요청 사용자 (`AuthenticatedUser` 추출기)
//! - [`token`] - JWT 클레임과 토큰 쌍
//! - [`oauth`] - OAuth 프로바이더에서 받은 사용자 프로필

pub mod auth;
pub mod oauth;
pub mod token;
