//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! 각 서비스는 `register_service!`로 레지스트리에 등록되어 애플리케이션
//! 시작 시 한 번 생성되고, 핸들러는 `instance()`로 공유 인스턴스를 얻습니다.
//!
//! - [`users`]: 이메일 회원가입, 로그인/로그아웃, 프로필, 접속 이력
//! - [`auth`]: JWT, Google/Kakao/Naver 소셜 로그인
//! - [`certification`]: 이메일 인증번호 발송/검증
//! - [`email`]: SMTP 메일 발송
//!
//! ```rust,ignore
//! use crate::services::{users::UserService, auth::TokenService};
//!
//! let user_service = UserService::instance()?;
//! let token_service = TokenService::instance()?;
//! ```

pub mod auth;
pub mod certification;
pub mod email;
pub mod users;
