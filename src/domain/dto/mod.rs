//! # Data Transfer Objects
//!
//! HTTP 요청/응답 바디 정의입니다. 요청 DTO는 `validator::Validate`를 구현하며
//! 핸들러에서 서비스 호출 전에 검증합니다.
//!
//! - [`common`] - 성공 응답 공통 포맷과 이메일 정규식
//! - [`users`] - 회원가입, 로그인, 프로필
//! - [`tokens`] - 토큰 갱신
//! - [`certification`] - 이메일 인증번호
//! - [`oauth`] - Google/Kakao/Naver 공통 요청

pub mod certification;
pub mod common;
pub mod oauth;
pub mod tokens;
pub mod users;

pub use common::*;
