//! 사용자 관리 서비스 모듈
//!
//! - [`user_service`] - 회원가입, 이메일 로그인/로그아웃, 프로필
//! - [`login_history`] - 접속 IP / User-Agent / 로그인 이력 기록

pub mod login_history;
pub mod user_service;

pub use login_history::LoginHistoryService;
pub use user_service::UserService;
