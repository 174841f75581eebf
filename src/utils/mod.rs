//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 이메일 정규화, 문자열 정리, 비밀값 마스킹
//! - [`client_info`] - 요청자 IP / User-Agent 추출
//! - [`display_terminal`] - 터미널 출력 포맷팅 함수들
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::utils::string_utils::normalize_email;
//! use crate::utils::display_terminal::print_boxed_title;
//!
//! let email = normalize_email("  Hong@Example.com ");
//! print_boxed_title("System Initialized");
//! ```

pub mod client_info;
pub mod display_terminal;
pub mod string_utils;
