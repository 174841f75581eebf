//! # Configuration
//!
//! 환경변수 기반 설정 모듈입니다. 모든 설정 구조체는 필드가 없는 정적 타입이며,
//! 호출 시점에 환경변수를 읽어 값을 반환합니다.
//!
//! - [`data_config`] - 서버, 데이터베이스, SSH 터널, 인증번호, 비밀번호 해싱
//! - [`auth_config`] - JWT, OAuth 프로바이더(Google/Kakao/Naver), 쿠키, 로그인 유형
//! - [`mail_config`] - SMTP 이메일 발송
//!
//! `.env` 파일은 `PROFILE`(`dev`/`prod`)에 따라 `main`에서 로드됩니다.

pub mod auth_config;
pub mod data_config;
pub mod mail_config;

pub use auth_config::*;
pub use data_config::*;
pub use mail_config::*;

use std::env;
use std::str::FromStr;

/// 값이 비어 있지 않은 환경변수만 반환
pub(crate) fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

pub(crate) fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

/// 파싱 실패 시 경고를 남기고 기본값을 사용
pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
{
    match env_opt(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("{} 파싱 실패: '{}'. 기본값 {} 사용", key, raw, default);
            default
        }),
        None => default,
    }
}

pub(crate) fn env_flag(key: &str, default: bool) -> bool {
    env_opt(key)
        .and_then(|raw| parse_flag(&raw))
        .unwrap_or(default)
}

/// `true/1/yes/y/on`, `false/0/no/n/off` 형태의 불리언 문자열 파싱
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "on" => Some(true),
        "false" | "0" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
