//! 응답 공통 포맷

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// 이메일 형식 검증 정규식
pub static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid regex")
});

/// 성공 응답
///
/// ```json
/// { "status": "success", "message": "회원가입이 완료되었습니다.", "data": { ... } }
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: Some(data),
        }
    }

    /// 본문 데이터를 유지한 채 실패로 응답할 때 사용
    pub fn failure(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "error",
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// 데이터 없는 성공 응답
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: "success",
            message: message.into(),
            data: None,
        }
    }
}
