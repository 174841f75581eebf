use serde::{Deserialize, Serialize};

use crate::core::errors::{AppError, AppResult};

/// 이메일 로그인 요청
///
/// 필드가 누락되어도 역직렬화는 성공하며, [`LoginRequest::ensure_present`]에서
/// 일관된 메시지로 거부합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn ensure_present(&self) -> AppResult<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(AppError::ValidationError(
                "이메일과 비밀번호를 입력해주세요.".to_string(),
            ));
        }
        Ok(())
    }
}
