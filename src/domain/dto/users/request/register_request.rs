//! 회원가입 요청 DTO

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::dto::common::EMAIL_REGEX;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_passwords_match"))]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "이름은 1-255자 사이여야 합니다"))]
    pub name: String,

    #[validate(length(min = 1, max = 255, message = "닉네임은 1-255자 사이여야 합니다"))]
    pub nickname: String,

    #[validate(regex(path = *EMAIL_REGEX, message = "올바른 이메일 형식이 아닙니다."))]
    pub email: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub password: String,

    pub confirm_password: String,
}

fn validate_passwords_match(req: &RegisterRequest) -> Result<(), ValidationError> {
    if req.password != req.confirm_password {
        return Err(ValidationError::new("passwords_mismatch")
            .with_message("비밀번호가 일치하지 않습니다.".into()));
    }
    Ok(())
}
