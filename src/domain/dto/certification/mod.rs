//! 이메일 인증번호 요청/응답 DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::dto::common::EMAIL_REGEX;
use crate::domain::entities::certification::user_certification::Model as Certification;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SendCertificationCodeRequest {
    #[validate(regex(path = *EMAIL_REGEX, message = "유효하지 않은 이메일 형식입니다."))]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct VerifyCertificationCodeRequest {
    #[validate(regex(path = *EMAIL_REGEX, message = "유효하지 않은 이메일 형식입니다."))]
    pub email: String,

    #[validate(length(min = 1, max = 20, message = "인증번호는 1-20자 사이여야 합니다"))]
    pub code: String,
}

#[derive(Debug, Serialize)]
pub struct CertificationSentResponse {
    pub email: String,
    pub user_uuid: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
}

impl From<Certification> for CertificationSentResponse {
    fn from(record: Certification) -> Self {
        Self {
            email: record.recipient,
            user_uuid: record.user_uuid,
            expires_at: record.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CertificationVerifiedResponse {
    pub email: String,
    pub user_uuid: Option<Uuid>,
    pub verified: bool,
}

impl From<Certification> for CertificationVerifiedResponse {
    fn from(record: Certification) -> Self {
        Self {
            email: record.recipient,
            user_uuid: record.user_uuid,
            verified: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_request_limits() {
        let ok = VerifyCertificationCodeRequest {
            email: "a@example.com".to_string(),
            code: "123456".to_string(),
        };
        assert!(ok.validate().is_ok());

        let too_long = VerifyCertificationCodeRequest {
            email: "a@example.com".to_string(),
            code: "1".repeat(21),
        };
        assert!(too_long.validate().is_err());

        let bad_email = SendCertificationCodeRequest {
            email: "nope".to_string(),
        };
        assert!(bad_email.validate().is_err());
    }
}
