//! 이메일 인증번호 핸들러
//!
//! - `POST /send-certification-code` `{email}`
//! - `POST /verify-certification-code` `{email, code}`

use actix_web::{HttpResponse, post, web};
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::certification::{
    CertificationSentResponse, CertificationVerifiedResponse, SendCertificationCodeRequest,
    VerifyCertificationCodeRequest,
};
use crate::domain::dto::common::ApiResponse;
use crate::services::certification::CertificationService;

/// 인증번호 발송
///
/// * 429 - 재발송 제한 시간 이내
/// * 500 - 메일 발송 실패 (생성된 인증번호는 삭제됨)
#[post("/send-certification-code")]
pub async fn send_certification_code(
    payload: web::Json<SendCertificationCodeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let record = CertificationService::instance()?
        .send(&payload.email, None)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "인증번호가 전송되었습니다.",
        CertificationSentResponse::from(record),
    )))
}

/// 인증번호 확인. 일치하는 유효 코드가 없으면 409
#[post("/verify-certification-code")]
pub async fn verify_certification_code(
    payload: web::Json<VerifyCertificationCodeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let record = CertificationService::instance()?
        .verify_code(&payload.email, &payload.code)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "인증번호가 확인되었습니다.",
        CertificationVerifiedResponse::from(record),
    )))
}
