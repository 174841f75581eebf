//! # Application Error Handling System
//!
//! CloakBox API 전역에서 사용하는 통합 에러 타입입니다.
//! 모든 핸들러는 `Result<HttpResponse, AppError>`를 반환하며,
//! `actix_web::ResponseError` 구현을 통해 일관된 JSON 에러 응답으로 변환됩니다.
//!
//! ## 응답 형식
//!
//! ```json
//! {
//!   "status": "error",
//!   "message": "사용자를 찾을 수 없습니다.",
//!   "error": "NOT_FOUND"
//! }
//! ```
//!
//! 입력 검증 실패(`InvalidInput`)는 `errors` 필드에 필드별 상세 정보를 추가로 포함합니다.
//!
//! ## HTTP 응답 매핑
//!
//! | AppError | HTTP Status |
//! |----------|-------------|
//! | `ValidationError`, `InvalidInput` | 400 Bad Request |
//! | `AuthenticationError` | 401 Unauthorized |
//! | `AuthorizationError` | 403 Forbidden |
//! | `NotFound` | 404 Not Found |
//! | `ConflictError` | 409 Conflict |
//! | `RateLimited` | 429 Too Many Requests |
//! | `ExternalServiceError` | 500 Internal Server Error |
//! | `DatabaseError`, `InternalError` | 500 Internal Server Error |
//!
//! 데이터베이스/내부 오류의 원문 메시지는 로그에만 남기고 클라이언트에는
//! 일반화된 메시지만 전달합니다.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use validator::ValidationErrors;

/// 입력 검증 실패 시 응답 메시지
pub const VALIDATION_FAILED_MESSAGE: &str = "입력 데이터 검증 실패";

/// 내부 오류 시 클라이언트에 노출되는 메시지
pub const INTERNAL_ERROR_MESSAGE: &str = "서버 내부 오류가 발생했습니다.";

/// 애플리케이션 전역 에러 타입
///
/// ```rust,ignore
/// let user = user_repo.find_by_email(&db, &email).await?
///     .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다.".to_string()))?;
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// 데이터베이스 연산 실패 (연결, 쿼리, 트랜잭션)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 비즈니스 규칙 수준의 입력 오류 (중복 이메일 등)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// DTO 필드 검증 실패
    #[error("Invalid input: {0}")]
    InvalidInput(ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 토큰 누락/만료/폐기, 비밀번호 불일치 등 인증 실패
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 인증번호 재발송 제한 등 요청 빈도 제한
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// OAuth 프로바이더, SMTP 서버 등 외부 서비스 호출 실패
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 응답 본문의 `error` 필드에 들어가는 에러 코드
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::ValidationError(_) | AppError::InvalidInput(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ConflictError(_) => "CONFLICT",
            AppError::AuthenticationError(_) => "UNAUTHORIZED",
            AppError::AuthorizationError(_) => "FORBIDDEN",
            AppError::RateLimited(_) => "RATE_LIMITED",
            AppError::ExternalServiceError(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// 클라이언트에 노출되는 메시지
    pub fn client_message(&self) -> String {
        match self {
            AppError::DatabaseError(_) | AppError::InternalError(_) => {
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::InvalidInput(_) => VALIDATION_FAILED_MESSAGE.to_string(),
            AppError::ValidationError(msg)
            | AppError::NotFound(msg)
            | AppError::ConflictError(msg)
            | AppError::AuthenticationError(msg)
            | AppError::AuthorizationError(msg)
            | AppError::RateLimited(msg)
            | AppError::ExternalServiceError(msg) => msg.clone(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::DatabaseError(_)
            | AppError::ExternalServiceError(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("요청 처리 실패: {}", self);
        }

        let mut body = json!({
            "status": "error",
            "message": self.client_message(),
            "error": self.error_code(),
        });

        if let AppError::InvalidInput(errors) = self {
            body["errors"] = serde_json::to_value(errors).unwrap_or_default();
        }

        HttpResponse::build(self.status_code()).json(body)
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::InvalidInput(errors)
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// `Result`에 문맥 메시지를 붙여 `AppError::InternalError`로 변환하는 확장 트레이트
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}
