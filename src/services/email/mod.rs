//! 이메일 발송
//!
//! 서비스 계층은 [`EmailSender`] 트레이트에만 의존하며, 실제 발송은
//! [`smtp_sender::SmtpEmailSender`]가 담당합니다.

pub mod smtp_sender;

use async_trait::async_trait;

use crate::core::errors::AppResult;

#[async_trait]
pub trait EmailSender: Send + Sync {
    /// 일반 텍스트 메일 발송
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()>;
}

pub use smtp_sender::SmtpEmailSender;
