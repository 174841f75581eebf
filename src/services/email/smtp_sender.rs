//! SMTP 발송기 (`lettre`)
//!
//! `EMAIL_USE_SSL`이 참이면 암묵적 TLS(465), 거짓이면 STARTTLS(587)로 접속합니다.
//! 전송 객체는 발송 시점에 만들며, 설정 누락은 첫 발송에서 드러납니다.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Message};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use super::EmailSender;
use crate::config::EmailConfig;
use crate::core::errors::{AppError, AppResult};
use crate::register_service;

#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub user: String,
    pub app_password: String,
    pub server: String,
    pub port: u16,
    pub use_ssl: bool,
    pub from_name: String,
}

impl SmtpSettings {
    pub fn from_env() -> Self {
        Self {
            user: EmailConfig::user(),
            app_password: EmailConfig::app_password(),
            server: EmailConfig::smtp_server(),
            port: EmailConfig::smtp_port(),
            use_ssl: EmailConfig::use_ssl(),
            from_name: EmailConfig::from_name(),
        }
    }
}

pub struct SmtpEmailSender {
    settings: SmtpSettings,
}

impl SmtpEmailSender {
    fn from_env() -> AppResult<Self> {
        Ok(Self::new(SmtpSettings::from_env()))
    }

    pub fn new(settings: SmtpSettings) -> Self {
        Self { settings }
    }

    fn transport(&self) -> AppResult<AsyncSmtpTransport<Tokio1Executor>> {
        let builder = if self.settings.use_ssl {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&self.settings.server)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.settings.server)
        }
        .map_err(|e| AppError::ExternalServiceError(format!("SMTP 설정 실패: {}", e)))?;

        Ok(builder
            .port(self.settings.port)
            .credentials(Credentials::new(
                self.settings.user.clone(),
                self.settings.app_password.clone(),
            ))
            .build())
    }

    pub fn build_message(&self, to: &str, subject: &str, body: &str) -> AppResult<Message> {
        if self.settings.user.is_empty() {
            return Err(AppError::ExternalServiceError(
                "EMAIL_USER 설정이 되지 않았습니다.".to_string(),
            ));
        }

        let from = Mailbox::new(
            Some(self.settings.from_name.clone()),
            self.settings
                .user
                .parse()
                .map_err(|e| AppError::ExternalServiceError(format!("발신 주소 오류: {}", e)))?,
        );
        let to: Mailbox = to
            .parse()
            .map_err(|e| AppError::ValidationError(format!("수신 주소 오류: {}", e)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::ExternalServiceError(format!("메일 생성 실패: {}", e)))
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
        let message = self.build_message(to, subject, body)?;

        self.transport()?.send(message).await.map_err(|e| {
            log::error!("이메일 전송 실패: {}", e);
            AppError::ExternalServiceError(format!("이메일 전송 실패: {}", e))
        })?;

        log::info!("이메일 전송 완료: {}", to);
        Ok(())
    }
}

register_service!(SmtpEmailSender, "smtp_email_sender", SmtpEmailSender::from_env);
