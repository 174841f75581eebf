//! # 이메일 인증번호 서비스
//!
//! 인증번호의 발급, 발송, 검증, 만료 정리를 담당합니다.
//!
//! ## 정책
//!
//! - 같은 이메일로 `CERTIFICATION_RESEND_SECONDS`(기본 60초) 이내에 발급된
//!   미사용 인증번호가 있으면 재발급을 거부합니다 (`429`).
//! - 새 인증번호를 발급하면 기존 미사용 인증번호는 모두 사용 처리됩니다.
//! - 인증번호는 한 번만 검증할 수 있습니다.
//! - 만료 정리는 발송/검증 직전에 수행하며 별도 스케줄러는 없습니다.
//!
//! ```rust,ignore
//! let service = CertificationService::instance()?;
//! let record = service.send("user@example.com", None).await?;
//! let verified = service.verify_code("user@example.com", &code).await?;
//! ```

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::config::CertificationConfig;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::ServiceLocator;
use crate::db::{Database, transaction};
use crate::domain::entities::certification::user_certification::{ActiveModel, Model};
use crate::register_service;
use crate::repositories::certification::certification_repo::CertificationRepository;
use crate::services::email::{EmailSender, SmtpEmailSender};
use crate::utils::string_utils::normalize_email;

pub const RESEND_LIMIT_MESSAGE: &str = "1분 이내에 재생성할 수 없습니다.";
pub const INVALID_CODE_MESSAGE: &str = "유효하지 않거나 만료된 인증번호입니다.";
pub const SEND_FAILED_MESSAGE: &str = "이메일 전송에 실패했습니다.";

const MAIL_SUBJECT: &str = "[CloakBox] 이메일 인증번호";

/// 발급 정책 (자릿수, 유효 시간, 재발급 제한)
#[derive(Debug, Clone, Copy)]
pub struct CertificationPolicy {
    pub code_length: usize,
    pub expire_minutes: i64,
    pub resend_interval_secs: i64,
}

impl CertificationPolicy {
    pub fn from_env() -> Self {
        Self {
            code_length: CertificationConfig::code_length(),
            expire_minutes: CertificationConfig::expire_minutes(),
            resend_interval_secs: CertificationConfig::resend_interval_secs(),
        }
    }
}

impl Default for CertificationPolicy {
    fn default() -> Self {
        Self {
            code_length: 6,
            expire_minutes: 5,
            resend_interval_secs: 60,
        }
    }
}

pub struct CertificationService {
    db: Arc<Database>,
    repo: Arc<CertificationRepository>,
    sender: Arc<dyn EmailSender>,
    policy: CertificationPolicy,
}

impl CertificationService {
    fn from_registry() -> AppResult<Self> {
        let sender: Arc<dyn EmailSender> = SmtpEmailSender::instance()?;
        Ok(Self::new(
            ServiceLocator::get::<Database>()?,
            CertificationRepository::instance()?,
            sender,
            CertificationPolicy::from_env(),
        ))
    }

    pub fn new(
        db: Arc<Database>,
        repo: Arc<CertificationRepository>,
        sender: Arc<dyn EmailSender>,
        policy: CertificationPolicy,
    ) -> Self {
        Self {
            db,
            repo,
            sender,
            policy,
        }
    }

    /// 인증번호 발급
    ///
    /// # Errors
    ///
    /// * `AppError::RateLimited` - 재발급 제한 시간 이내
    pub async fn create(&self, email: &str, user_uuid: Option<Uuid>) -> AppResult<Model> {
        let recipient = normalize_email(email);

        let txn = transaction::begin(self.db.conn()).await?;
        let result: AppResult<Model> = async {
            let since = Utc::now().timestamp() - self.policy.resend_interval_secs;
            let pending = self.repo.lock_unused(&txn, &recipient).await?;
            if pending.iter().any(|record| record.created_at_unix >= since) {
                return Err(AppError::RateLimited(RESEND_LIMIT_MESSAGE.to_string()));
            }

            let replaced = self.repo.mark_unused_as_used(&txn, &recipient).await?;
            if replaced > 0 {
                log::debug!("기존 인증번호 {}건 사용 처리: {}", replaced, recipient);
            }

            let code = generate_code(self.policy.code_length);
            self.repo
                .insert(
                    &txn,
                    ActiveModel::issue(&recipient, code, user_uuid, self.policy.expire_minutes),
                )
                .await
        }
        .await;

        transaction::finish(txn, result, "인증번호 발급").await
    }

    /// 인증번호 검증. 성공하면 해당 인증번호는 사용 처리됩니다.
    ///
    /// 일치하는 유효 인증번호가 없으면 `Ok(None)`
    pub async fn verify(&self, email: &str, code: &str) -> AppResult<Option<Model>> {
        let recipient = normalize_email(email);
        let code = code.trim();

        let txn = transaction::begin(self.db.conn()).await?;
        let result: AppResult<Option<Model>> = async {
            let now = Utc::now().timestamp();
            let Some(record) = self.repo.find_latest_unused(&txn, &recipient, code).await? else {
                return Ok(None);
            };
            if !record.is_valid_at(now) {
                return Ok(None);
            }

            // 조건부 갱신: 동시에 검증한 다른 요청이 먼저 사용했으면 실패
            if !self.repo.consume(&txn, record.id).await? {
                log::warn!("인증번호 중복 사용 시도: {}", recipient);
                return Ok(None);
            }
            Ok(Some(Model { use_yn: true, ..record }))
        }
        .await;

        transaction::finish(txn, result, "인증번호 검증").await
    }

    /// 만료된 인증번호 삭제
    pub async fn cleanup_expired(&self) -> AppResult<u64> {
        let deleted = self
            .repo
            .delete_expired(self.db.conn(), Utc::now().timestamp())
            .await?;
        if deleted > 0 {
            log::info!("만료된 인증번호 {}건 삭제", deleted);
        }
        Ok(deleted)
    }

    /// 만료 정리 → 발급 → 메일 발송
    ///
    /// 발송에 실패하면 방금 발급한 인증번호를 삭제합니다.
    pub async fn send(&self, email: &str, user_uuid: Option<Uuid>) -> AppResult<Model> {
        self.cleanup_expired().await?;

        let record = self.create(email, user_uuid).await?;
        let body = mail_body(&record.code, self.policy.expire_minutes);

        if let Err(e) = self.sender.send_email(&record.recipient, MAIL_SUBJECT, &body).await {
            log::error!("인증번호 메일 발송 실패 ({}): {}", record.recipient, e);
            if let Err(cleanup) = self.repo.delete_by_id(self.db.conn(), record.id).await {
                log::error!("발송 실패 인증번호 삭제 실패 (id={}): {}", record.id, cleanup);
            }
            return Err(AppError::ExternalServiceError(SEND_FAILED_MESSAGE.to_string()));
        }

        log::info!("인증번호 발송 완료: {}", record.recipient);
        Ok(record)
    }

    /// 만료 정리 후 검증. 실패하면 `409`
    pub async fn verify_code(&self, email: &str, code: &str) -> AppResult<Model> {
        self.cleanup_expired().await?;

        self.verify(email, code)
            .await?
            .ok_or_else(|| AppError::ConflictError(INVALID_CODE_MESSAGE.to_string()))
    }
}

register_service!(CertificationService, "certification_service", CertificationService::from_registry);

/// `length`자리 숫자 문자열
fn generate_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

fn mail_body(code: &str, expire_minutes: i64) -> String {
    format!(
        "안녕하세요!\n\
         CloakBox 이메일 인증번호를 안내드립니다.\n\n\
         인증번호: {}\n\n\
         이 인증번호는 {}분 후에 만료됩니다.\n\
         타인에게 인증번호를 알려주지 마세요.\n\n\
         감사합니다.\n\
         CloakBox 팀.",
        code, expire_minutes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_database;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSender {
        fail: bool,
        sent: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl EmailSender for RecordingSender {
        async fn send_email(&self, to: &str, subject: &str, body: &str) -> AppResult<()> {
            if self.fail {
                return Err(AppError::ExternalServiceError("smtp down".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), subject.to_string(), body.to_string()));
            Ok(())
        }
    }

    async fn service(sender: Arc<RecordingSender>) -> CertificationService {
        CertificationService::new(
            Arc::new(memory_database().await),
            Arc::new(CertificationRepository),
            sender,
            CertificationPolicy::default(),
        )
    }

    #[test]
    fn test_generate_code() {
        let code = generate_code(6);
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(generate_code(8).len(), 8);
    }

    #[test]
    fn test_mail_body_contains_code_and_expiry() {
        let body = mail_body("042917", 5);
        assert!(body.contains("인증번호: 042917"));
        assert!(body.contains("5분 후에 만료됩니다."));
    }

    #[actix_web::test]
    async fn test_resend_within_interval_is_rate_limited() {
        let service = service(Arc::new(RecordingSender::default())).await;

        service.create("User@Example.com", None).await.unwrap();
        match service.create("user@example.com", None).await {
            Err(AppError::RateLimited(msg)) => assert_eq!(msg, RESEND_LIMIT_MESSAGE),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_code_is_single_use() {
        let sender = Arc::new(RecordingSender::default());
        let service = service(sender.clone()).await;

        let owner = Uuid::new_v4();
        let record = service.send("single@example.com", Some(owner)).await.unwrap();
        assert_eq!(record.user_uuid, Some(owner));

        let verified = service.verify_code("Single@Example.com", &record.code).await.unwrap();
        assert_eq!(verified.id, record.id);
        assert!(verified.use_yn);

        match service.verify_code("single@example.com", &record.code).await {
            Err(AppError::ConflictError(msg)) => assert_eq!(msg, INVALID_CODE_MESSAGE),
            other => panic!("unexpected: {:?}", other),
        }

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "single@example.com");
        assert_eq!(sent[0].1, MAIL_SUBJECT);
        assert!(sent[0].2.contains(&record.code));
    }

    #[actix_web::test]
    async fn test_verify_fails_when_code_consumed_elsewhere() {
        let db = Arc::new(memory_database().await);
        let repo = Arc::new(CertificationRepository);
        let service = CertificationService::new(
            db.clone(),
            repo.clone(),
            Arc::new(RecordingSender::default()),
            CertificationPolicy::default(),
        );

        let record = service.create("race@example.com", None).await.unwrap();
        assert!(repo.consume(db.conn(), record.id).await.unwrap());

        assert!(service.verify("race@example.com", &record.code).await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_wrong_code_is_rejected() {
        let service = service(Arc::new(RecordingSender::default())).await;
        let record = service.create("wrong@example.com", None).await.unwrap();
        let wrong = if record.code == "000000" { "111111" } else { "000000" };

        assert!(service.verify("wrong@example.com", wrong).await.unwrap().is_none());
        assert!(service.verify("wrong@example.com", &record.code).await.unwrap().is_some());
    }

    #[actix_web::test]
    async fn test_send_failure_removes_record() {
        let service = service(Arc::new(RecordingSender {
            fail: true,
            ..Default::default()
        }))
        .await;

        match service.send("fail@example.com", None).await {
            Err(AppError::ExternalServiceError(msg)) => assert_eq!(msg, SEND_FAILED_MESSAGE),
            other => panic!("unexpected: {:?}", other),
        }

        // 삭제되었으므로 곧바로 재발급할 수 있어야 합니다.
        assert!(service.create("fail@example.com", None).await.is_ok());
    }

    #[actix_web::test]
    async fn test_expired_code_is_invalid_and_cleaned_up() {
        let db = Arc::new(memory_database().await);
        let repo = Arc::new(CertificationRepository);
        let service = CertificationService::new(
            db.clone(),
            repo.clone(),
            Arc::new(RecordingSender::default()),
            CertificationPolicy::default(),
        );

        let expired = repo
            .insert(
                db.conn(),
                ActiveModel::issue("late@example.com", "123456".to_string(), None, -1),
            )
            .await
            .unwrap();

        assert!(service.verify("late@example.com", "123456").await.unwrap().is_none());
        assert_eq!(service.cleanup_expired().await.unwrap(), 1);
        assert!(repo.find_by_id(db.conn(), expired.id).await.unwrap().is_none());
    }
}
