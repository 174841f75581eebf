//! 이메일 인증번호
//!
//! 만료 판정은 `expires_at_unix`(epoch 초)로 합니다. `expires_at`은 응답과
//! 조회 편의를 위해 함께 저장합니다.

use chrono::{Duration, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_certification")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub user_uuid: Option<Uuid>,

    /// 소문자로 정규화된 수신 이메일
    pub recipient: String,

    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub code: String,

    pub use_yn: bool,

    pub created_at: DateTimeUtc,

    pub created_at_unix: i64,

    pub expires_at: DateTimeUtc,

    pub expires_at_unix: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    pub fn issue(recipient: &str, code: String, user_uuid: Option<Uuid>, expire_minutes: i64) -> Self {
        let created_at = Utc::now();
        let expires_at = created_at + Duration::minutes(expire_minutes);

        Self {
            user_uuid: Set(user_uuid),
            recipient: Set(recipient.to_lowercase()),
            code: Set(code),
            use_yn: Set(false),
            created_at: Set(created_at),
            created_at_unix: Set(created_at.timestamp()),
            expires_at: Set(expires_at),
            expires_at_unix: Set(expires_at.timestamp()),
            ..Default::default()
        }
    }
}

impl Model {
    pub fn is_expired_at(&self, now_unix: i64) -> bool {
        now_unix > self.expires_at_unix
    }

    /// 미사용이고 만료되지 않았으면 유효
    pub fn is_valid_at(&self, now_unix: i64) -> bool {
        !self.use_yn && !self.is_expired_at(now_unix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn sample(use_yn: bool, expires_at_unix: i64) -> Model {
        let now = Utc::now();
        Model {
            id: 1,
            user_uuid: None,
            recipient: "user@example.com".to_string(),
            code: "123456".to_string(),
            use_yn,
            created_at: now,
            created_at_unix: now.timestamp(),
            expires_at: now,
            expires_at_unix,
        }
    }

    #[test]
    fn test_validity_boundaries() {
        let record = sample(false, 1_000);
        assert!(record.is_valid_at(999));
        assert!(record.is_valid_at(1_000));
        assert!(!record.is_valid_at(1_001));
        assert!(!sample(true, 1_000).is_valid_at(999));
    }

    #[test]
    fn test_issue_lowercases_and_sets_expiry() {
        let active = ActiveModel::issue("User@Example.COM", "000123".to_string(), None, 5);

        assert_eq!(active.recipient, ActiveValue::Set("user@example.com".to_string()));
        match (active.created_at_unix, active.expires_at_unix) {
            (ActiveValue::Set(created), ActiveValue::Set(expires)) => {
                assert_eq!(expires - created, 300)
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
