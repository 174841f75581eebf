//! 트랜잭션 헬퍼
//!
//! 서비스 계층은 `begin`으로 트랜잭션을 열고, 본문 결과를 `finish`에 넘겨
//! 성공 시 커밋, 실패 시 롤백합니다.
//!
//! ```rust,ignore
//! let txn = transaction::begin(self.db.conn()).await?;
//! let result = self.register_in(&txn, request).await;
//! transaction::finish(txn, result, "회원가입").await
//! ```

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::core::errors::{AppError, AppResult};

pub async fn begin(conn: &DatabaseConnection) -> AppResult<DatabaseTransaction> {
    conn.begin().await.map_err(|e| {
        log::error!("트랜잭션 시작 실패: {}", e);
        AppError::DatabaseError(e.to_string())
    })
}

pub async fn commit(txn: DatabaseTransaction, label: &str) -> AppResult<()> {
    match txn.commit().await {
        Ok(()) => {
            log::debug!("트랜잭션 커밋 성공: {}", label);
            Ok(())
        }
        Err(e) => {
            log::error!("트랜잭션 커밋 실패: {} - {}", label, e);
            Err(AppError::DatabaseError(e.to_string()))
        }
    }
}

/// 롤백 실패는 로그만 남깁니다. 원래 에러가 호출자에게 전달되어야 합니다.
pub async fn rollback(txn: DatabaseTransaction, label: &str) {
    match txn.rollback().await {
        Ok(()) => log::warn!("트랜잭션 롤백: {}", label),
        Err(e) => log::error!("트랜잭션 롤백 실패: {} - {}", label, e),
    }
}

/// 본문 결과에 따라 커밋 또는 롤백
pub async fn finish<T>(txn: DatabaseTransaction, result: AppResult<T>, label: &str) -> AppResult<T> {
    match result {
        Ok(value) => {
            commit(txn, label).await?;
            Ok(value)
        }
        Err(err) => {
            log::error!("트랜잭션 처리 실패: {} - {}", label, err);
            rollback(txn, label).await;
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_database;
    use crate::domain::entities::users::user_ip;
    use chrono::Utc;
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

    async fn insert_ip(txn: &DatabaseTransaction, ip: &str) -> AppResult<i64> {
        let model = user_ip::ActiveModel {
            ip_str: Set(ip.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(txn)
        .await?;
        Ok(model.id)
    }

    #[actix_web::test]
    async fn test_finish_commits_on_success() {
        let db = memory_database().await;

        let txn = begin(db.conn()).await.unwrap();
        let result = insert_ip(&txn, "10.0.0.1").await;
        finish(txn, result, "test_commit").await.unwrap();

        assert_eq!(user_ip::Entity::find().count(db.conn()).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_finish_rolls_back_on_error() {
        let db = memory_database().await;

        let txn = begin(db.conn()).await.unwrap();
        let result: AppResult<i64> = match insert_ip(&txn, "10.0.0.2").await {
            Ok(_) => Err(AppError::ValidationError("중단".to_string())),
            Err(e) => Err(e),
        };
        let outcome = finish(txn, result, "test_rollback").await;

        assert!(matches!(outcome, Err(AppError::ValidationError(_))));
        assert_eq!(user_ip::Entity::find().count(db.conn()).await.unwrap(), 0);
    }
}
