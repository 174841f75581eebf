//! 이메일 인증번호 리포지토리
//!
//! 시간 조건은 모두 epoch 초(`*_unix`) 컬럼으로 비교합니다.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::core::errors::AppResult;
use crate::domain::entities::certification::user_certification::{
    ActiveModel, Column, Entity as Certifications, Model,
};
use crate::register_service;

pub struct CertificationRepository;

impl CertificationRepository {
    fn new() -> AppResult<Self> {
        Ok(Self)
    }

    pub async fn insert<C: ConnectionTrait>(&self, conn: &C, record: ActiveModel) -> AppResult<Model> {
        Ok(record.insert(conn).await?)
    }

    /// 수신자의 미사용 인증번호를 `SELECT ... FOR UPDATE`로 잠그고 반환
    ///
    /// 같은 수신자에 대한 동시 발급은 커밋될 때까지 대기합니다. sqlite에서는
    /// 잠금 절이 생략됩니다.
    pub async fn lock_unused<C: ConnectionTrait>(
        &self,
        conn: &C,
        recipient: &str,
    ) -> AppResult<Vec<Model>> {
        Ok(Certifications::find()
            .filter(Column::Recipient.eq(recipient))
            .filter(Column::UseYn.eq(false))
            .lock_exclusive()
            .all(conn)
            .await?)
    }

    /// 수신자의 미사용 인증번호를 모두 사용 처리하고 변경된 행 수를 반환
    pub async fn mark_unused_as_used<C: ConnectionTrait>(
        &self,
        conn: &C,
        recipient: &str,
    ) -> AppResult<u64> {
        let result = Certifications::update_many()
            .col_expr(Column::UseYn, Expr::value(true))
            .filter(Column::Recipient.eq(recipient))
            .filter(Column::UseYn.eq(false))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    /// 수신자와 코드가 일치하는 가장 최근의 미사용 인증번호
    pub async fn find_latest_unused<C: ConnectionTrait>(
        &self,
        conn: &C,
        recipient: &str,
        code: &str,
    ) -> AppResult<Option<Model>> {
        Ok(Certifications::find()
            .filter(Column::Recipient.eq(recipient))
            .filter(Column::Code.eq(code))
            .filter(Column::UseYn.eq(false))
            .order_by_desc(Column::CreatedAtUnix)
            .order_by_desc(Column::Id)
            .one(conn)
            .await?)
    }

    /// 미사용 상태일 때만 사용 처리합니다. 다른 요청이 먼저 사용했으면 `false`.
    pub async fn consume<C: ConnectionTrait>(&self, conn: &C, id: i64) -> AppResult<bool> {
        let result = Certifications::update_many()
            .col_expr(Column::UseYn, Expr::value(true))
            .filter(Column::Id.eq(id))
            .filter(Column::UseYn.eq(false))
            .exec(conn)
            .await?;
        Ok(result.rows_affected == 1)
    }

    /// `expires_at_unix < now_unix`인 행을 모두 삭제
    pub async fn delete_expired<C: ConnectionTrait>(&self, conn: &C, now_unix: i64) -> AppResult<u64> {
        let result = Certifications::delete_many()
            .filter(Column::ExpiresAtUnix.lt(now_unix))
            .exec(conn)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete_by_id<C: ConnectionTrait>(&self, conn: &C, id: i64) -> AppResult<u64> {
        let result = Certifications::delete_by_id(id).exec(conn).await?;
        Ok(result.rows_affected)
    }

    pub async fn find_by_id<C: ConnectionTrait>(&self, conn: &C, id: i64) -> AppResult<Option<Model>> {
        Ok(Certifications::find_by_id(id).one(conn).await?)
    }
}

register_service!(CertificationRepository, "certification_repository", CertificationRepository::new);
