//! # 사용자 리포지토리 구현
//!
//! `users` 테이블의 조회/생성/수정을 담당합니다. 이메일은 호출 측에서
//! 정규화(소문자)된 값을 넘겨야 합니다.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr,
};

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::users::user::{ActiveModel, Column, Entity as Users, Model};
use crate::register_service;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "이미 존재하는 이메일입니다.";

pub struct UserRepository;

impl UserRepository {
    fn new() -> AppResult<Self> {
        Ok(Self)
    }

    pub async fn find_by_email<C: ConnectionTrait>(
        &self,
        conn: &C,
        email: &str,
    ) -> AppResult<Option<Model>> {
        Ok(Users::find()
            .filter(Column::Email.eq(email))
            .one(conn)
            .await?)
    }

    pub async fn find_by_id<C: ConnectionTrait>(&self, conn: &C, id: i64) -> AppResult<Option<Model>> {
        Ok(Users::find_by_id(id).one(conn).await?)
    }

    /// 이메일로 조회하고 없으면 `NotFound`
    pub async fn get_by_email<C: ConnectionTrait>(&self, conn: &C, email: &str) -> AppResult<Model> {
        self.find_by_email(conn, email)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다.".to_string()))
    }

    pub async fn exists_by_email<C: ConnectionTrait>(&self, conn: &C, email: &str) -> AppResult<bool> {
        Ok(self.find_by_email(conn, email).await?.is_some())
    }

    /// `users.email` 유니크 제약 위반은 `ValidationError`로 변환합니다.
    pub async fn insert<C: ConnectionTrait>(&self, conn: &C, user: ActiveModel) -> AppResult<Model> {
        user.insert(conn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                log::warn!("이메일 중복으로 사용자 생성 실패: {}", detail);
                AppError::ValidationError(DUPLICATE_EMAIL_MESSAGE.to_string())
            }
            _ => AppError::from(e),
        })
    }

    /// 변경된 컬럼만 반영하며 `updated_at`은 항상 갱신합니다.
    pub async fn update<C: ConnectionTrait>(&self, conn: &C, mut user: ActiveModel) -> AppResult<Model> {
        user.updated_at = Set(Utc::now());
        Ok(user.update(conn).await?)
    }

    pub async fn set_login_state<C: ConnectionTrait>(
        &self,
        conn: &C,
        user: Model,
        login_yn: bool,
    ) -> AppResult<Model> {
        let mut active: ActiveModel = user.into();
        active.login_yn = Set(login_yn);
        self.update(conn, active).await
    }
}

register_service!(UserRepository, "user_repository", UserRepository::new);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_database;

    fn sample(email: &str) -> ActiveModel {
        ActiveModel::new_email(
            "홍길동".to_string(),
            "길동".to_string(),
            email.to_string(),
            "$2b$04$hash".to_string(),
        )
    }

    #[actix_web::test]
    async fn test_insert_and_find_by_email() {
        let db = memory_database().await;
        let repo = UserRepository;

        let created = repo.insert(db.conn(), sample("hong@example.com")).await.unwrap();
        let found = repo.find_by_email(db.conn(), "hong@example.com").await.unwrap().unwrap();

        assert_eq!(created.id, found.id);
        assert!(found.has_password());
        assert!(!found.login_yn);
        assert!(repo.exists_by_email(db.conn(), "hong@example.com").await.unwrap());
        assert!(!repo.exists_by_email(db.conn(), "none@example.com").await.unwrap());
    }

    #[actix_web::test]
    async fn test_duplicate_email_is_rejected_by_unique_constraint() {
        let db = memory_database().await;
        let repo = UserRepository;

        repo.insert(db.conn(), sample("dup@example.com")).await.unwrap();
        match repo.insert(db.conn(), sample("dup@example.com")).await {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, DUPLICATE_EMAIL_MESSAGE),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_get_by_email_not_found() {
        let db = memory_database().await;
        match UserRepository.get_by_email(db.conn(), "ghost@example.com").await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "사용자를 찾을 수 없습니다."),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_set_login_state() {
        let db = memory_database().await;
        let repo = UserRepository;
        let user = repo.insert(db.conn(), sample("state@example.com")).await.unwrap();

        let updated = repo.set_login_state(db.conn(), user, true).await.unwrap();
        assert!(updated.login_yn);
        assert!(updated.updated_at >= updated.created_at);
    }
}
