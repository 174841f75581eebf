//! 로그인 이력 리포지토리
//!
//! 사용자당 한 행을 유지합니다. 이벤트가 발생하면 기존 행을 덮어쓰고,
//! 없으면 새로 만듭니다.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TryIntoModel,
};

use crate::core::errors::AppResult;
use crate::domain::entities::users::user_login_log::{
    ActiveModel, Column, Entity as LoginLogs, LoginEventType, Model,
};
use crate::register_service;

pub struct LoginLogRepository;

impl LoginLogRepository {
    fn new() -> AppResult<Self> {
        Ok(Self)
    }

    pub async fn find_by_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
    ) -> AppResult<Option<Model>> {
        Ok(LoginLogs::find()
            .filter(Column::UserId.eq(user_id))
            .one(conn)
            .await?)
    }

    pub async fn upsert<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        event_type: LoginEventType,
        ip_id: Option<i64>,
        user_agent_id: Option<i64>,
    ) -> AppResult<Model> {
        let now = Utc::now();

        let mut active = match self.find_by_user(conn, user_id).await? {
            Some(existing) => existing.into(),
            None => ActiveModel {
                user_id: Set(user_id),
                ..Default::default()
            },
        };

        active.event_type = Set(event_type);
        active.event_at = Set(now);
        active.event_at_unix = Set(now.timestamp());
        active.ip_id = Set(ip_id);
        active.user_agent_id = Set(user_agent_id);

        let saved = active.save(conn).await?;
        Ok(saved.try_into_model()?)
    }
}

register_service!(LoginLogRepository, "login_log_repository", LoginLogRepository::new);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_database;
    use sea_orm::PaginatorTrait;

    #[actix_web::test]
    async fn test_upsert_keeps_single_row_per_user() {
        let db = memory_database().await;
        let repo = LoginLogRepository;

        let login = repo
            .upsert(db.conn(), 7, LoginEventType::Login, Some(1), Some(2))
            .await
            .unwrap();
        let logout = repo
            .upsert(db.conn(), 7, LoginEventType::Logout, Some(3), None)
            .await
            .unwrap();

        assert_eq!(login.id, logout.id);
        assert_eq!(logout.event_type, LoginEventType::Logout);
        assert_eq!(logout.ip_id, Some(3));
        assert_eq!(logout.user_agent_id, None);
        assert_eq!(LoginLogs::find().count(db.conn()).await.unwrap(), 1);

        repo.upsert(db.conn(), 8, LoginEventType::Login, None, None)
            .await
            .unwrap();
        assert_eq!(LoginLogs::find().count(db.conn()).await.unwrap(), 2);
    }
}
