//! 접속 IP 차원 테이블

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::core::errors::AppResult;
use crate::domain::entities::users::user_ip::{ActiveModel, Column, Entity as UserIps};
use crate::register_service;

pub struct UserIpRepository;

impl UserIpRepository {
    fn new() -> AppResult<Self> {
        Ok(Self)
    }

    pub async fn find_id<C: ConnectionTrait>(&self, conn: &C, ip: &str) -> AppResult<Option<i64>> {
        Ok(UserIps::find()
            .filter(Column::IpStr.eq(ip))
            .one(conn)
            .await?
            .map(|row| row.id))
    }

    /// IP 문자열로 조회하고, 없으면 생성하여 id를 반환합니다.
    pub async fn find_or_create<C: ConnectionTrait>(&self, conn: &C, ip: &str) -> AppResult<i64> {
        if let Some(id) = self.find_id(conn, ip).await? {
            return Ok(id);
        }

        let created = ActiveModel {
            ip_str: Set(ip.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        log::debug!("새 접속 IP 등록: {} (id={})", ip, created.id);
        Ok(created.id)
    }
}

register_service!(UserIpRepository, "user_ip_repository", UserIpRepository::new);
