//! User-Agent 차원 테이블

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::core::errors::AppResult;
use crate::domain::entities::users::user_agent::{ActiveModel, Column, Entity as UserAgents};
use crate::register_service;

/// 컬럼 길이 제한
const MAX_AGENT_LEN: usize = 512;

pub struct UserAgentRepository;

impl UserAgentRepository {
    fn new() -> AppResult<Self> {
        Ok(Self)
    }

    /// User-Agent 문자열로 조회하고, 없으면 생성하여 id를 반환합니다.
    /// 512자를 넘는 문자열은 잘라서 저장합니다.
    pub async fn find_or_create<C: ConnectionTrait>(&self, conn: &C, agent: &str) -> AppResult<i64> {
        let agent = truncate(agent);

        let existing = UserAgents::find()
            .filter(Column::UserAgentStr.eq(agent.as_str()))
            .one(conn)
            .await?;
        if let Some(row) = existing {
            return Ok(row.id);
        }

        let created = ActiveModel {
            user_agent_str: Set(agent),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        Ok(created.id)
    }
}

register_service!(UserAgentRepository, "user_agent_repository", UserAgentRepository::new);

fn truncate(agent: &str) -> String {
    agent.chars().take(MAX_AGENT_LEN).collect()
}
