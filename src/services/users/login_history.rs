//! 접속 이력 기록
//!
//! 로그인/로그아웃 시 요청자의 IP와 User-Agent를 차원 테이블에 등록하고
//! 사용자별 마지막 로그인 이벤트를 갱신합니다. 이메일 로그인과 OAuth 로그인이
//! 함께 사용합니다.

use std::sync::Arc;

use sea_orm::ConnectionTrait;

use crate::core::errors::AppResult;
use crate::domain::entities::users::user_login_log::{self, LoginEventType};
use crate::register_service;
use crate::repositories::users::login_log_repo::LoginLogRepository;
use crate::repositories::users::user_agent_repo::UserAgentRepository;
use crate::repositories::users::user_ip_repo::UserIpRepository;
use crate::utils::client_info::ClientInfo;

/// 차원 테이블 id
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientRefs {
    pub ip_id: Option<i64>,
    pub user_agent_id: Option<i64>,
}

pub struct LoginHistoryService {
    ip_repo: Arc<UserIpRepository>,
    agent_repo: Arc<UserAgentRepository>,
    login_log_repo: Arc<LoginLogRepository>,
}

impl LoginHistoryService {
    fn from_registry() -> AppResult<Self> {
        Ok(Self::new(
            UserIpRepository::instance()?,
            UserAgentRepository::instance()?,
            LoginLogRepository::instance()?,
        ))
    }

    pub fn new(
        ip_repo: Arc<UserIpRepository>,
        agent_repo: Arc<UserAgentRepository>,
        login_log_repo: Arc<LoginLogRepository>,
    ) -> Self {
        Self {
            ip_repo,
            agent_repo,
            login_log_repo,
        }
    }

    /// IP / User-Agent를 조회하거나 생성합니다. 값이 없으면 `None`
    pub async fn record_client<C: ConnectionTrait>(
        &self,
        conn: &C,
        client: &ClientInfo,
    ) -> AppResult<ClientRefs> {
        let ip_id = match client.ip.as_deref() {
            Some(ip) => Some(self.ip_repo.find_or_create(conn, ip).await?),
            None => None,
        };

        let user_agent_id = if client.user_agent.trim().is_empty() {
            None
        } else {
            Some(self.agent_repo.find_or_create(conn, &client.user_agent).await?)
        };

        Ok(ClientRefs { ip_id, user_agent_id })
    }

    pub async fn record_event<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: i64,
        event_type: LoginEventType,
        refs: ClientRefs,
    ) -> AppResult<user_login_log::Model> {
        let log = self
            .login_log_repo
            .upsert(conn, user_id, event_type, refs.ip_id, refs.user_agent_id)
            .await?;
        log::debug!("접속 이력 기록: user_id={} event={:?}", user_id, event_type);
        Ok(log)
    }
}

register_service!(LoginHistoryService, "login_history_service", LoginHistoryService::from_registry);
