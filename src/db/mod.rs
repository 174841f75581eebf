//! Database Connection Management Module
//!
//! `sea-orm` 기반 관계형 데이터베이스 연결을 관리합니다.
//! PostgreSQL과 MariaDB/MySQL을 지원하며, `DATABASE_URL`을 지정하면
//! sqlite 등 임의의 URL로 접속할 수 있습니다.
//!
//! # 환경 변수 설정
//!
//! ```bash
//! export DB_TYPE="POSTGRESQL"        # 또는 MARIADB
//! export DB_HOST="localhost"
//! export DB_PORT="5432"
//! export DB_USER="cloakbox"
//! export DB_PASS="p@ssword"          # URL 인코딩은 자동 처리
//! export DB_NAME="cloakbox"
//! export DB_RECONN_TIMEOUT="10"
//!
//! # 원격 DB를 SSH 터널로 접속 (개발용)
//! export SSH_TUNNEL_ENABLED="true"
//! ```
//!
//! # 기본 사용법
//!
//! ```rust,ignore
//! use crate::db::Database;
//! use crate::core::registry::ServiceLocator;
//!
//! let database = Database::new().await?;
//! ServiceLocator::set(Arc::new(database));
//! ServiceLocator::initialize_all()?;
//! ```

pub mod schema;
pub mod transaction;
pub mod tunnel;

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, DatabaseConnection, Statement};

use crate::config::{DatabaseConfig, TunnelConfig};
use crate::core::errors::{AppError, AppResult};
use crate::utils::display_terminal::print_key_values;
use tunnel::{DEFAULT_TUNNEL, TUNNEL_MANAGER, TunnelSettings};

/// 데이터베이스 연결 래퍼
///
/// 내부 `DatabaseConnection`은 커넥션 풀이므로 복제 비용이 작습니다.
/// 리포지토리 함수는 `ConnectionTrait`를 받으므로 [`Database::conn`]과
/// 트랜잭션 객체를 모두 넘길 수 있습니다.
#[derive(Clone)]
pub struct Database {
    conn: DatabaseConnection,
}

impl Database {
    /// 환경 변수로부터 연결을 생성합니다.
    ///
    /// 1. `DATABASE_URL`이 있으면 그대로 사용
    /// 2. 없으면 `DB_*` 항목으로 URL 조립 (SSH 터널 활성 시 터널의 로컬 포트로 대체)
    /// 3. 연결 후 `SELECT 1`로 상태 확인
    /// 4. `DB_AUTO_CREATE_TABLES`가 참이면 누락된 테이블 생성
    pub async fn new() -> AppResult<Self> {
        let url = match DatabaseConfig::url_override() {
            Some(url) => url,
            None => Self::url_from_env().await?,
        };

        let mut options = ConnectOptions::new(url);
        options
            .max_connections(DatabaseConfig::max_connections())
            .min_connections(1)
            .connect_timeout(Duration::from_secs(DatabaseConfig::reconnect_timeout_secs()))
            .acquire_timeout(Duration::from_secs(DatabaseConfig::reconnect_timeout_secs()))
            .max_lifetime(Duration::from_secs(300))
            .sqlx_logging(false);

        let conn = sea_orm::Database::connect(options).await.map_err(|e| {
            log::error!("데이터베이스 연결 실패: {}", e);
            AppError::DatabaseError(e.to_string())
        })?;

        let database = Self { conn };
        database.ping().await?;

        if DatabaseConfig::auto_create_tables() {
            let count = schema::create_tables(&database.conn).await?;
            log::info!("테이블 확인 완료: {}개", count);
        }

        log::info!("✅ 데이터베이스 연결 성공: {:?}", database.conn.get_database_backend());
        Ok(database)
    }

    async fn url_from_env() -> AppResult<String> {
        let db_type = DatabaseConfig::db_type().map_err(AppError::InternalError)?;
        let mut host = DatabaseConfig::host();
        let mut port = DatabaseConfig::port(db_type);

        if TunnelConfig::enabled() {
            let settings = TunnelSettings::from_env(db_type)?;
            port = TUNNEL_MANAGER
                .get_or_create_tunnel(DEFAULT_TUNNEL, &settings)
                .await?;
            host = "127.0.0.1".to_string();
        }

        print_key_values(
            "🗄️  DATABASE",
            &[
                ("type", format!("{:?}", db_type)),
                ("host", format!("{}:{}", host, port)),
                ("database", DatabaseConfig::name()),
                ("user", DatabaseConfig::user()),
                ("ssh tunnel", TunnelConfig::enabled().to_string()),
            ],
        );

        Ok(DatabaseConfig::build_url(
            db_type,
            &DatabaseConfig::user(),
            &DatabaseConfig::password(),
            &host,
            port,
            &DatabaseConfig::name(),
        ))
    }

    /// 이미 열린 연결을 감쌉니다 (테스트, 임베디드 용도).
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub async fn ping(&self) -> AppResult<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! 테스트용 in-memory sqlite 연결

    use super::*;

    /// 단일 커넥션 풀: `sqlite::memory:`는 커넥션마다 별도 DB가 생성됩니다.
    pub async fn memory_connection() -> DatabaseConnection {
        let mut options = ConnectOptions::new("sqlite::memory:".to_string());
        options.max_connections(1).min_connections(1).sqlx_logging(false);
        sea_orm::Database::connect(options).await.unwrap()
    }

    pub async fn memory_database() -> Database {
        let conn = memory_connection().await;
        schema::create_tables(&conn).await.unwrap();
        Database::from_connection(conn)
    }
}
