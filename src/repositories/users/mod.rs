//! 사용자 데이터 액세스 계층
//!
//! 사용자 본 테이블과 설정, 접속 IP/User-Agent 차원 테이블, 로그인 이력을 다룹니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::users::user_repo::UserRepository;
//!
//! let user_repo = UserRepository::instance()?;
//! let user = user_repo.find_by_email(db.conn(), "user@example.com").await?;
//! ```

pub mod login_log_repo;
pub mod user_agent_repo;
pub mod user_ip_repo;
pub mod user_repo;
pub mod user_setting_repo;
