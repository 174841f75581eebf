//! 사용자 관련 엔티티

pub mod user;
pub mod user_agent;
pub mod user_ip;
pub mod user_login_log;
pub mod user_setting;
