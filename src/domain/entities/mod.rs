//! # Entities
//!
//! `sea-orm` 엔티티 정의입니다. 각 모듈의 `Entity`/`Model`/`ActiveModel`이
//! 하나의 테이블에 대응합니다.
//!
//! ```text
//! users ─┬─ user_setting      (user.user_setting_id)
//!        ├─ user_ip           (user.user_ip_id, user_login_log.ip_id)
//!        ├─ user_agent        (user.user_agent_id, user_login_log.user_agent_id)
//!        └─ user_login_log    (사용자당 1행)
//!
//! user_certification          (이메일 인증번호, 사용자와 독립)
//! ```

pub mod certification;
pub mod users;
