//! 로그인/로그아웃 이력
//!
//! 사용자당 한 행만 유지하며, 마지막 이벤트로 덮어씁니다.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_login_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique)]
    pub user_id: i64,

    pub event_type: LoginEventType,

    pub event_at: DateTimeUtc,

    pub event_at_unix: i64,

    pub ip_id: Option<i64>,

    pub user_agent_id: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum LoginEventType {
    #[sea_orm(string_value = "LOGIN")]
    #[serde(rename = "LOGIN")]
    Login,
    #[sea_orm(string_value = "LOGOUT")]
    #[serde(rename = "LOGOUT")]
    Logout,
}
