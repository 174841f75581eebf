use sea_orm::entity::prelude::*;

/// User-Agent 차원 테이블. 같은 문자열은 한 행만 존재합니다.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_agent")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    #[sea_orm(unique, column_type = "String(StringLen::N(512))")]
    pub user_agent_str: String,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
