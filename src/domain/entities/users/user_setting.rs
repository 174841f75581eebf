//! 사용자별 화면 설정

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "user_setting")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// `Y`/`N`
    #[sea_orm(column_type = "String(StringLen::N(1))")]
    pub dark_mode: String,

    pub editor_mode: Option<String>,

    pub lang_cd: String,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// 다크모드 `N`, 언어 `ko`
    pub fn defaults() -> Self {
        let now = Utc::now();

        Self {
            dark_mode: Set("N".to_string()),
            editor_mode: Set(None),
            lang_cd: Set("ko".to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}
