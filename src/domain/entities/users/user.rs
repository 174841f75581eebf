//! User Entity Implementation
//!
//! 이메일 가입 사용자와 OAuth 사용자를 하나의 테이블로 관리합니다.
//! OAuth 전용 계정은 `password`가 `NULL`이며, `login_type`은 마지막으로
//! 사용한 로그인 수단을 나타냅니다.

use chrono::Utc;
use sea_orm::entity::prelude::*;
use sea_orm::Set;

use crate::config::LoginType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    /// 소문자로 정규화된 이메일
    #[sea_orm(unique)]
    pub email: String,

    pub name: String,

    pub nickname: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    pub gender: Option<String>,

    pub birth: Option<Date>,

    /// bcrypt 해시
    pub password: Option<String>,

    pub login_type: LoginType,

    /// 현재 로그인 상태
    pub login_yn: bool,

    pub user_ip_id: Option<i64>,

    pub user_agent_id: Option<i64>,

    pub user_setting_id: Option<i64>,

    pub created_at: DateTimeUtc,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// 이메일/비밀번호 가입용 신규 사용자
    pub fn new_email(name: String, nickname: String, email: String, password_hash: String) -> Self {
        let now = Utc::now();

        Self {
            email: Set(email),
            name: Set(name),
            nickname: Set(Some(nickname)),
            bio: Set(None),
            gender: Set(None),
            birth: Set(None),
            password: Set(Some(password_hash)),
            login_type: Set(LoginType::Email),
            login_yn: Set(false),
            user_ip_id: Set(None),
            user_agent_id: Set(None),
            user_setting_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }

    /// OAuth 최초 로그인 시 생성되는 사용자 (비밀번호 없음, 로그인 상태)
    pub fn new_oauth(
        name: String,
        nickname: String,
        email: String,
        login_type: LoginType,
        user_ip_id: Option<i64>,
        user_agent_id: Option<i64>,
    ) -> Self {
        let now = Utc::now();

        Self {
            email: Set(email),
            name: Set(name),
            nickname: Set(Some(nickname)),
            bio: Set(None),
            gender: Set(None),
            birth: Set(None),
            password: Set(None),
            login_type: Set(login_type),
            login_yn: Set(true),
            user_ip_id: Set(user_ip_id),
            user_agent_id: Set(user_agent_id),
            user_setting_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
    }
}

impl Model {
    pub fn has_password(&self) -> bool {
        self.password.as_deref().is_some_and(|hash| !hash.is_empty())
    }

    /// 닉네임이 비어 있으면 이름으로 대체
    pub fn display_nickname(&self) -> String {
        self.nickname
            .as_deref()
            .filter(|nickname| !nickname.trim().is_empty())
            .unwrap_or(&self.name)
            .to_string()
    }
}
