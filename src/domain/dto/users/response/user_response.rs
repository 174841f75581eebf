//! 사용자 응답 DTO
//!
//! 비밀번호 해시와 내부 차원 키(ip/agent/setting id)는 응답에 포함하지 않습니다.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::LoginType;
use crate::domain::entities::users::user::Model as User;

/// 회원가입 완료 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredUserResponse {
    pub id: i64,
    pub name: String,
    pub nickname: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for RegisteredUserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            nickname: user.nickname,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// 프로필 조회/수정 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub nickname: Option<String>,
    pub bio: Option<String>,
    pub birth: Option<NaiveDate>,
    pub gender: Option<String>,
    pub login_type: LoginType,
    pub login_yn: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            email,
            name,
            nickname,
            bio,
            gender,
            birth,
            login_type,
            login_yn,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id,
            name,
            email,
            nickname,
            bio,
            birth,
            gender,
            login_type,
            login_yn,
            created_at,
            updated_at,
        }
    }
}

/// 이메일 로그인 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: ProfileResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}
