//! JWT 클레임 및 토큰 쌍
//!
//! 액세스 토큰과 리프레시 토큰은 같은 클레임 구조를 사용하며
//! `type` 필드(`access`/`refresh`)로 구분합니다. 이메일/닉네임 외의 클레임은
//! `extra`에 담겨 그대로 인코딩되고 디코딩 시 복원됩니다.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 토큰 생성 시 호출자가 덮어쓸 수 없는 클레임 키
pub const RESERVED_CLAIMS: [&str; 4] = ["email", "nickname", "exp", "type"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,

    #[serde(default)]
    pub nickname: String,

    /// 만료 시각 (epoch 초)
    pub exp: i64,

    #[serde(rename = "type")]
    pub token_type: TokenType,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 토큰 발급에 사용하는 사용자 식별 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenSubject {
    pub email: String,
    pub nickname: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenSubject {
    pub fn new(email: impl Into<String>, nickname: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            nickname: nickname.into(),
            extra: Map::new(),
        }
    }

    /// 추가 클레임. 예약된 키(`email`, `nickname`, `exp`, `type`)는 무시됩니다.
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if RESERVED_CLAIMS.contains(&key.as_str()) {
            log::warn!("예약된 클레임 키는 사용할 수 없습니다: {}", key);
            return self;
        }
        self.extra.insert(key, value.into());
        self
    }
}

impl From<TokenClaims> for TokenSubject {
    fn from(claims: TokenClaims) -> Self {
        Self {
            email: claims.email,
            nickname: claims.nickname,
            extra: claims.extra,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

impl TokenPair {
    pub fn bearer(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_use_type_field() {
        let claims = TokenClaims {
            email: "a@example.com".to_string(),
            nickname: "에이".to_string(),
            exp: 100,
            token_type: TokenType::Refresh,
            extra: Map::new(),
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["type"], "refresh");
        assert_eq!(value["exp"], 100);
    }

    #[test]
    fn test_extra_claims_are_flattened() {
        let claims: TokenClaims = serde_json::from_value(serde_json::json!({
            "email": "a@example.com",
            "nickname": "에이",
            "user_id": 42,
            "exp": 100,
            "type": "access"
        }))
        .unwrap();
        assert_eq!(claims.extra.get("user_id"), Some(&Value::from(42)));
        assert!(!claims.extra.contains_key("email"));

        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["user_id"], 42);
    }

    #[test]
    fn test_with_claim_skips_reserved_keys() {
        let subject = TokenSubject::new("a@example.com", "에이")
            .with_claim("role", "admin")
            .with_claim("exp", 1);
        assert_eq!(subject.extra.len(), 1);
        assert_eq!(subject.extra["role"], "admin");
    }
}
