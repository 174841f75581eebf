//! 프로바이더별 사용자 정보 응답을 공통 프로필로 정규화합니다.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::config::LoginType;

/// 로컬 사용자 생성/갱신에 필요한 최소 정보
#[derive(Debug, Clone, Serialize)]
pub struct OAuthProfile {
    pub provider: LoginType,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub name: Option<String>,
    /// 프로필 사진 URL (Google `picture`)
    pub picture: Option<String>,
}

impl OAuthProfile {
    /// Google `userinfo`: `email`, `name`, `picture`. 닉네임은 제공되지 않습니다.
    pub fn from_google(raw: Value) -> Self {
        Self {
            provider: LoginType::Google,
            email: string_at(&raw, &["email"]),
            nickname: None,
            name: string_at(&raw, &["name"]),
            picture: string_at(&raw, &["picture"]),
        }
    }

    /// Kakao `v2/user/me`: `kakao_account.email`, `kakao_account.profile.nickname`
    pub fn from_kakao(raw: Value) -> Self {
        Self {
            provider: LoginType::Kakao,
            email: string_at(&raw, &["kakao_account", "email"]),
            nickname: string_at(&raw, &["kakao_account", "profile", "nickname"]),
            name: None,
            picture: None,
        }
    }

    /// Naver `v1/nid/me`: `response.email`, `response.nickname`, `response.name`
    pub fn from_naver(raw: Value) -> Self {
        Self {
            provider: LoginType::Naver,
            email: string_at(&raw, &["response", "email"]),
            nickname: string_at(&raw, &["response", "nickname"]),
            name: string_at(&raw, &["response", "name"]),
            picture: None,
        }
    }

    /// 로그인 응답의 `<provider>_info`
    ///
    /// * Google - `email`, `name`, `picture`
    /// * Kakao - `email`, `nickname`
    /// * Naver - `email`, `nickname`, `name`
    pub fn login_info(&self, email: &str) -> Map<String, Value> {
        let info = match self.provider {
            LoginType::Google => json!({
                "email": email,
                "name": self.name.clone().unwrap_or_default(),
                "picture": self.picture.clone().unwrap_or_default(),
            }),
            LoginType::Naver => json!({
                "email": email,
                "nickname": self.nickname,
                "name": self.name,
            }),
            _ => json!({
                "email": email,
                "nickname": self.nickname,
            }),
        };

        let mut wrapped = Map::new();
        wrapped.insert(format!("{}_info", self.provider.as_str()), info);
        wrapped
    }

    /// 신규 사용자 이름: 닉네임 > 이름 > 이메일 앞부분
    pub fn display_name(&self, email: &str) -> String {
        self.nickname
            .clone()
            .or_else(|| self.name.clone())
            .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string())
    }
}

fn string_at(value: &Value, path: &[&str]) -> Option<String> {
    path.iter()
        .try_fold(value, |current, key| current.get(*key))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kakao_profile() {
        let profile = OAuthProfile::from_kakao(json!({
            "id": 1234,
            "kakao_account": {
                "email": "kakao@example.com",
                "profile": { "nickname": "라이언" }
            }
        }));
        assert_eq!(profile.email.as_deref(), Some("kakao@example.com"));
        assert_eq!(profile.nickname.as_deref(), Some("라이언"));
        assert_eq!(profile.display_name("kakao@example.com"), "라이언");
    }

    #[test]
    fn test_naver_profile() {
        let profile = OAuthProfile::from_naver(json!({
            "resultcode": "00",
            "response": { "email": "naver@example.com", "nickname": "", "name": "김네이버" }
        }));
        assert_eq!(profile.email.as_deref(), Some("naver@example.com"));
        assert_eq!(profile.nickname, None);
        assert_eq!(profile.display_name("naver@example.com"), "김네이버");
    }

    #[test]
    fn test_google_profile_falls_back_to_email_prefix() {
        let profile = OAuthProfile::from_google(json!({ "email": "gmail.user@gmail.com" }));
        assert_eq!(profile.nickname, None);
        assert_eq!(profile.display_name("gmail.user@gmail.com"), "gmail.user");
    }

    #[test]
    fn test_google_login_info_includes_picture() {
        let profile = OAuthProfile::from_google(json!({
            "email": "g@gmail.com",
            "name": "구글유저",
            "picture": "https://lh3.googleusercontent.com/a/photo.jpg"
        }));

        let info = profile.login_info("g@gmail.com");
        let google = &info["google_info"];
        assert_eq!(google["name"], "구글유저");
        assert_eq!(google["picture"], "https://lh3.googleusercontent.com/a/photo.jpg");
        assert!(google.get("nickname").is_none());
    }

    #[test]
    fn test_kakao_login_info_shape() {
        let profile = OAuthProfile::from_kakao(json!({
            "kakao_account": { "email": "k@example.com", "profile": { "nickname": "라이언" } }
        }));

        let info = profile.login_info("k@example.com");
        assert_eq!(info["kakao_info"], json!({ "email": "k@example.com", "nickname": "라이언" }));
    }

    #[test]
    fn test_missing_email() {
        let profile = OAuthProfile::from_kakao(json!({ "id": 1 }));
        assert!(profile.email.is_none());
    }
}
