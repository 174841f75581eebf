//! # 소셜 로그인 공통 흐름
//!
//! 프로바이더에서 받은 프로필로 로컬 사용자를 찾거나 만들고 JWT를 발급합니다.
//!
//! - 신규: 비밀번호 없는 사용자와 기본 설정을 생성
//! - 기존: 로그인 수단, 접속 정보, 로그인 상태를 갱신 (빈 닉네임은 채움)
//! - 공통: `LOGIN` 이력 기록
//!
//! DB 작업은 하나의 트랜잭션이며, 토큰은 커밋 이후에 발급합니다.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, Set};

use super::OAuthProvider;
use super::token_service::TokenService;
use crate::config::LoginType;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::ServiceLocator;
use crate::db::{Database, transaction};
use crate::domain::entities::users::user::{ActiveModel, Model as User};
use crate::domain::entities::users::user_login_log::LoginEventType;
use crate::domain::models::oauth::profile::OAuthProfile;
use crate::domain::models::token::token::{TokenPair, TokenSubject};
use crate::register_service;
use crate::repositories::users::user_repo::UserRepository;
use crate::repositories::users::user_setting_repo::UserSettingRepository;
use crate::services::users::login_history::{ClientRefs, LoginHistoryService};
use crate::utils::client_info::ClientInfo;
use crate::utils::string_utils::normalize_email;

#[derive(Debug, Clone)]
pub struct OAuthLoginResult {
    pub user: User,
    pub tokens: TokenPair,
    pub is_new_user: bool,
    /// 프로바이더 원본 프로필
    pub profile: OAuthProfile,
}

pub struct OAuthLoginService {
    db: Arc<Database>,
    user_repo: Arc<UserRepository>,
    setting_repo: Arc<UserSettingRepository>,
    history: Arc<LoginHistoryService>,
    token_service: Arc<TokenService>,
}

impl OAuthLoginService {
    fn from_registry() -> AppResult<Self> {
        Ok(Self::new(
            ServiceLocator::get::<Database>()?,
            UserRepository::instance()?,
            UserSettingRepository::instance()?,
            LoginHistoryService::instance()?,
            TokenService::instance()?,
        ))
    }

    pub fn new(
        db: Arc<Database>,
        user_repo: Arc<UserRepository>,
        setting_repo: Arc<UserSettingRepository>,
        history: Arc<LoginHistoryService>,
        token_service: Arc<TokenService>,
    ) -> Self {
        Self {
            db,
            user_repo,
            setting_repo,
            history,
            token_service,
        }
    }

    /// 인가 코드 → 액세스 토큰 → 프로필 → 로컬 로그인
    pub async fn login_with_code(
        &self,
        provider: &dyn OAuthProvider,
        code: &str,
        state: Option<&str>,
        client: &ClientInfo,
    ) -> AppResult<OAuthLoginResult> {
        let access_token = provider.exchange_code(code, state).await?;
        let profile = provider.fetch_profile(&access_token).await?;
        self.login_with_profile(profile, client).await
    }

    /// # Errors
    ///
    /// * `AppError::ValidationError` - 프로필에 이메일이 없음
    pub async fn login_with_profile(
        &self,
        profile: OAuthProfile,
        client: &ClientInfo,
    ) -> AppResult<OAuthLoginResult> {
        let email = profile
            .email
            .as_deref()
            .map(normalize_email)
            .ok_or_else(|| AppError::ValidationError(missing_email_message(profile.provider)))?;

        let txn = transaction::begin(self.db.conn()).await?;
        let result: AppResult<(User, bool)> = async {
            let refs = self.history.record_client(&txn, client).await?;

            let (user, is_new_user) = match self.user_repo.find_by_email(&txn, &email).await? {
                Some(existing) => (self.sign_in_existing(&txn, existing, &profile, refs).await?, false),
                None => (self.sign_up(&txn, &email, &profile, refs).await?, true),
            };

            self.history
                .record_event(&txn, user.id, LoginEventType::Login, refs)
                .await?;

            Ok((user, is_new_user))
        }
        .await;

        let label = format!("{} 로그인", profile.provider.as_str());
        let (user, is_new_user) = transaction::finish(txn, result, &label).await?;

        let subject = TokenSubject::new(user.email.clone(), user.display_nickname());
        let tokens = self.token_service.create_token_pair(&subject)?;

        log::info!(
            "{} 로그인 성공: {} (신규: {})",
            profile.provider.as_str(),
            user.email,
            is_new_user
        );

        Ok(OAuthLoginResult {
            user,
            tokens,
            is_new_user,
            profile,
        })
    }

    async fn sign_up<C: ConnectionTrait>(
        &self,
        conn: &C,
        email: &str,
        profile: &OAuthProfile,
        refs: ClientRefs,
    ) -> AppResult<User> {
        let setting = self.setting_repo.create_default(conn).await?;

        let mut user = ActiveModel::new_oauth(
            profile.display_name(email),
            profile.nickname.clone().unwrap_or_default(),
            email.to_string(),
            profile.provider,
            refs.ip_id,
            refs.user_agent_id,
        );
        user.user_setting_id = Set(Some(setting.id));

        let user = self.user_repo.insert(conn, user).await?;
        log::info!("{} 신규 사용자 생성: {}", profile.provider.as_str(), user.email);
        Ok(user)
    }

    async fn sign_in_existing<C: ConnectionTrait>(
        &self,
        conn: &C,
        user: User,
        profile: &OAuthProfile,
        refs: ClientRefs,
    ) -> AppResult<User> {
        let blank_nickname = user
            .nickname
            .as_deref()
            .is_none_or(|nickname| nickname.trim().is_empty());

        let mut active: ActiveModel = user.into();
        active.login_type = Set(profile.provider);
        active.login_yn = Set(true);
        active.user_ip_id = Set(refs.ip_id);
        active.user_agent_id = Set(refs.user_agent_id);

        if blank_nickname {
            if let Some(nickname) = profile.nickname.clone() {
                active.nickname = Set(Some(nickname));
            }
        }

        self.user_repo.update(conn, active).await
    }
}

register_service!(OAuthLoginService, "oauth_login_service", OAuthLoginService::from_registry);

fn provider_label(login_type: LoginType) -> &'static str {
    match login_type {
        LoginType::Google => "구글",
        LoginType::Kakao => "카카오",
        LoginType::Naver => "네이버",
        LoginType::Email => "이메일",
    }
}

pub fn missing_email_message(login_type: LoginType) -> String {
    format!(
        "{} 계정에서 이메일 정보를 가져올 수 없습니다.",
        provider_label(login_type)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_database;
    use crate::domain::entities::users::{user as user_entity, user_login_log, user_setting};
    use crate::repositories::users::login_log_repo::LoginLogRepository;
    use crate::repositories::users::user_agent_repo::UserAgentRepository;
    use crate::repositories::users::user_ip_repo::UserIpRepository;
    use async_trait::async_trait;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::json;

    async fn service() -> OAuthLoginService {
        OAuthLoginService::new(
            Arc::new(memory_database().await),
            Arc::new(UserRepository),
            Arc::new(UserSettingRepository),
            Arc::new(LoginHistoryService::new(
                Arc::new(UserIpRepository),
                Arc::new(UserAgentRepository),
                Arc::new(LoginLogRepository),
            )),
            Arc::new(TokenService::with_secret("oauth-test", 30, 60)),
        )
    }

    fn client() -> ClientInfo {
        ClientInfo {
            ip: Some("10.0.0.1".to_string()),
            user_agent: "oauth-agent".to_string(),
        }
    }

    fn kakao_profile(email: Option<&str>) -> OAuthProfile {
        OAuthProfile::from_kakao(json!({
            "id": 42,
            "kakao_account": {
                "email": email,
                "profile": { "nickname": "카카오친구" }
            }
        }))
    }

    struct FakeProvider;

    #[async_trait]
    impl OAuthProvider for FakeProvider {
        fn login_type(&self) -> LoginType {
            LoginType::Kakao
        }

        async fn exchange_code(&self, code: &str, _state: Option<&str>) -> AppResult<String> {
            if code == "good-code" {
                Ok("provider-token".to_string())
            } else {
                Err(AppError::ExternalServiceError("토큰 교환 실패: invalid_grant".to_string()))
            }
        }

        async fn fetch_profile(&self, _access_token: &str) -> AppResult<OAuthProfile> {
            Ok(kakao_profile(Some("Friend@Kakao.com")))
        }
    }

    #[actix_web::test]
    async fn test_first_login_creates_user_and_second_reuses() {
        let service = service().await;

        let first = service
            .login_with_code(&FakeProvider, "good-code", None, &client())
            .await
            .unwrap();
        assert!(first.is_new_user);
        assert_eq!(first.user.email, "friend@kakao.com");
        assert_eq!(first.user.name, "카카오친구");
        assert_eq!(first.user.login_type, LoginType::Kakao);
        assert!(first.user.login_yn);
        assert!(!first.user.has_password());
        assert!(first.user.user_setting_id.is_some());

        let claims = service.token_service.verify_token(&first.tokens.access_token).unwrap();
        assert_eq!(claims.nickname, "카카오친구");

        let second = service
            .login_with_code(&FakeProvider, "good-code", None, &client())
            .await
            .unwrap();
        assert!(!second.is_new_user);
        assert_eq!(second.user.id, first.user.id);

        let conn = service.db.conn();
        assert_eq!(user_entity::Entity::find().count(conn).await.unwrap(), 1);
        assert_eq!(user_setting::Entity::find().count(conn).await.unwrap(), 1);
        assert_eq!(user_login_log::Entity::find().count(conn).await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn test_existing_email_user_switches_login_type_and_fills_nickname() {
        let service = service().await;
        let mut existing = ActiveModel::new_email(
            "홍길동".to_string(),
            String::new(),
            "friend@kakao.com".to_string(),
            "$2b$04$hash".to_string(),
        );
        existing.nickname = Set(None);
        service.user_repo.insert(service.db.conn(), existing).await.unwrap();

        let result = service
            .login_with_profile(kakao_profile(Some("friend@kakao.com")), &client())
            .await
            .unwrap();

        assert!(!result.is_new_user);
        assert_eq!(result.user.login_type, LoginType::Kakao);
        assert_eq!(result.user.nickname.as_deref(), Some("카카오친구"));
        assert_eq!(result.user.name, "홍길동");
        assert!(result.user.has_password());
    }

    #[actix_web::test]
    async fn test_missing_email_is_rejected() {
        let service = service().await;

        match service.login_with_profile(kakao_profile(None), &client()).await {
            Err(AppError::ValidationError(msg)) => {
                assert_eq!(msg, "카카오 계정에서 이메일 정보를 가져올 수 없습니다.")
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(
            user_entity::Entity::find().count(service.db.conn()).await.unwrap(),
            0
        );
    }

    #[actix_web::test]
    async fn test_exchange_failure_propagates() {
        let service = service().await;
        assert!(matches!(
            service.login_with_code(&FakeProvider, "bad-code", None, &client()).await,
            Err(AppError::ExternalServiceError(_))
        ));
    }
}
