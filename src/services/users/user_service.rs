//! # 사용자 관리 서비스
//!
//! 이메일 회원가입, 로그인/로그아웃, 프로필 조회·수정을 담당합니다.
//!
//! ## 처리 흐름
//!
//! ```text
//! Handler ──▶ UserService ──▶ transaction::begin
//!                  │                 │
//!                  │                 ├─ UserRepository
//!                  │                 ├─ UserSettingRepository
//!                  │                 └─ LoginHistoryService (IP / User-Agent / 로그인 이력)
//!                  │
//!                  └─ TokenService (JWT 발급 / 폐기)
//! ```
//!
//! 각 공개 메서드는 하나의 트랜잭션으로 실행되며, 실패하면 전체가 롤백됩니다.
//!
//! ## 보안
//!
//! - 비밀번호는 bcrypt로 해싱합니다. cost는 실행 환경별로 다릅니다 ([`PasswordConfig`]).
//! - 비밀번호가 없는 계정(OAuth 가입)은 이메일 로그인을 할 수 없습니다.
//! - 로그아웃한 액세스 토큰은 만료 전까지 폐기 목록에 보관됩니다.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, Set};

use crate::config::PasswordConfig;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::ServiceLocator;
use crate::db::{Database, transaction};
use crate::domain::dto::users::request::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::domain::entities::users::user::{ActiveModel, Model as User};
use crate::domain::entities::users::user_login_log::LoginEventType;
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::token::token::{TokenPair, TokenSubject};
use crate::register_service;
use crate::repositories::users::user_repo::UserRepository;
use crate::repositories::users::user_setting_repo::UserSettingRepository;
use crate::services::auth::token_service::TokenService;
use crate::services::users::login_history::LoginHistoryService;
use crate::utils::client_info::ClientInfo;
use crate::utils::string_utils::{clean_optional_string, normalize_email};

pub use crate::repositories::users::user_repo::DUPLICATE_EMAIL_MESSAGE;
pub const WRONG_PASSWORD_MESSAGE: &str = "비밀번호가 올바르지 않습니다.";

/// 로그인 성공 결과
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub tokens: TokenPair,
}

pub struct UserService {
    db: Arc<Database>,
    user_repo: Arc<UserRepository>,
    setting_repo: Arc<UserSettingRepository>,
    history: Arc<LoginHistoryService>,
    token_service: Arc<TokenService>,
    bcrypt_cost: u32,
}

impl UserService {
    fn from_registry() -> AppResult<Self> {
        Ok(Self::new(
            ServiceLocator::get::<Database>()?,
            UserRepository::instance()?,
            UserSettingRepository::instance()?,
            LoginHistoryService::instance()?,
            TokenService::instance()?,
            PasswordConfig::bcrypt_cost(),
        ))
    }

    pub fn new(
        db: Arc<Database>,
        user_repo: Arc<UserRepository>,
        setting_repo: Arc<UserSettingRepository>,
        history: Arc<LoginHistoryService>,
        token_service: Arc<TokenService>,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            db,
            user_repo,
            setting_repo,
            history,
            token_service,
            bcrypt_cost,
        }
    }

    /// 이메일 회원가입
    ///
    /// 요청 DTO는 핸들러에서 검증을 마친 상태여야 합니다.
    /// 이메일은 소문자로 저장되며, 기본 사용자 설정이 함께 생성됩니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 이미 가입된 이메일
    /// * `AppError::InternalError` - 비밀번호 해싱 실패
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        let email = normalize_email(&request.email);

        let txn = transaction::begin(self.db.conn()).await?;
        let result: AppResult<User> = async {
            if self.user_repo.exists_by_email(&txn, &email).await? {
                return Err(AppError::ValidationError(DUPLICATE_EMAIL_MESSAGE.to_string()));
            }

            let start = std::time::Instant::now();
            let password_hash = bcrypt::hash(&request.password, self.bcrypt_cost)
                .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
            log::debug!("Password hashing took: {:?}", start.elapsed());

            let setting = self.setting_repo.create_default(&txn).await?;

            let mut user = ActiveModel::new_email(
                request.name.trim().to_string(),
                request.nickname.trim().to_string(),
                email.clone(),
                password_hash,
            );
            user.user_setting_id = Set(Some(setting.id));

            self.user_repo.insert(&txn, user).await
        }
        .await;

        let user = transaction::finish(txn, result, "회원가입").await?;
        log::info!("회원가입 완료: {} (id={})", user.email, user.id);
        Ok(user)
    }

    /// 이메일 로그인
    ///
    /// 성공하면 로그인 상태와 접속 정보를 기록하고 JWT 쌍을 발급합니다.
    ///
    /// # Errors
    ///
    /// * `AppError::ValidationError` - 이메일/비밀번호 누락
    /// * `AppError::NotFound` - 가입되지 않은 이메일
    /// * `AppError::AuthenticationError` - 비밀번호 불일치 또는 비밀번호 없는 계정
    pub async fn login(&self, request: LoginRequest, client: &ClientInfo) -> AppResult<LoginOutcome> {
        request.ensure_present()?;
        let email = normalize_email(&request.email);

        let txn = transaction::begin(self.db.conn()).await?;
        let result: AppResult<User> = async {
            let user = self.user_repo.get_by_email(&txn, &email).await?;

            if !self.password_matches(&user, &request.password) {
                log::warn!("비밀번호 불일치: {}", email);
                return Err(AppError::AuthenticationError(WRONG_PASSWORD_MESSAGE.to_string()));
            }

            let refs = self.history.record_client(&txn, client).await?;

            let user_id = user.id;
            let mut active: ActiveModel = user.into();
            active.login_yn = Set(true);
            active.user_ip_id = Set(refs.ip_id);
            active.user_agent_id = Set(refs.user_agent_id);
            let user = self.user_repo.update(&txn, active).await?;

            self.history
                .record_event(&txn, user_id, LoginEventType::Login, refs)
                .await?;

            Ok(user)
        }
        .await;

        let user = transaction::finish(txn, result, "로그인").await?;
        let tokens = self.issue_tokens(&user)?;

        log::info!("로그인 성공: {}", user.email);
        Ok(LoginOutcome { user, tokens })
    }

    /// 로그아웃: 토큰 폐기, 로그인 상태 해제, `LOGOUT` 이력 기록
    ///
    /// 토큰은 기록이 커밋된 뒤에 폐기됩니다.
    pub async fn logout(&self, auth: &AuthenticatedUser, client: &ClientInfo) -> AppResult<()> {
        let txn = transaction::begin(self.db.conn()).await?;
        let result: AppResult<()> = async {
            let user = self.user_repo.get_by_email(&txn, &auth.email).await?;
            let user_id = user.id;

            let refs = self.history.record_client(&txn, client).await?;
            self.user_repo.set_login_state(&txn, user, false).await?;
            self.history
                .record_event(&txn, user_id, LoginEventType::Logout, refs)
                .await?;
            Ok(())
        }
        .await;

        transaction::finish(txn, result, "로그아웃").await?;

        if !self.token_service.invalidate_token(&auth.token) {
            log::warn!("로그아웃 토큰 폐기 실패 (이미 무효): {}", auth.email);
        }
        log::info!("로그아웃: {}", auth.email);
        Ok(())
    }

    pub async fn get_profile(&self, email: &str) -> AppResult<User> {
        self.user_repo
            .get_by_email(self.db.conn(), &normalize_email(email))
            .await
    }

    /// 프로필 수정. 요청에 포함된 필드만 변경하며, 빈 문자열은 값 삭제로 처리합니다.
    pub async fn update_profile(&self, email: &str, request: UpdateProfileRequest) -> AppResult<User> {
        let email = normalize_email(email);

        let txn = transaction::begin(self.db.conn()).await?;
        let result = self.update_profile_in(&txn, &email, request).await;
        transaction::finish(txn, result, "프로필 수정").await
    }

    async fn update_profile_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        email: &str,
        request: UpdateProfileRequest,
    ) -> AppResult<User> {
        let user = self.user_repo.get_by_email(conn, email).await?;
        let mut active: ActiveModel = user.into();

        if let Some(nickname) = request.nickname {
            active.nickname = Set(Some(nickname.trim().to_string()));
        }
        if request.bio.is_some() {
            active.bio = Set(clean_optional_string(request.bio));
        }
        if request.gender.is_some() {
            active.gender = Set(clean_optional_string(request.gender));
        }

        self.user_repo.update(conn, active).await
    }

    /// 리프레시 토큰으로 액세스 토큰 재발급
    pub fn refresh_access_token(&self, refresh_token: &str) -> AppResult<String> {
        self.token_service.refresh_access_token(refresh_token)
    }

    pub fn issue_tokens(&self, user: &User) -> AppResult<TokenPair> {
        let subject = TokenSubject::new(user.email.clone(), user.display_nickname());
        self.token_service.create_token_pair(&subject)
    }

    fn password_matches(&self, user: &User, password: &str) -> bool {
        let Some(hash) = user.password.as_deref().filter(|_| user.has_password()) else {
            return false;
        };

        bcrypt::verify(password, hash).unwrap_or_else(|e| {
            log::error!("비밀번호 검증 중 오류: {}", e);
            false
        })
    }
}

register_service!(UserService, "user_service", UserService::from_registry);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoginType;
    use crate::db::testing::memory_database;
    use crate::domain::entities::users::{user_login_log, user_setting};
    use crate::repositories::users::login_log_repo::LoginLogRepository;
    use crate::repositories::users::user_agent_repo::UserAgentRepository;
    use crate::repositories::users::user_ip_repo::UserIpRepository;
    use crate::services::auth::token_service::INVALID_TOKEN_MESSAGE;
    use sea_orm::{EntityTrait, PaginatorTrait};

    async fn service() -> UserService {
        UserService::new(
            Arc::new(memory_database().await),
            Arc::new(UserRepository),
            Arc::new(UserSettingRepository),
            Arc::new(LoginHistoryService::new(
                Arc::new(UserIpRepository),
                Arc::new(UserAgentRepository),
                Arc::new(LoginLogRepository),
            )),
            Arc::new(TokenService::with_secret("user-service-test", 30, 60)),
            4,
        )
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "홍길동".to_string(),
            nickname: "길동".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            confirm_password: "password123".to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn client() -> ClientInfo {
        ClientInfo {
            ip: Some("127.0.0.1".to_string()),
            user_agent: "test-agent".to_string(),
        }
    }

    #[actix_web::test]
    async fn test_register_hashes_password_and_lowercases_email() {
        let service = service().await;
        let user = service.register(register_request("Hong@Example.com")).await.unwrap();

        assert_eq!(user.email, "hong@example.com");
        assert_eq!(user.login_type, LoginType::Email);
        assert!(user.user_setting_id.is_some());
        let hash = user.password.clone().unwrap();
        assert_ne!(hash, "password123");
        assert!(bcrypt::verify("password123", &hash).unwrap());
    }

    #[actix_web::test]
    async fn test_duplicate_email_is_rejected() {
        let service = service().await;
        service.register(register_request("dup@example.com")).await.unwrap();

        match service.register(register_request("DUP@example.com")).await {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, DUPLICATE_EMAIL_MESSAGE),
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(
            user_setting::Entity::find().count(service.db.conn()).await.unwrap(),
            1
        );
    }

    #[actix_web::test]
    async fn test_login_records_state_and_issues_tokens() {
        let service = service().await;
        service.register(register_request("login@example.com")).await.unwrap();

        let outcome = service
            .login(login_request("Login@Example.com", "password123"), &client())
            .await
            .unwrap();

        assert!(outcome.user.login_yn);
        assert!(outcome.user.user_ip_id.is_some());
        assert_eq!(outcome.tokens.token_type, "Bearer");

        let claims = service.token_service.verify_token(&outcome.tokens.access_token).unwrap();
        assert_eq!(claims.email, "login@example.com");
        assert_eq!(claims.nickname, "길동");

        let log = user_login_log::Entity::find().one(service.db.conn()).await.unwrap().unwrap();
        assert_eq!(log.user_id, outcome.user.id);
        assert_eq!(log.event_type, LoginEventType::Login);
    }

    #[actix_web::test]
    async fn test_login_failures() {
        let service = service().await;
        service.register(register_request("fail@example.com")).await.unwrap();

        assert!(matches!(
            service.login(login_request("nobody@example.com", "password123"), &client()).await,
            Err(AppError::NotFound(_))
        ));

        match service.login(login_request("fail@example.com", "wrong-password"), &client()).await {
            Err(AppError::AuthenticationError(msg)) => assert_eq!(msg, WRONG_PASSWORD_MESSAGE),
            other => panic!("unexpected: {:?}", other),
        }

        assert!(matches!(
            service.login(login_request("", ""), &client()).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[actix_web::test]
    async fn test_oauth_account_cannot_login_with_password() {
        let service = service().await;
        service
            .user_repo
            .insert(
                service.db.conn(),
                ActiveModel::new_oauth(
                    "카카오".to_string(),
                    "카카오".to_string(),
                    "oauth@example.com".to_string(),
                    LoginType::Kakao,
                    None,
                    None,
                ),
            )
            .await
            .unwrap();

        assert!(matches!(
            service.login(login_request("oauth@example.com", "anything"), &client()).await,
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[actix_web::test]
    async fn test_logout_revokes_token_and_clears_state() {
        let service = service().await;
        service.register(register_request("bye@example.com")).await.unwrap();
        let outcome = service
            .login(login_request("bye@example.com", "password123"), &client())
            .await
            .unwrap();

        let header = format!("Bearer {}", outcome.tokens.access_token);
        let auth = service.token_service.authenticate(Some(&header)).unwrap();
        service.logout(&auth, &client()).await.unwrap();

        let user = service.get_profile("bye@example.com").await.unwrap();
        assert!(!user.login_yn);

        let log = user_login_log::Entity::find().one(service.db.conn()).await.unwrap().unwrap();
        assert_eq!(log.event_type, LoginEventType::Logout);

        match service.token_service.authenticate(Some(&header)) {
            Err(AppError::AuthenticationError(msg)) => assert_eq!(msg, INVALID_TOKEN_MESSAGE),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_failed_logout_keeps_token_valid() {
        let service = service().await;
        let tokens = service
            .token_service
            .create_token_pair(&TokenSubject::new("ghost@example.com", "유령"))
            .unwrap();

        let header = format!("Bearer {}", tokens.access_token);
        let auth = service.token_service.authenticate(Some(&header)).unwrap();

        assert!(matches!(
            service.logout(&auth, &client()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(!service.token_service.is_revoked(&tokens.access_token));
        assert!(service.token_service.authenticate(Some(&header)).is_ok());
    }

    #[actix_web::test]
    async fn test_update_profile_changes_only_given_fields() {
        let service = service().await;
        service.register(register_request("profile@example.com")).await.unwrap();

        let updated = service
            .update_profile(
                "profile@example.com",
                UpdateProfileRequest {
                    nickname: Some("새닉네임".to_string()),
                    bio: Some("  안녕하세요  ".to_string()),
                    gender: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.nickname.as_deref(), Some("새닉네임"));
        assert_eq!(updated.bio.as_deref(), Some("안녕하세요"));
        assert_eq!(updated.name, "홍길동");
        assert!(updated.updated_at >= updated.created_at);
    }

    #[actix_web::test]
    async fn test_refresh_access_token() {
        let service = service().await;
        let user = service.register(register_request("refresh@example.com")).await.unwrap();
        let pair = service.issue_tokens(&user).unwrap();

        let access = service.refresh_access_token(&pair.refresh_token).unwrap();
        assert!(service.token_service.extract_user_info(&access).is_some());
        assert!(service.refresh_access_token(&pair.access_token).is_err());
    }
}
