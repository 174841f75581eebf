//! # JWT 토큰 서비스
//!
//! HS256 대칭키로 액세스/리프레시 토큰을 발급하고 검증합니다.
//!
//! 로그아웃된 토큰은 프로세스 메모리의 폐기 목록에 SHA-256 다이제스트로
//! 보관됩니다. 서버 재시작 시 초기화되며, 만료 전까지만 의미가 있습니다.
//!
//! ```rust,ignore
//! let token_service = TokenService::instance()?;
//! let pair = token_service.create_token_pair(&TokenSubject::new(email, nickname))?;
//! let claims = token_service.verify_token(&pair.access_token);
//! ```

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use sha2::{Digest, Sha256};

use crate::config::JwtConfig;
use crate::core::errors::{AppError, AppResult};
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::domain::models::token::token::{TokenClaims, TokenPair, TokenSubject, TokenType};
use crate::register_service;

pub const MISSING_TOKEN_MESSAGE: &str = "토큰이 없습니다.";
pub const MALFORMED_TOKEN_MESSAGE: &str = "유효하지 않은 토큰 형식입니다.";
pub const INVALID_TOKEN_MESSAGE: &str = "유효하지 않은 토큰입니다.";
pub const ACCESS_TOKEN_REQUIRED_MESSAGE: &str = "액세스 토큰이 필요합니다.";

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_minutes: i64,
    refresh_minutes: i64,
    revoked: Mutex<HashSet<String>>,
}

impl TokenService {
    fn from_env() -> AppResult<Self> {
        Ok(Self::with_secret(
            &JwtConfig::secret(),
            JwtConfig::access_token_expire_minutes(),
            JwtConfig::refresh_token_expire_minutes(),
        ))
    }

    pub fn with_secret(secret: &str, access_minutes: i64, refresh_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_minutes,
            refresh_minutes,
            revoked: Mutex::new(HashSet::new()),
        }
    }

    pub fn create_access_token(&self, subject: &TokenSubject) -> AppResult<String> {
        let token = self.issue(subject, TokenType::Access, self.access_minutes)?;
        log::info!("액세스 토큰 생성 완료: {}", subject.email);
        Ok(token)
    }

    pub fn create_refresh_token(&self, subject: &TokenSubject) -> AppResult<String> {
        let token = self.issue(subject, TokenType::Refresh, self.refresh_minutes)?;
        log::info!("리프레시 토큰 생성 완료: {}", subject.email);
        Ok(token)
    }

    pub fn create_token_pair(&self, subject: &TokenSubject) -> AppResult<TokenPair> {
        Ok(TokenPair::bearer(
            self.create_access_token(subject)?,
            self.create_refresh_token(subject)?,
        ))
    }

    fn issue(&self, subject: &TokenSubject, token_type: TokenType, minutes: i64) -> AppResult<String> {
        let claims = TokenClaims {
            email: subject.email.clone(),
            nickname: subject.nickname.clone(),
            exp: (Utc::now() + Duration::minutes(minutes)).timestamp(),
            token_type,
            extra: subject.extra.clone(),
        };
        self.encode_claims(&claims)
    }

    pub(crate) fn encode_claims(&self, claims: &TokenClaims) -> AppResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            log::error!("토큰 생성 실패: {}", e);
            AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e))
        })
    }

    /// 서명과 만료를 검증합니다. 폐기된 토큰은 `None`.
    pub fn verify_token(&self, token: &str) -> Option<TokenClaims> {
        if self.is_revoked(token) {
            log::warn!("토큰 검증 실패: 폐기된 토큰");
            return None;
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<TokenClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => log::warn!("토큰 만료됨"),
                    _ => log::warn!("유효하지 않은 토큰: {}", e),
                }
                None
            }
        }
    }

    /// 액세스 토큰에서 사용자 정보를 추출합니다. 리프레시 토큰이나 이메일이 없는 토큰은 `None`.
    pub fn extract_user_info(&self, token: &str) -> Option<TokenSubject> {
        let claims = self.verify_token(token)?;

        if claims.token_type != TokenType::Access {
            log::warn!("사용자 정보 추출 실패: 액세스 토큰이 아님");
            return None;
        }
        if claims.email.trim().is_empty() {
            log::warn!("사용자 정보 추출 실패: 토큰에 이메일 정보 없음");
            return None;
        }

        Some(TokenSubject::from(claims))
    }

    /// `Authorization` 헤더 값으로 요청 사용자를 인증합니다.
    ///
    /// # Errors
    ///
    /// 실패 사유별 메시지를 담은 `AppError::AuthenticationError`
    pub fn authenticate(&self, authorization: Option<&str>) -> AppResult<AuthenticatedUser> {
        let header = authorization.ok_or_else(|| {
            log::warn!("인증 실패: 토큰 없음");
            AppError::AuthenticationError(MISSING_TOKEN_MESSAGE.to_string())
        })?;

        let token = Self::extract_bearer_token(header).ok_or_else(|| {
            log::warn!("인증 실패: 잘못된 토큰 형식");
            AppError::AuthenticationError(MALFORMED_TOKEN_MESSAGE.to_string())
        })?;

        let claims = self.verify_token(token).ok_or_else(|| {
            AppError::AuthenticationError(INVALID_TOKEN_MESSAGE.to_string())
        })?;

        if claims.token_type != TokenType::Access {
            log::warn!("인증 실패: 액세스 토큰이 아님");
            return Err(AppError::AuthenticationError(
                ACCESS_TOKEN_REQUIRED_MESSAGE.to_string(),
            ));
        }

        Ok(AuthenticatedUser::from_claims(claims, token.to_string()))
    }

    /// 유효한 토큰을 폐기 목록에 추가합니다. 이미 무효한 토큰이면 `false`.
    pub fn invalidate_token(&self, token: &str) -> bool {
        let Some(claims) = self.verify_token(token) else {
            log::warn!("토큰 무효화 실패: 유효하지 않은 토큰");
            return false;
        };

        self.revoked_set().insert(digest(token));
        log::info!("토큰 무효화 완료: {}", claims.email);
        true
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.revoked_set().contains(&digest(token))
    }

    /// 리프레시 토큰으로 같은 클레임의 새 액세스 토큰을 발급합니다.
    pub fn refresh_access_token(&self, refresh_token: &str) -> AppResult<String> {
        let claims = self
            .verify_token(refresh_token)
            .filter(|claims| claims.token_type == TokenType::Refresh)
            .ok_or_else(|| {
                AppError::AuthenticationError("유효하지 않은 리프레시 토큰입니다.".to_string())
            })?;

        self.create_access_token(&TokenSubject::from(claims))
    }

    /// `Bearer <token>` 형식에서 토큰만 추출
    pub fn extract_bearer_token(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    fn revoked_set(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.revoked
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

register_service!(TokenService, "token_service", TokenService::from_env);

fn digest(token: &str) -> String {
    Sha256::digest(token.as_bytes())
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::with_secret("test-secret", 30, 60)
    }

    fn subject() -> TokenSubject {
        TokenSubject::new("user@example.com", "유저")
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = service();
        let token = service.create_access_token(&subject()).unwrap();
        let claims = service.verify_token(&token).unwrap();

        assert_eq!(claims.email, "user@example.com");
        assert_eq!(claims.nickname, "유저");
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(claims.exp > Utc::now().timestamp());
        assert_eq!(service.extract_user_info(&token), Some(subject()));
    }

    #[test]
    fn test_extra_claims_survive_round_trip() {
        let service = service();
        let subject = subject().with_claim("user_id", 42).with_claim("role", "member");

        let token = service.create_access_token(&subject).unwrap();
        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.extra.get("user_id"), Some(&serde_json::Value::from(42)));
        assert_eq!(claims.extra["role"], "member");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(service.extract_user_info(&token), Some(subject.clone()));

        let refresh = service.create_refresh_token(&subject).unwrap();
        let access = service.refresh_access_token(&refresh).unwrap();
        assert_eq!(service.extract_user_info(&access), Some(subject));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = service();
        let token = service
            .encode_claims(&TokenClaims {
                email: "user@example.com".to_string(),
                nickname: String::new(),
                exp: Utc::now().timestamp() - 5,
                token_type: TokenType::Access,
                extra: Default::default(),
            })
            .unwrap();

        assert!(service.verify_token(&token).is_none());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = service().create_access_token(&subject()).unwrap();
        let other = TokenService::with_secret("other-secret", 30, 60);
        assert!(other.verify_token(&token).is_none());
    }

    #[test]
    fn test_invalidated_token_is_rejected() {
        let service = service();
        let token = service.create_access_token(&subject()).unwrap();

        assert!(service.invalidate_token(&token));
        assert!(service.is_revoked(&token));
        assert!(service.verify_token(&token).is_none());
        assert!(!service.invalidate_token(&token));
    }

    #[test]
    fn test_refresh_token_cannot_extract_user() {
        let service = service();
        let refresh = service.create_refresh_token(&subject()).unwrap();
        assert!(service.extract_user_info(&refresh).is_none());
    }

    #[test]
    fn test_refresh_access_token() {
        let service = service();
        let pair = service.create_token_pair(&subject()).unwrap();
        assert_eq!(pair.token_type, "Bearer");

        let access = service.refresh_access_token(&pair.refresh_token).unwrap();
        assert_eq!(service.extract_user_info(&access), Some(subject()));

        assert!(matches!(
            service.refresh_access_token(&pair.access_token),
            Err(AppError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_authenticate_messages() {
        let service = service();
        let pair = service.create_token_pair(&subject()).unwrap();

        let message = |result: AppResult<AuthenticatedUser>| match result {
            Err(AppError::AuthenticationError(msg)) => msg,
            other => panic!("unexpected: {:?}", other),
        };

        assert_eq!(message(service.authenticate(None)), MISSING_TOKEN_MESSAGE);
        assert_eq!(
            message(service.authenticate(Some("Token abc"))),
            MALFORMED_TOKEN_MESSAGE
        );
        assert_eq!(
            message(service.authenticate(Some("Bearer not.a.jwt"))),
            INVALID_TOKEN_MESSAGE
        );
        let refresh_header = format!("Bearer {}", pair.refresh_token);
        assert_eq!(
            message(service.authenticate(Some(&refresh_header))),
            ACCESS_TOKEN_REQUIRED_MESSAGE
        );

        let header = format!("Bearer {}", pair.access_token);
        let user = service.authenticate(Some(&header)).unwrap();
        assert_eq!(user.email, "user@example.com");
        assert_eq!(user.token, pair.access_token);
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(TokenService::extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(TokenService::extract_bearer_token("Bearer "), None);
        assert_eq!(TokenService::extract_bearer_token("Basic abc"), None);
    }
}
