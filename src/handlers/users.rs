//! # User HTTP Handlers
//!
//! | 메서드 | 경로 | 인증 | 설명 |
//! |--------|------|------|------|
//! | `POST` | `/user/register` | - | 이메일 회원가입 (201) |
//! | `POST` | `/user/login` | - | 이메일 로그인, 토큰 헤더 포함 |
//! | `POST` | `/user/logout` | Bearer | 토큰 폐기, 로그아웃 이력 |
//! | `GET` | `/user/profile` | Bearer | 프로필 조회 |
//! | `PUT` | `/user/profile` | Bearer | 프로필 수정 |
//! | `POST` | `/user/token/refresh` | - | 액세스 토큰 재발급 |

use actix_web::{HttpRequest, HttpResponse, get, post, put, web};
use validator::Validate;

use super::responses::with_token_headers;
use crate::core::errors::AppError;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::tokens::{AccessTokenResponse, RefreshTokenRequest};
use crate::domain::dto::users::request::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use crate::domain::dto::users::response::{LoginResponse, ProfileResponse, RegisteredUserResponse};
use crate::domain::models::auth::authenticated_user::AuthenticatedUser;
use crate::middlewares::AuthMiddleware;
use crate::services::users::UserService;
use crate::utils::client_info::ClientInfo;

/// 이메일 회원가입
///
/// ```json
/// { "name": "홍길동", "nickname": "길동", "email": "hong@example.com",
///   "password": "password123", "confirm_password": "password123" }
/// ```
///
/// 중복 이메일은 400 "이미 존재하는 이메일입니다."
#[post("/register")]
pub async fn register(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user = UserService::instance()?.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        "회원가입이 완료되었습니다.",
        RegisteredUserResponse::from(user),
    )))
}

/// 이메일 로그인
///
/// 본문의 토큰과 같은 값을 `X-Access-Token` / `X-Refresh-Token` 헤더로도 반환합니다.
#[post("/login")]
pub async fn login(
    req: HttpRequest,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.ensure_present()?;

    let client = ClientInfo::from_request(&req);
    let outcome = UserService::instance()?
        .login(payload.into_inner(), &client)
        .await?;

    let tokens = outcome.tokens;
    let body = LoginResponse {
        user: ProfileResponse::from(outcome.user),
        access_token: tokens.access_token.clone(),
        refresh_token: tokens.refresh_token.clone(),
        token_type: tokens.token_type.clone(),
    };

    Ok(with_token_headers(&mut HttpResponse::Ok(), &tokens)
        .json(ApiResponse::success("로그인이 완료되었습니다.", body)))
}

#[post("/logout", wrap = "AuthMiddleware::required()")]
pub async fn logout(req: HttpRequest, user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let client = ClientInfo::from_request(&req);
    UserService::instance()?.logout(&user, &client).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("로그아웃 되었습니다.")))
}

#[get("/profile", wrap = "AuthMiddleware::required()")]
pub async fn get_profile(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let profile = UserService::instance()?.get_profile(&user.email).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "프로필 조회가 완료되었습니다.",
        ProfileResponse::from(profile),
    )))
}

/// 요청에 포함된 필드만 수정합니다.
#[put("/profile", wrap = "AuthMiddleware::required()")]
pub async fn update_profile(
    user: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let updated = UserService::instance()?
        .update_profile(&user.email, payload.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "프로필이 수정되었습니다.",
        ProfileResponse::from(updated),
    )))
}

#[post("/token/refresh")]
pub async fn refresh_token(payload: web::Json<RefreshTokenRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let access_token = UserService::instance()?.refresh_access_token(&payload.refresh_token)?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "토큰이 갱신되었습니다.",
        AccessTokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
        },
    )))
}
