//! Naver 소셜 로그인 핸들러 (`/naver`)
//!
//! 로그인/콜백 요청에는 인증 URL 생성 시 받은 `state`를 함께 보내야 합니다.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde_json::json;
use validator::Validate;

use super::responses::{callback_code, oauth_callback_response, oauth_login_response};
use crate::core::errors::AppError;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::oauth::{
    OAuthAccessTokenRequest, OAuthAuthUrlRequest, OAuthCallbackQuery, OAuthCodeRequest,
    OAuthDebugRequest, OAuthRefreshRequest,
};
use crate::services::auth::oauth_login_service::OAuthLoginService;
use crate::services::auth::token_service::INVALID_TOKEN_MESSAGE;
use crate::services::auth::NaverAuthService;
use crate::utils::client_info::ClientInfo;

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    payload: web::Json<OAuthCodeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let naver = NaverAuthService::instance()?;
    let result = OAuthLoginService::instance()?
        .login_with_code(
            naver.as_ref(),
            &payload.code,
            payload.state.as_deref(),
            &ClientInfo::from_request(&req),
        )
        .await?;

    Ok(oauth_login_response(result, "네이버 로그인이 완료되었습니다."))
}

/// `state`를 보내지 않으면 새로 생성해 응답에 포함합니다.
#[post("/auth")]
pub async fn auth_url(payload: web::Json<OAuthAuthUrlRequest>) -> Result<HttpResponse, AppError> {
    let response = NaverAuthService::instance()?
        .auth_url(payload.state.as_deref(), payload.scope.as_deref())?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("네이버 인증 URL이 생성되었습니다.", response)))
}

#[post("/callback")]
pub async fn callback(
    req: HttpRequest,
    payload: web::Json<OAuthCodeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let naver = NaverAuthService::instance()?;
    let result = OAuthLoginService::instance()?
        .login_with_code(
            naver.as_ref(),
            &payload.code,
            payload.state.as_deref(),
            &ClientInfo::from_request(&req),
        )
        .await?;

    Ok(oauth_callback_response(result, false))
}

#[get("/callback")]
pub async fn callback_redirect(
    req: HttpRequest,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let code = callback_code(&query)?;

    let naver = NaverAuthService::instance()?;
    let result = OAuthLoginService::instance()?
        .login_with_code(
            naver.as_ref(),
            &code,
            query.state.as_deref(),
            &ClientInfo::from_request(&req),
        )
        .await?;

    Ok(oauth_callback_response(result, true))
}

#[post("/token/refresh")]
pub async fn refresh_token(payload: web::Json<OAuthRefreshRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let token_data = NaverAuthService::instance()?
        .refresh_token(&payload.refresh_token)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("토큰 갱신이 완료되었습니다.", token_data)))
}

#[post("/user/info")]
pub async fn user_info(payload: web::Json<OAuthAccessTokenRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let user_info = NaverAuthService::instance()?
        .get_user_info(&payload.access_token)
        .await
        .map_err(|e| {
            log::warn!("네이버 토큰 검증 실패: {}", e);
            AppError::AuthenticationError(INVALID_TOKEN_MESSAGE.to_string())
        })?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "네이버 사용자 정보 조회가 완료되었습니다.",
        json!({ "user_info": user_info }),
    )))
}

#[post("/debug")]
pub async fn debug(payload: Option<web::Json<OAuthDebugRequest>>) -> Result<HttpResponse, AppError> {
    let access_token = payload.and_then(|p| p.into_inner().access_token);

    let info = NaverAuthService::instance()?
        .get_debug_info(access_token.as_deref())
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success("네이버 디버그 정보 조회가 완료되었습니다.", info)))
}
