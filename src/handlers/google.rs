//! Google 소셜 로그인 핸들러 (`/google`)

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
use crate::services::auth::GoogleAuthService;
use crate::utils::client_info::ClientInfo;

/// 인가 코드로 로그인하고 로컬 JWT를 발급합니다.
#[post("/login")]
pub async fn login(
    req: HttpRequest,
    payload: web::Json<OAuthCodeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let google = GoogleAuthService::instance()?;
    let result = OAuthLoginService::instance()?
        .login_with_code(google.as_ref(), &payload.code, None, &ClientInfo::from_request(&req))
        .await?;

    Ok(oauth_login_response(result, "구글 로그인이 완료되었습니다."))
}

#[post("/auth")]
pub async fn auth_url(payload: web::Json<OAuthAuthUrlRequest>) -> Result<HttpResponse, AppError> {
    let response = GoogleAuthService::instance()?
        .auth_url(payload.scope.as_deref(), payload.prompt.as_deref())?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("구글 인증 URL이 생성되었습니다.", response)))
}

#[post("/callback")]
pub async fn callback(
    req: HttpRequest,
    payload: web::Json<OAuthCodeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let google = GoogleAuthService::instance()?;
    let result = OAuthLoginService::instance()?
        .login_with_code(google.as_ref(), &payload.code, None, &ClientInfo::from_request(&req))
        .await?;

    Ok(oauth_callback_response(result, false))
}

/// 브라우저 리다이렉트 콜백. 토큰을 쿠키로도 설정합니다.
#[get("/callback")]
pub async fn callback_redirect(
    req: HttpRequest,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let code = callback_code(&query)?;

    let google = GoogleAuthService::instance()?;
    let result = OAuthLoginService::instance()?
        .login_with_code(google.as_ref(), &code, None, &ClientInfo::from_request(&req))
        .await?;

    Ok(oauth_callback_response(result, true))
}

/// Google 토큰 갱신 결과를 그대로 반환
#[post("/token/refresh")]
pub async fn refresh_token(payload: web::Json<OAuthRefreshRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let token_data = GoogleAuthService::instance()?
        .refresh_token(&payload.refresh_token)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("토큰 갱신이 완료되었습니다.", token_data)))
}

#[post("/user/info")]
pub async fn user_info(payload: web::Json<OAuthAccessTokenRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let google = GoogleAuthService::instance()?;
    let token_info = google.get_token_info(&payload.access_token).await.map_err(|e| {
        log::warn!("구글 토큰 검증 실패: {}", e);
        AppError::AuthenticationError(INVALID_TOKEN_MESSAGE.to_string())
    })?;
    let user_info = google.get_user_info(&payload.access_token).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "사용자 정보 조회가 완료되었습니다.",
        json!({
            "user_info": user_info,
            "scopes_status": {
                "token_info": token_info,
                "token_valid": true,
            }
        }),
    )))
}

#[post("/debug")]
pub async fn debug(payload: Option<web::Json<OAuthDebugRequest>>) -> Result<HttpResponse, AppError> {
    let access_token = payload.and_then(|p| p.into_inner().access_token);

    let info = GoogleAuthService::instance()?
        .get_debug_info(access_token.as_deref())
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success("디버그 정보 조회가 완료되었습니다.", info)))
}
