//! Kakao 소셜 로그인과 카카오톡 메시지 핸들러 (`/kakao`)

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde_json::json;
use validator::Validate;

use super::responses::{callback_code, oauth_callback_response, oauth_login_response};
use crate::core::errors::AppError;
use crate::domain::dto::common::ApiResponse;
use crate::domain::dto::oauth::{
    KakaoMessageRequest, KakaoMessageResponse, OAuthAccessTokenRequest, OAuthAuthUrlRequest,
    OAuthCallbackQuery, OAuthCodeRequest, OAuthDebugRequest, OAuthRefreshRequest,
};
use crate::services::auth::kakao_auth_service::KAKAO_MESSAGE_SCOPE;
use crate::services::auth::oauth_login_service::OAuthLoginService;
use crate::services::auth::token_service::INVALID_TOKEN_MESSAGE;
use crate::services::auth::KakaoAuthService;
use crate::utils::client_info::ClientInfo;

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    payload: web::Json<OAuthCodeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let kakao = KakaoAuthService::instance()?;
    let result = OAuthLoginService::instance()?
        .login_with_code(kakao.as_ref(), &payload.code, None, &ClientInfo::from_request(&req))
        .await?;

    Ok(oauth_login_response(result, "카카오 로그인이 완료되었습니다."))
}

/// 기본 scope는 메시지 기능용 `friends,talk_message`
#[post("/auth")]
pub async fn auth_url(payload: web::Json<OAuthAuthUrlRequest>) -> Result<HttpResponse, AppError> {
    let scope = payload.scope.as_deref().unwrap_or(KAKAO_MESSAGE_SCOPE);
    let response = KakaoAuthService::instance()?.auth_url(Some(scope), payload.prompt.as_deref())?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("카카오 인증 URL이 생성되었습니다.", response)))
}

#[post("/callback")]
pub async fn callback(
    req: HttpRequest,
    payload: web::Json<OAuthCodeRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let kakao = KakaoAuthService::instance()?;
    let result = OAuthLoginService::instance()?
        .login_with_code(kakao.as_ref(), &payload.code, None, &ClientInfo::from_request(&req))
        .await?;

    Ok(oauth_callback_response(result, false))
}

#[get("/callback")]
pub async fn callback_redirect(
    req: HttpRequest,
    query: web::Query<OAuthCallbackQuery>,
) -> Result<HttpResponse, AppError> {
    let code = callback_code(&query)?;

    let kakao = KakaoAuthService::instance()?;
    let result = OAuthLoginService::instance()?
        .login_with_code(kakao.as_ref(), &code, None, &ClientInfo::from_request(&req))
        .await?;

    Ok(oauth_callback_response(result, true))
}

#[post("/token/refresh")]
pub async fn refresh_token(payload: web::Json<OAuthRefreshRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let token_data = KakaoAuthService::instance()?
        .refresh_token(&payload.refresh_token)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success("토큰이 갱신되었습니다.", token_data)))
}

/// 사용자 정보와 메시지 기능에 필요한 동의 항목 상태
#[post("/user/info")]
pub async fn user_info(payload: web::Json<OAuthAccessTokenRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;

    let kakao = KakaoAuthService::instance()?;
    if !kakao.validate_token(&payload.access_token).await {
        return Err(AppError::AuthenticationError(INVALID_TOKEN_MESSAGE.to_string()));
    }

    let user_info = kakao.get_user_info(&payload.access_token).await?;
    let scopes_status = kakao.check_required_scope(&payload.access_token).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        "사용자 정보가 조회되었습니다.",
        json!({
            "user_info": user_info,
            "scopes_status": scopes_status,
        }),
    )))
}

/// `friend_uuid`가 있으면 친구에게, 없으면 나에게 보냅니다. 전송 실패는 500.
#[post("/message/send")]
pub async fn send_message(payload: web::Json<KakaoMessageRequest>) -> Result<HttpResponse, AppError> {
    payload.validate()?;
    let request = payload.into_inner();

    let kakao = KakaoAuthService::instance()?;
    if !kakao.validate_token(&request.access_token).await {
        return Err(AppError::AuthenticationError(INVALID_TOKEN_MESSAGE.to_string()));
    }

    let link_url = request.link_url.as_deref();
    let (success, target) = match request.friend_uuid.as_deref().filter(|uuid| !uuid.is_empty()) {
        Some(friend_uuid) => (
            kakao
                .send_message_to_friend(&request.access_token, friend_uuid, &request.message, link_url)
                .await,
            "친구에게",
        ),
        None => (
            kakao
                .send_message_to_self(&request.access_token, &request.message, link_url)
                .await,
            "나에게",
        ),
    };

    let message = format!("{} 메시지 전송 {}", target, if success { "성공" } else { "실패" });
    let data = KakaoMessageResponse {
        success,
        message_sent: request.message,
        link_url: request.link_url,
        friend_uuid: request.friend_uuid,
    };

    if success {
        Ok(HttpResponse::Ok().json(ApiResponse::success(message, data)))
    } else {
        Ok(HttpResponse::InternalServerError().json(ApiResponse::failure(message, data)))
    }
}

#[post("/debug")]
pub async fn debug(payload: Option<web::Json<OAuthDebugRequest>>) -> Result<HttpResponse, AppError> {
    let access_token = payload.and_then(|p| p.into_inner().access_token);

    let info = KakaoAuthService::instance()?
        .get_debug_info(access_token.as_deref())
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success("디버그 정보가 조회되었습니다.", info)))
}
