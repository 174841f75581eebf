//! OAuth 프로바이더 HTTP 공통 처리
//!
//! 프로바이더 응답은 구조가 제각각이므로 `serde_json::Value`로 받고,
//! 실패 응답은 `error_description` > `error` > `알 수 없는 오류` 순으로
//! 메시지를 추출해 `AppError::ExternalServiceError`로 변환합니다.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde_json::Value;

use crate::core::errors::{AppError, AppResult};

pub const UNKNOWN_PROVIDER_ERROR: &str = "알 수 없는 오류";

const REQUEST_TIMEOUT_SECS: u64 = 10;

pub fn http_client() -> AppResult<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| AppError::InternalError(format!("HTTP 클라이언트 생성 실패: {}", e)))
}

/// 실패 응답 본문에서 사용자에게 보여줄 메시지 추출
pub fn provider_error_message(body: &Value) -> String {
    if let Some(description) = body.get("error_description").and_then(Value::as_str) {
        return description.to_string();
    }

    match body.get("error") {
        Some(Value::String(error)) => error.clone(),
        // Google API: {"error": {"code": 401, "message": "..."}}
        Some(Value::Object(error)) => error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_PROVIDER_ERROR)
            .to_string(),
        _ => body
            .get("msg")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_PROVIDER_ERROR)
            .to_string(),
    }
}

/// 요청을 보내고 2xx면 JSON 본문을, 아니면 `ExternalServiceError`를 반환합니다.
pub async fn fetch_json(request: RequestBuilder, action: &str) -> AppResult<Value> {
    let response = request.send().await.map_err(|e| {
        log::error!("{} 요청 실패: {}", action, e);
        AppError::ExternalServiceError(format!("{} 요청 실패", action))
    })?;

    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let body: Value = serde_json::from_str(&text).unwrap_or(Value::Null);

    if !status.is_success() {
        let message = provider_error_message(&body);
        log::warn!("{} 실패 ({}): {}", action, status, message);
        return Err(AppError::ExternalServiceError(format!("{} 실패: {}", action, message)));
    }

    if body.is_null() {
        log::error!("{} 응답 파싱 실패: {}", action, text);
        return Err(AppError::ExternalServiceError(format!("{} 응답 파싱 실패", action)));
    }

    Ok(body)
}

/// 쿼리 파라미터를 퍼센트 인코딩하여 URL을 조립합니다.
pub fn build_url(base: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query)
}

/// 토큰 응답에서 `access_token` 추출
pub fn access_token_of(token_response: &Value) -> AppResult<String> {
    token_response
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            AppError::ExternalServiceError(format!(
                "토큰 교환 실패: {}",
                provider_error_message(token_response)
            ))
        })
}
