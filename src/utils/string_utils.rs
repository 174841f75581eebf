//! # 문자열 유틸리티
//!
//! 이메일 정규화, 선택 문자열 정리, 디버그 출력용 비밀값 마스킹 등
//! 문자열 처리와 관련된 공통 함수들입니다.

use serde::Deserialize;

/// 마스킹 시 노출되는 앞부분 길이
const MASK_VISIBLE_CHARS: usize = 10;

/// 이메일 정규화 (앞뒤 공백 제거 + 소문자)
///
/// 사용자 조회, 인증번호 수신자 비교 등 이메일을 키로 쓰는 모든 곳에서 사용합니다.
///
/// ```rust,ignore
/// assert_eq!(normalize_email("  Hong@Example.COM "), "hong@example.com");
/// ```
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// 선택적 문자열 필드 정리
///
/// None 값이거나 빈 문자열/공백만 있는 경우 None을 반환하고,
/// 유효한 문자열인 경우 앞뒤 공백을 제거한 문자열을 Some으로 반환합니다.
///
/// ```rust,ignore
/// assert_eq!(clean_optional_string(Some("  Hello  ".to_string())), Some("Hello".to_string()));
/// assert_eq!(clean_optional_string(Some("   ".to_string())), None);
/// assert_eq!(clean_optional_string(None), None);
/// ```
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 디버그 응답용 비밀값 마스킹
///
/// 앞 10자만 남기고 `...`을 붙입니다. 값이 없으면 `설정되지 않음`.
///
/// ```rust,ignore
/// assert_eq!(mask_secret(Some("1234567890abcdef")), "1234567890...");
/// assert_eq!(mask_secret(None), "설정되지 않음");
/// ```
pub fn mask_secret(value: Option<&str>) -> String {
    match value {
        Some(secret) if !secret.is_empty() => {
            let visible: String = secret.chars().take(MASK_VISIBLE_CHARS).collect();
            format!("{}...", visible)
        }
        _ => "설정되지 않음".to_string(),
    }
}

/// 선택적 문자열 필드를 위한 serde deserializer
///
/// 빈 문자열이나 공백만 있는 문자열은 None, 그 외에는 trim 후 Some으로 변환합니다.
/// `#[serde(default, deserialize_with = "deserialize_optional_string")]`와 함께 사용합니다.
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}
