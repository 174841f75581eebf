//! SMTP 이메일 발송 설정

use super::{env_flag, env_or, env_parse};

/// SMTP 발송 계정 및 서버 정보
///
/// Gmail 등 앱 비밀번호를 사용하는 계정을 기준으로 합니다.
///
/// ```bash
/// export EMAIL_USER="noreply@example.com"
/// export EMAIL_APP_PASSWORD="abcd efgh ijkl mnop"
/// export EMAIL_SMTP_SERVER="smtp.gmail.com"
/// export EMAIL_SMTP_PORT="465"
/// export EMAIL_USE_SSL="true"
/// ```
pub struct EmailConfig;

impl EmailConfig {
    /// 발신자 계정. SMTP 로그인 사용자명으로도 사용됩니다.
    pub fn user() -> String {
        env_or("EMAIL_USER", "")
    }

    pub fn app_password() -> String {
        env_or("EMAIL_APP_PASSWORD", "")
    }

    pub fn smtp_server() -> String {
        env_or("EMAIL_SMTP_SERVER", "smtp.gmail.com")
    }

    /// 미설정 시 SSL 여부에 따라 465 또는 587
    pub fn smtp_port() -> u16 {
        let default = if Self::use_ssl() { 465 } else { 587 };
        env_parse("EMAIL_SMTP_PORT", default)
    }

    /// `true`면 암묵적 TLS, `false`면 STARTTLS
    pub fn use_ssl() -> bool {
        env_flag("EMAIL_USE_SSL", true)
    }

    pub fn from_name() -> String {
        env_or("EMAIL_FROM_NAME", "CloakBox")
    }
}
