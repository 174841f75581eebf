//! 요청자 정보 추출
//!
//! 로그인 기록에 남길 IP와 User-Agent를 요청에서 꺼냅니다.

use actix_web::HttpRequest;
use actix_web::http::header;

/// `user_ip.ip_str` 컬럼 길이. IPv6 텍스트 표기(최대 45자)를 담을 수 있습니다.
pub const MAX_IP_LEN: usize = 64;

/// 로그인 기록용 클라이언트 정보
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: Option<String>,
    pub user_agent: String,
}

impl ClientInfo {
    pub fn from_request(req: &HttpRequest) -> Self {
        Self {
            ip: client_ip(req),
            user_agent: user_agent(req),
        }
    }
}

/// 클라이언트 IP (포트 제외)
///
/// `Forwarded`/`X-Forwarded-For`가 있으면 그 값을, 없으면 소켓 주소를 사용합니다.
/// 컬럼 길이를 넘는 값은 주소가 아니므로 버립니다.
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    let info = req.connection_info();
    info.realip_remote_addr()
        .map(strip_port)
        .filter(|ip| !ip.is_empty() && ip.len() <= MAX_IP_LEN)
}

/// `User-Agent` 헤더. 없으면 빈 문자열
pub fn user_agent(req: &HttpRequest) -> String {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn strip_port(addr: &str) -> String {
    // [::1]:8080
    if let Some(rest) = addr.strip_prefix('[') {
        return rest.split(']').next().unwrap_or_default().to_string();
    }
    // IPv6 주소는 콜론이 여러 개
    match addr.matches(':').count() {
        1 => addr.split(':').next().unwrap_or_default().to_string(),
        _ => addr.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("127.0.0.1:54321"), "127.0.0.1");
        assert_eq!(strip_port("10.0.0.7"), "10.0.0.7");
        assert_eq!(strip_port("[::1]:8080"), "::1");
        assert_eq!(strip_port("fe80::1"), "fe80::1");
    }

    #[test]
    fn test_client_info_from_request() {
        let req = TestRequest::default()
            .peer_addr("192.168.0.10:40000".parse().unwrap())
            .insert_header((header::USER_AGENT, "Mozilla/5.0"))
            .to_http_request();

        let info = ClientInfo::from_request(&req);
        assert_eq!(info.ip.as_deref(), Some("192.168.0.10"));
        assert_eq!(info.user_agent, "Mozilla/5.0");
    }

    #[test]
    fn test_forwarded_for_takes_precedence() {
        let req = TestRequest::default()
            .peer_addr("10.0.0.1:40000".parse().unwrap())
            .insert_header(("x-forwarded-for", "203.0.113.5"))
            .to_http_request();

        assert_eq!(client_ip(&req).as_deref(), Some("203.0.113.5"));
        assert_eq!(user_agent(&req), "");
    }

    #[test]
    fn test_oversized_forwarded_for_is_dropped() {
        let req = TestRequest::default()
            .insert_header(("x-forwarded-for", "x".repeat(300)))
            .to_http_request();

        assert_eq!(client_ip(&req), None);
    }
}
