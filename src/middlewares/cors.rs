//! CORS 설정
//!
//! 모든 Origin, 메서드, 헤더를 허용하며 `Access-Control-Allow-Origin: *`로
//! 응답합니다. Preflight(`OPTIONS`)는 미들웨어가 직접 응답합니다.

use actix_cors::Cors;

/// Preflight 결과 캐시 시간 (초)
const PREFLIGHT_MAX_AGE: usize = 3600;

/// ```rust,ignore
/// App::new().wrap(configure_cors())
/// ```
pub fn configure_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .send_wildcard()
        .allow_any_method()
        .allow_any_header()
        .expose_headers(vec!["X-Access-Token", "X-Refresh-Token"])
        .max_age(PREFLIGHT_MAX_AGE)
}
