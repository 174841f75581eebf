//! 미들웨어 모듈
//!
//! # 인증 미들웨어 (AuthMiddleware)
//!
//! - `Authorization: Bearer <token>` 헤더에서 액세스 토큰 추출 및 검증
//! - 성공 시 `AuthenticatedUser`를 request extension에 저장
//! - 실패 시 핸들러를 호출하지 않고 401 응답
//!
//! # CORS
//!
//! - [`configure_cors`] - 모든 Origin 허용
//!
//! ```rust,ignore
//! #[get("/profile", wrap = "AuthMiddleware::required()")]
//! async fn get_profile(user: AuthenticatedUser) -> Result<HttpResponse, AppError> { .. }
//! ```

mod auth_inner;
pub mod auth_middleware;
pub mod cors;

pub use auth_middleware::AuthMiddleware;
pub use cors::configure_cors;
