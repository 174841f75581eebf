//! # HTTP Request Handlers Module
//!
//! 요청 DTO를 검증하고 서비스 계층을 호출한 뒤 공통 응답 형식으로 감쌉니다.
//!
//! ```text
//! Client ──▶ Handlers (이 모듈) ──▶ Services ──▶ Repositories ──▶ DB
//! ```
//!
//! ## 응답 형식
//!
//! ```json
//! { "status": "success", "message": "...", "data": { ... } }
//! { "status": "error", "message": "...", "error": "VALIDATION_ERROR" }
//! ```
//!
//! 에러는 `AppError`의 `ResponseError` 구현이 상태 코드와 본문을 결정합니다.
//! 서버 내부 오류는 로그에만 상세 내용을 남기고 일반 메시지로 응답합니다.
//!
//! ## 모듈 구성
//!
//! - **`users`**: 회원가입, 로그인/로그아웃, 프로필, 토큰 갱신
//! - **`certification`**: 이메일 인증번호 발송/확인
//! - **`google`**, **`kakao`**, **`naver`**: 소셜 로그인과 프로바이더 API 프록시
//! - **`system`**: 버전, 헬스체크
//! - **`responses`**: 토큰 헤더/쿠키 등 응답 조립 헬퍼

pub mod certification;
pub mod google;
pub mod kakao;
pub mod naver;
pub mod responses;
pub mod system;
pub mod users;
