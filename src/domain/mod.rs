//! # Domain Layer Module
//!
//! ```text
//! Domain Layer (이 모듈)
//! ├── entities  - sea-orm 엔티티 (테이블 정의)
//! ├── dto       - HTTP 요청/응답 (validator 검증 포함)
//! └── models    - 비영속 도메인 모델 (JWT 클레임, 인증 사용자, OAuth 프로필)
//!      │
//!      ▼
//! Application Layer (services)
//!      │
//!      ▼
//! Infrastructure Layer (repositories, db)
//! ```

pub mod dto;
pub mod entities;
pub mod models;
