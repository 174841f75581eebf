//! CloakBox 인증 백엔드
//!
//! 이메일 회원가입/로그인, 이메일 인증번호, 소셜 로그인(Google, Kakao, Naver)과
//! JWT 세션을 제공하는 REST API 서비스입니다.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트 (/{API_PREFIX}/...)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 검증 / 응답 조립
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직, 트랜잭션, 외부 OAuth/SMTP 호출
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← sea-orm 데이터 액세스
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ PostgreSQL /    │ ← 저장소 (개발 시 SSH 터널 경유 가능)
//! │ MariaDB         │
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use cloakbox_api::core::registry::ServiceLocator;
//! use cloakbox_api::db::Database;
//! use cloakbox_api::services::users::UserService;
//!
//! ServiceLocator::set(Arc::new(Database::new().await?));
//! ServiceLocator::initialize_all()?;
//!
//! let user = UserService::instance()?.register(request).await?;
//! ```

pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod handlers;
pub mod middlewares;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod utils;
