//! # Core Module
//!
//! 애플리케이션 전역에서 사용하는 핵심 기반 기능입니다.
//!
//! - [`errors`] - `AppError` 통합 에러 타입과 HTTP 응답 변환
//! - [`registry`] - `inventory` 기반 싱글톤 서비스 로케이터
//!
//! ```rust,ignore
//! use crate::core::{AppError, AppResult, ServiceLocator};
//!
//! ServiceLocator::set(Arc::new(database));
//! let service = CertificationService::instance()?;
//! ```

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
