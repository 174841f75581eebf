//! 이메일 인증번호 서비스 모듈

pub mod certification_service;

pub use certification_service::CertificationService;
