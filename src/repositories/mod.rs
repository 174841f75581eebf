//! # Repository Layer
//!
//! 테이블 단위 데이터 액세스 계층입니다. 모든 리포지토리는 상태가 없는
//! 싱글톤이며, 메서드는 `ConnectionTrait`를 받아 일반 연결과 트랜잭션에서
//! 동일하게 동작합니다.
//!
//! ```rust,ignore
//! let txn = transaction::begin(db.conn()).await?;
//! let ip_id = UserIpRepository::instance()?.find_or_create(&txn, "10.0.0.1").await?;
//! ```

pub mod certification;
pub mod users;
