//! # Core Framework Module
//!
//! 백엔드 전체가 공유하는 두 가지 기반 기능을 제공합니다.
//!
//! ### [`registry`] - 의존성 주입 컨테이너
//! - **ServiceLocator**: 타입 기반 싱글톤 저장소
//! - **자동 레지스트리**: `inventory` 기반 컴파일 타임 서비스 등록
//! - **의존성 해결**: `Arc<T>` 필드 자동 주입 (`singleton_macro`)
//!
//! ### [`errors`] - 통합 에러 처리
//! - **AppError**: 애플리케이션 전역 에러 타입
//! - **HTTP 통합**: Actix-Web `ResponseError` 구현
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use singleton_macro::{repository, service};
//!
//! #[repository(name = "book", collection = "books")]
//! pub struct BookRepository {
//!     db: Arc<Database>,
//!     redis: Arc<RedisClient>,
//! }
//!
//! #[service(name = "book")]
//! pub struct BookService {
//!     book_repo: Arc<BookRepository>,  // 자동 주입
//! }
//!
//! let book_service = BookService::instance();
//! ```
//!
//! ### 애플리케이션 초기화
//!
//! ```rust,ignore
//! ServiceLocator::set(database);
//! ServiceLocator::set(redis_client);
//! ServiceLocator::initialize_all().await?;
//! ```
//!
//! ### 미등록 타입 에러
//! ```text
//! panic: Service not found: MailService. Make sure it's registered...
//! ```
//! **해결**: `#[service]` 매크로 적용 또는 `ServiceLocator::set()` 으로 수동 등록

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
