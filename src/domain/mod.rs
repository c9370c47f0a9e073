//! # Domain Layer
//!
//! 도서 판매/대여 서비스의 도메인 계층입니다.
//!
//! ```text
//! domain/
//! ├── entities/   - MongoDB 문서 (User, Book, Comment, Payment)
//! ├── models/     - 값 객체와 순수 규칙 (접근 판정, 인증 컨텍스트, 토큰, 결제 세션)
//! └── dto/        - API 요청/응답 계약
//! ```
//!
//! ## 의존 방향
//!
//! - `entities`는 다른 도메인 모듈에 의존하지 않습니다 (설정의 `Role` 제외)
//! - `models`는 `entities`를 읽기만 합니다
//! - `dto`는 `entities`/`models`에서 변환되며 역방향 의존은 없습니다
//!
//! 핵심 규칙인 콘텐츠 접근 판정은 [`models::access::evaluate_access`]에 있으며,
//! I/O 없이 도서 문서의 구매/대여 이력과 현재 시각만으로 결정됩니다.

pub mod entities;
pub mod dto;
pub mod models;

pub use entities::*;
pub use models::*;
