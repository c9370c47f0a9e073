//! # Domain Models Module
//!
//! 영속성 엔티티와 구별되는 도메인 모델과 값 객체를 정의합니다.
//!
//! ## Entities vs Models
//!
//! - **Entities** (`../entities/`): MongoDB 문서와 1:1 매핑, `_id`를 가짐
//! - **Models** (`./`): 요청 단위로 만들어지는 값 객체와 순수 도메인 규칙
//!
//! ## 모듈 구성
//!
//! ```text
//! models/
//! ├── access/     ← 콘텐츠 접근 판정 (순수 함수)
//! ├── auth/       ← 인증 사용자, 인증 모드, 요구 역할
//! ├── checkout/   ← 결제 프로바이더 세션
//! └── token/      ← JWT 클레임, 액세스 토큰
//! ```
//!
//! ## 접근 판정 예시
//!
//! ```rust,ignore
//! use crate::domain::models::access::evaluate_access;
//!
//! let decision = evaluate_access(&user_id, &roles, &book, None, DateTime::now());
//! if decision.is_granted() {
//!     // 콘텐츠 반환
//! }
//! ```

pub mod access;
pub mod auth;
pub mod checkout;
pub mod token;

pub use access::*;
pub use auth::*;
pub use checkout::*;
pub use token::*;
