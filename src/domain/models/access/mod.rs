//! 도서 콘텐츠 접근 권한(entitlement) 모델

pub mod entitlement;

pub use entitlement::{evaluate_access, AccessDecision, AccessDenial, AccessGrant};
