//! 에러 타입 모듈 경로 (`crate::errors::errors`)

pub mod errors;

pub use errors::*;
