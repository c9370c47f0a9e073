//! `crate::errors::errors::AppError` 경로 호환용 재노출
//!
//! 실제 정의는 [`crate::core::errors`]에 있습니다.

pub use crate::core::errors::{AppError, AppResult, ErrorContext};
