//! # Payment Data Transfer Objects Module
//!
//! 호스팅 결제 세션 생성, 결제 확정, 결제 내역 API의 요청/응답 구조입니다.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
