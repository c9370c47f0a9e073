//! # Book Data Transfer Objects Module
//!
//! 카탈로그 CRUD, 페이지네이션 목록, 내 서재, 콘텐츠 접근 API의 요청/응답 구조입니다.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
