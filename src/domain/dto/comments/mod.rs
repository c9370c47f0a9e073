//! # Comment Data Transfer Objects Module
//!
//! 도서 리뷰(평점 1-5 + 본문) API의 요청/응답 구조입니다.
//! 응답에는 작성자 사용자명과 도서 제목이 함께 실립니다.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
