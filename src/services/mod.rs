//! 비즈니스 로직 계층
//!
//! - [`auth`] - 가입, 로그인, 토큰 발급/검증
//! - [`users`] - 관리자 사용자 관리, 인증 주체 로딩
//! - [`books`] - 카탈로그, 내 서재, 콘텐츠 접근
//! - [`comments`] - 리뷰와 평점
//! - [`payments`] - 호스팅 결제 세션과 확정

pub mod auth;
pub mod users;
pub mod books;
pub mod comments;
pub mod payments;
