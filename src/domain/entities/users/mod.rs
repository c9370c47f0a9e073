//! Users Entity Module
//!
//! 사용자 계정과 사용자 측 구매/대여 이력을 정의합니다.

pub mod user;

pub use user::{OwnedBook, RentedBook, User};
