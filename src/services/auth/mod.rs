//! 인증 관련 서비스
//!
//! - [`token_service`] - JWT 발급/검증
//! - [`auth_service`] - 회원가입, 로그인, 내 정보
//! - [`password`] - bcrypt 해싱

pub mod token_service;
pub mod auth_service;
pub mod password;

pub use token_service::TokenService;
pub use auth_service::AuthService;
pub use password::{hash_password, verify_password};
