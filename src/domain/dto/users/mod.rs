//! # User Data Transfer Objects Module
//!
//! 인증(회원가입, 로그인, 내 정보)과 관리자 사용자 관리 API의 요청/응답 구조입니다.
//!
//! ```text
//! users/
//! ├── request/
//! │   ├── auth_request.rs   # RegisterRequest, LoginRequest
//! │   └── user_request.rs   # CreateUserRequest, UpdateUserRequest (관리자)
//! └── response/
//!     └── user_response.rs  # UserResponse, AuthResponse, CurrentUserResponse
//! ```
//!
//! 응답 DTO는 비밀번호 해시를 절대 포함하지 않습니다.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;
