//! 미들웨어 모듈
//!
//! ### 인증 미들웨어 (AuthMiddleware)
//! - Bearer 토큰 추출 및 검증
//! - 토큰 주체를 사용자 저장소에서 재조회
//! - 인증 사용자를 request extension에 저장
//! - 선택적/강제 인증 모드, 역할 요구사항 지원
//!
//! ```rust,ignore
//! use actix_web::web;
//! use crate::config::Role;
//! use crate::middlewares::AuthMiddleware;
//!
//! web::scope("/users")
//!     .wrap(AuthMiddleware::required_with_role(Role::Admin))
//!     .route("", web::get().to(list_users));
//! ```

pub mod auth_middleware;
mod auth_inner;

pub use auth_middleware::AuthMiddleware;
