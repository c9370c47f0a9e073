//! 인증 컨텍스트 모델
//!
//! 미들웨어가 만들어 핸들러가 추출하는 인증 사용자와 경로별 인증 요구사항입니다.

pub mod authenticated_user;
pub mod authentication_request;

pub use authenticated_user::{AuthenticatedUser, OptionalUser};
pub use authentication_request::{AuthMode, RequiredRole};
