//! # 사용자 관련 요청 DTO 모듈
//!
//! 클라이언트 JSON을 구조화된 타입으로 받고 `validator`로 형식 규칙을 검사합니다.
//! 중복 여부, 역할 권한 같은 비즈니스 검증은 서비스 계층에서 처리합니다.
//!
//! 검증 실패는 핸들러에서 `AppError::ValidationError`(400)로 변환됩니다.

pub mod auth_request;
pub mod user_request;

pub use auth_request::{LoginRequest, RegisterRequest};
pub use user_request::{CreateUserRequest, UpdateUserRequest};
