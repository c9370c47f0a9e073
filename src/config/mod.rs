//! 애플리케이션 설정 모듈
//!
//! 모든 설정은 환경변수 기반의 정적 접근자 구조체로 제공됩니다.
//! `.env.dev` / `.env.prod` 파일은 `main`에서 `PROFILE`에 따라 로드됩니다.
//!
//! - [`auth_config`] - JWT, 사용자 역할
//! - [`data_config`] - 실행 환경, bcrypt, 서버, 캐시
//! - [`library_config`] - 대여 기간, 페이지네이션, 결제 프로바이더

pub mod data_config;
pub mod auth_config;
pub mod library_config;

pub use data_config::*;
pub use auth_config::*;
pub use library_config::*;
