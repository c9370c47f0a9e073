//! # Authentication HTTP Handlers
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `POST` | `/auth/register` | 회원가입 + 토큰 발급 | 201 Created |
//! | `POST` | `/auth/login` | 사용자명/비밀번호 로그인 | 200 OK |
//! | `GET` | `/auth/me` | 내 정보 (소장/대여 도서 포함) | 200 OK |
//!
//! ```bash
//! curl -X POST http://localhost:8080/api/v1/auth/login \
//!   -H "Content-Type: application/json" \
//!   -d '{"username":"reader_1","password":"password123"}'
//! ```

use actix_web::{web, HttpResponse, get, post};
use validator::Validate;
use crate::core::errors::AppError;
use crate::domain::dto::users::request::{LoginRequest, RegisterRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::auth::AuthService;

/// 회원가입
///
/// 역할을 생략하면 `reader`로 가입되며 `admin`은 요청할 수 없습니다.
#[post("/register")]
pub async fn register(
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = AuthService::instance();
    let response = service.register(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}

/// 로그인
#[post("/login")]
pub async fn login(
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = AuthService::instance();
    let response = service.login(payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// 현재 사용자 정보
#[get("/me")]
pub async fn get_current_user(
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = AuthService::instance();
    let response = service.current_user(&user.user_id).await?;

    Ok(HttpResponse::Ok().json(response))
}
