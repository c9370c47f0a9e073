//! # User Management HTTP Handlers
//!
//! 관리자 전용 사용자 관리 엔드포인트입니다. 라우트 스코프에서
//! `AuthMiddleware::required_with_role(Role::Admin)`이 적용됩니다.
//!
//! | 메서드 | 경로 | 설명 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `GET` | `/users` | 사용자 목록 | 200 OK |
//! | `POST` | `/users` | 사용자 생성 (역할 지정) | 201 Created |
//! | `GET` | `/users/{id}` | 사용자 조회 | 200 OK |
//! | `PUT` | `/users/{id}` | 사용자 수정 | 200 OK |
//! | `DELETE` | `/users/{id}` | 사용자 삭제 | 204 No Content |

use actix_web::{web, HttpResponse, get, post, put, delete};
use validator::Validate;
use crate::core::errors::AppError;
use crate::domain::dto::users::request::{CreateUserRequest, UpdateUserRequest};
use crate::services::users::UserService;

#[get("")]
pub async fn list_users() -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    let users = service.list_users().await?;

    Ok(HttpResponse::Ok().json(users))
}

/// 사용자 생성 핸들러
///
/// 회원가입과 달리 `admin` 역할도 부여할 수 있습니다.
#[post("")]
pub async fn create_user(
    payload: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = UserService::instance();
    let response = service.create_user(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(response))
}

#[get("/{user_id}")]
pub async fn get_user(
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    let user = service.get_user_by_id(&user_id).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// 사용자 수정 핸들러
///
/// 변경할 필드만 보냅니다. 비밀번호는 다시 해시되어 저장됩니다.
#[put("/{user_id}")]
pub async fn update_user(
    user_id: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = UserService::instance();
    let user = service.update_user(&user_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(user))
}

#[delete("/{user_id}")]
pub async fn delete_user(
    user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = UserService::instance();
    service.delete_user(&user_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
