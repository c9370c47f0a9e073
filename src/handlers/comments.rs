//! # Comment HTTP Handlers
//!
//! 도서별 댓글 작성/목록은 [`books`](super::books) 핸들러에 있습니다.
//!
//! | 메서드 | 경로 | 인증 |
//! |--------|------|------|
//! | `GET` | `/comments` | - |
//! | `GET` | `/comments/author/{author_id}` | - |
//! | `GET` | `/comments/{id}` | - |
//! | `PUT` | `/comments/{id}` | 작성자, admin |
//! | `DELETE` | `/comments/{id}` | 작성자, admin |

use actix_web::{web, HttpResponse, get, put, delete};
use validator::Validate;
use crate::core::errors::AppError;
use crate::domain::dto::comments::UpdateCommentRequest;
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::comments::CommentService;

#[get("")]
pub async fn list_comments() -> Result<HttpResponse, AppError> {
    let service = CommentService::instance();
    let comments = service.list_comments().await?;

    Ok(HttpResponse::Ok().json(comments))
}

#[get("/author/{author_id}")]
pub async fn comments_by_author(
    author_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = CommentService::instance();
    let comments = service.comments_by_author(&author_id).await?;

    Ok(HttpResponse::Ok().json(comments))
}

#[get("/{comment_id}")]
pub async fn get_comment(
    comment_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = CommentService::instance();
    let comment = service.get_comment(&comment_id).await?;

    Ok(HttpResponse::Ok().json(comment))
}

#[put("/{comment_id}")]
pub async fn update_comment(
    user: AuthenticatedUser,
    comment_id: web::Path<String>,
    payload: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = CommentService::instance();
    let comment = service.update_comment(&user, &comment_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(comment))
}

#[delete("/{comment_id}")]
pub async fn delete_comment(
    user: AuthenticatedUser,
    comment_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = CommentService::instance();
    service.delete_comment(&user, &comment_id).await?;

    Ok(HttpResponse::NoContent().finish())
}
