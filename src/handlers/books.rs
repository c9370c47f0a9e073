//! # Book HTTP Handlers
//!
//! 스코프 전체에 선택적 인증이 적용되며, 인증이 필요한 핸들러는
//! [`AuthenticatedUser`] 추출자로 401을 반환합니다.
//!
//! | 메서드 | 경로 | 인증 | 설명 |
//! |--------|------|------|------|
//! | `GET` | `/books?page=&limit=` | - | 카탈로그 목록 |
//! | `POST` | `/books` | author, admin | 도서 등록 |
//! | `GET` | `/books/owned` | 필수 | 내 서재 (구매/대여) |
//! | `GET` | `/books/author/{author_id}` | - | 저자별 도서 |
//! | `GET` | `/books/{id}` | 선택 | 도서 조회 (관리자는 전체 기록) |
//! | `PUT` | `/books/{id}` | 저자, admin | 도서 수정 |
//! | `DELETE` | `/books/{id}` | 저자, admin | 도서 삭제 |
//! | `GET` | `/books/{id}/content?payment_id=` | 필수 | 콘텐츠 열람 (구매/대여 확인) |
//! | `GET` | `/books/{id}/comments` | - | 도서 댓글 + 평균 평점 |
//! | `POST` | `/books/{id}/comments` | 필수 | 댓글 작성 |

use actix_web::{web, HttpResponse, get, post, put, delete};
use validator::Validate;
use crate::core::errors::AppError;
use crate::domain::dto::books::{BookContentQuery, BookListQuery, CreateBookRequest, UpdateBookRequest};
use crate::domain::dto::comments::CreateCommentRequest;
use crate::domain::models::auth::{AuthenticatedUser, OptionalUser};
use crate::services::books::BookService;
use crate::services::comments::CommentService;

#[get("")]
pub async fn list_books(
    query: web::Query<BookListQuery>,
) -> Result<HttpResponse, AppError> {
    let service = BookService::instance();
    let response = service.list_books(&query).await?;

    Ok(HttpResponse::Ok().json(response))
}

#[post("")]
pub async fn create_book(
    user: AuthenticatedUser,
    payload: web::Json<CreateBookRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = BookService::instance();
    let book = service.create_book(&user, payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(book))
}

/// 내 서재
///
/// `/{book_id}`보다 먼저 등록되어야 합니다.
#[get("/owned")]
pub async fn owned_books(
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = BookService::instance();
    let response = service.owned_books(&user).await?;

    Ok(HttpResponse::Ok().json(response))
}

#[get("/author/{author_id}")]
pub async fn books_by_author(
    author_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = BookService::instance();
    let books = service.books_by_author(&author_id).await?;

    Ok(HttpResponse::Ok().json(books))
}

#[get("/{book_id}")]
pub async fn get_book(
    book_id: web::Path<String>,
    viewer: OptionalUser,
) -> Result<HttpResponse, AppError> {
    let service = BookService::instance();
    let book = service.get_book(&book_id, viewer.0.as_ref()).await?;

    Ok(HttpResponse::Ok().json(book))
}

#[put("/{book_id}")]
pub async fn update_book(
    user: AuthenticatedUser,
    book_id: web::Path<String>,
    payload: web::Json<UpdateBookRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = BookService::instance();
    let book = service.update_book(&user, &book_id, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(book))
}

#[delete("/{book_id}")]
pub async fn delete_book(
    user: AuthenticatedUser,
    book_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = BookService::instance();
    service.delete_book(&user, &book_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// 도서 콘텐츠 열람
///
/// 관리자, 구매자, 대여 기간 내의 대여자만 접근할 수 있습니다.
/// 대여 기간이 끝난 경우에도 403이지만 메시지로 구분됩니다.
#[get("/{book_id}/content")]
pub async fn get_book_content(
    user: AuthenticatedUser,
    book_id: web::Path<String>,
    query: web::Query<BookContentQuery>,
) -> Result<HttpResponse, AppError> {
    let service = BookService::instance();
    let response = service.get_book_content(&user, &book_id, &query).await?;

    Ok(HttpResponse::Ok().json(response))
}

#[get("/{book_id}/comments")]
pub async fn get_book_comments(
    book_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let service = CommentService::instance();
    let response = service.comments_for_book(&book_id).await?;

    Ok(HttpResponse::Ok().json(response))
}

#[post("/{book_id}/comments")]
pub async fn create_book_comment(
    user: AuthenticatedUser,
    book_id: web::Path<String>,
    payload: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = CommentService::instance();
    let comment = service.create_comment(&user, &book_id, payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(comment))
}
