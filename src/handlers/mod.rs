//! # HTTP Request Handlers Module
//!
//! 핸들러는 요청 검증과 서비스 호출만 담당하며, 비즈니스 규칙은 서비스 계층에 있습니다.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리       ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 비즈니스 로직                      ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - 데이터 접근                    ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! 모든 핸들러는 `Result<HttpResponse, AppError>`를 반환하고, 입력 검증은
//! `validator`로 수행합니다.
//!
//! ```rust,ignore
//! #[post("")]
//! pub async fn create_book(
//!     user: AuthenticatedUser,
//!     payload: web::Json<CreateBookRequest>,
//! ) -> Result<HttpResponse, AppError> {
//!     payload.validate()
//!         .map_err(|e| AppError::ValidationError(e.to_string()))?;
//!
//!     let service = BookService::instance();
//!     let book = service.create_book(&user, payload.into_inner()).await?;
//!     Ok(HttpResponse::Created().json(book))
//! }
//! ```
//!
//! - **`auth`**: 회원가입, 로그인, 내 정보
//! - **`users`**: 관리자 사용자 관리
//! - **`books`**: 카탈로그, 내 서재, 콘텐츠 열람, 도서별 댓글
//! - **`comments`**: 댓글 조회/수정/삭제
//! - **`payments`**: 결제 세션 생성, 확정, 내역

pub mod auth;
pub mod users;
pub mod books;
pub mod comments;
pub mod payments;
