//! # Data Transfer Objects (DTO) Module
//!
//! API 경계에서 주고받는 데이터 구조를 정의합니다.
//! 요청 DTO는 `validator`로 형식을 검증하고, 응답 DTO는 엔티티에서 변환되며
//! 비밀번호 해시 같은 내부 필드를 노출하지 않습니다.
//!
//! | 도메인 | 요청 | 응답 |
//! |--------|------|------|
//! | users | `RegisterRequest`, `LoginRequest`, `CreateUserRequest`, `UpdateUserRequest` | `UserResponse`, `AuthResponse`, `CurrentUserResponse` |
//! | books | `CreateBookRequest`, `UpdateBookRequest`, `BookListQuery`, `BookContentQuery` | `BookSummary`, `BookListResponse`, `OwnedBooksResponse`, `BookContentResponse` |
//! | comments | `CreateCommentRequest`, `UpdateCommentRequest` | `CommentResponse`, `BookCommentsResponse` |
//! | payments | `CreateCheckoutRequest`, `ConfirmPaymentRequest` | `CheckoutSessionResponse`, `ConfirmPaymentResponse`, `PaymentResponse` |
//!
//! 모든 시각 필드는 RFC 3339 문자열로 직렬화됩니다.
//!
//! ```rust,ignore
//! #[post("/register")]
//! pub async fn register(payload: web::Json<RegisterRequest>) -> Result<HttpResponse, AppError> {
//!     payload.validate().map_err(|e| AppError::ValidationError(e.to_string()))?;
//!     let response = AuthService::instance().register(payload.into_inner()).await?;
//!     Ok(HttpResponse::Created().json(response))
//! }
//! ```

pub mod users;
pub mod books;
pub mod comments;
pub mod payments;
