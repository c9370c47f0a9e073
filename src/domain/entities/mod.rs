//! # Domain Entities Module
//!
//! MongoDB 컬렉션과 1:1로 매핑되는 영속성 엔티티들을 정의합니다.
//!
//! ## 컬렉션 구성
//!
//! ```text
//! entities/
//! ├── users/      ← users     (계정, 역할, 소장/대여 이력)
//! ├── books/      ← books     (카탈로그, 구매자/대여자 이력)
//! ├── comments/   ← comments  (평점과 리뷰)
//! └── payments/   ← payments  (확정된 결제 기록)
//! ```
//!
//! ## 공통 규칙
//!
//! - `_id`는 `Option<ObjectId>`이며 삽입 전에는 `None`입니다
//! - 타임스탬프는 `bson::DateTime` (밀리초 UTC)
//! - 이력 배열은 `#[serde(default)]`로 누락 시 빈 배열이 됩니다
//! - 구매/대여 이력은 도서와 사용자 양쪽에 기록되며 결제 확정 시에만 추가됩니다
//!
//! ```rust,ignore
//! use crate::domain::entities::books::Book;
//!
//! #[repository(name = "book", collection = "books")]
//! pub struct BookRepository {
//!     db: Arc<Database>,
//!     redis: Arc<RedisClient>,
//! }
//!
//! impl BookRepository {
//!     pub async fn find_by_id(&self, id: &str) -> Result<Option<Book>, AppError> {
//!         self.collection::<Book>().find_one(doc! { "_id": oid }).await
//!             .map_err(|e| AppError::DatabaseError(e.to_string()))
//!     }
//! }
//! ```

pub mod users;
pub mod books;
pub mod comments;
pub mod payments;

pub use users::*;
pub use books::*;
pub use comments::*;
pub use payments::*;
