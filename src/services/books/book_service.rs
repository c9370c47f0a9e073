//! # 도서 서비스
//!
//! 카탈로그 관리와 콘텐츠 접근을 담당합니다.
//!
//! - 등록: `author` 또는 `admin`, 호출자가 저자가 됨
//! - 수정/삭제: 관리자 또는 저자 본인
//! - 콘텐츠: [`evaluate_access`]로 판정 후 전체 기록 반환
//!
//! 카탈로그 응답에는 구매자/대여자 목록이 포함되지 않습니다.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use singleton_macro::service;
use crate::{
    config::Role,
    domain::{
        entities::books::Book,
        entities::payments::PaymentStatus,
        dto::books::{
            BookContentQuery, BookContentResponse, BookDetailResponse, BookListQuery, BookListResponse,
            BookSummary, BookView, CreateBookRequest, OwnedBookView, OwnedBooksResponse, RentedBookView,
            UpdateBookRequest,
        },
        models::access::evaluate_access,
        models::auth::AuthenticatedUser,
    },
    repositories::{
        books::BookRepository,
        comments::CommentRepository,
        parse_object_id,
        payments::PaymentRepository,
        users::UserRepository,
    },
    utils::{string_utils::validate_required_string, time_utils::{from_chrono, to_rfc3339}},
    core::errors::AppError,
};

#[service(name = "book")]
pub struct BookService {
    book_repo: Arc<BookRepository>,
    user_repo: Arc<UserRepository>,
    comment_repo: Arc<CommentRepository>,
    payment_repo: Arc<PaymentRepository>,
}

impl BookService {
    pub async fn create_book(&self, user: &AuthenticatedUser, request: CreateBookRequest) -> Result<BookSummary, AppError> {
        if !user.has_any_role(&[Role::Author, Role::Admin]) {
            return Err(AppError::AuthorizationError("Only authors can publish books".to_string()));
        }

        let book = new_book(request, user.object_id()?)?;
        let created = self.book_repo.create(book).await?;

        log::info!("📚 도서 등록: {} by {}", created.title, user.username);

        Ok(BookSummary::from_book(&created, Some(user.username.clone())))
    }

    pub async fn list_books(&self, query: &BookListQuery) -> Result<BookListResponse, AppError> {
        let page = query.resolve();

        let total_books = self.book_repo.count().await?;
        let books = self.book_repo.find_page(page.skip(), page.limit).await?;
        let books = self.summarize(&books).await?;

        Ok(BookListResponse {
            books,
            total_books,
            current_page: page.page,
            total_pages: page.total_pages(total_books),
        })
    }

    pub async fn get_book(&self, id: &str, viewer: Option<&AuthenticatedUser>) -> Result<BookView, AppError> {
        let book = self.find_book(id).await?;
        let author_username = self.author_username(&book.author).await?;

        if viewer.is_some_and(AuthenticatedUser::is_admin) {
            Ok(BookView::Detail(BookDetailResponse::from_book(&book, author_username)))
        } else {
            Ok(BookView::Summary(BookSummary::from_book(&book, author_username)))
        }
    }

    pub async fn update_book(&self, user: &AuthenticatedUser, id: &str, request: UpdateBookRequest) -> Result<BookSummary, AppError> {
        let book = self.find_book(id).await?;
        ensure_manager(&book, user)?;

        let update_doc = build_book_update(&request)?;
        let updated = self.book_repo
            .update(id, update_doc)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let author_username = self.author_username(&updated.author).await?;
        Ok(BookSummary::from_book(&updated, author_username))
    }

    pub async fn delete_book(&self, user: &AuthenticatedUser, id: &str) -> Result<(), AppError> {
        let book = self.find_book(id).await?;
        ensure_manager(&book, user)?;

        if !self.book_repo.delete(id).await? {
            return Err(AppError::NotFound("Book not found".to_string()));
        }

        if let Some(book_id) = book.id {
            let removed = self.comment_repo.delete_by_book(&book_id).await?;
            log::info!("🗑️ 도서 삭제: {} (댓글 {}건 정리)", book.title, removed);
        }

        Ok(())
    }

    pub async fn books_by_author(&self, author_id: &str) -> Result<Vec<BookSummary>, AppError> {
        let author = parse_object_id(author_id)?;
        let books = self.book_repo.find_by_author(&author).await?;

        if books.is_empty() {
            return Err(AppError::NotFound("No books found for this author".to_string()));
        }

        self.summarize(&books).await
    }

    /// 현재 사용자의 구매/대여 도서 (카탈로그 정보와 결합)
    pub async fn owned_books(&self, user: &AuthenticatedUser) -> Result<OwnedBooksResponse, AppError> {
        let owner = self.user_repo
            .find_by_id(&user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        if owner.owned_books.is_empty() && owner.rented_books.is_empty() {
            return Err(AppError::NotFound("You have not purchased or rented any books".to_string()));
        }

        let ids: Vec<ObjectId> = owner
            .owned_books
            .iter()
            .map(|o| o.book_id)
            .chain(owner.rented_books.iter().map(|r| r.book_id))
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let books = self.book_repo.find_by_ids(&ids).await?;
        let summaries: HashMap<ObjectId, BookSummary> = books
            .iter()
            .zip(self.summarize(&books).await?)
            .filter_map(|(book, summary)| book.id.map(|id| (id, summary)))
            .collect();

        let now = DateTime::now();

        // 삭제된 도서는 목록에서 제외
        let owned_books = owner
            .owned_books
            .iter()
            .filter_map(|owned| {
                summaries.get(&owned.book_id).map(|book| OwnedBookView {
                    book: book.clone(),
                    payment_id: owned.payment_id.to_hex(),
                    purchase_date: to_rfc3339(owned.purchase_date),
                })
            })
            .collect();

        let rented_books = owner
            .rented_books
            .iter()
            .filter_map(|rental| {
                summaries.get(&rental.book_id).map(|book| RentedBookView {
                    book: book.clone(),
                    payment_id: rental.payment_id.to_hex(),
                    rental_date: to_rfc3339(rental.rental_date),
                    rental_end_date: to_rfc3339(rental.rental_end_date),
                    active: now <= rental.rental_end_date,
                })
            })
            .collect();

        Ok(OwnedBooksResponse { owned_books, rented_books })
    }

    /// 도서 콘텐츠 접근
    ///
    /// `payment_id`가 주어지면 해당 결제가 호출자의 것이고, 같은 도서에 대한
    /// 성공한 결제인지 먼저 확인한 뒤 그 결제로 생긴 기록만으로 판정합니다.
    pub async fn get_book_content(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        query: &BookContentQuery,
    ) -> Result<BookContentResponse, AppError> {
        let book = self.find_book(id).await?;
        let user_id = user.object_id()?;

        let payment_filter = match query.payment_id.as_deref() {
            Some(payment_id) => Some(self.verify_payment_reference(&user_id, &book, payment_id).await?),
            None => None,
        };

        let grant = evaluate_access(&user_id, &user.roles, &book, payment_filter.as_ref(), DateTime::now())
            .into_result()
            .inspect_err(|e| log::info!("🚫 콘텐츠 접근 거부: {} → {} ({})", user.username, book.title, e))?;

        let author_username = self.author_username(&book.author).await?;
        Ok(BookContentResponse::granted(grant, BookDetailResponse::from_book(&book, author_username)))
    }

    async fn verify_payment_reference(&self, user_id: &ObjectId, book: &Book, payment_id: &str) -> Result<ObjectId, AppError> {
        let payment = self.payment_repo
            .find_by_id(payment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if payment.user != *user_id {
            return Err(AppError::AuthorizationError("Payment belongs to another user".to_string()));
        }
        if Some(payment.book) != book.id {
            return Err(AppError::ValidationError("Payment does not match this book".to_string()));
        }
        if payment.status != PaymentStatus::Succeeded {
            return Err(AppError::ValidationError("Payment has not succeeded".to_string()));
        }

        payment.id.ok_or_else(|| AppError::InternalError("결제 ID가 없습니다".to_string()))
    }

    async fn find_book(&self, id: &str) -> Result<Book, AppError> {
        self.book_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    async fn author_username(&self, author: &ObjectId) -> Result<Option<String>, AppError> {
        let names = self.user_repo.find_usernames(std::slice::from_ref(author)).await?;
        Ok(names.get(author).cloned())
    }

    /// 저자명을 한 번에 조회해 요약으로 변환 (입력 순서 유지)
    async fn summarize(&self, books: &[Book]) -> Result<Vec<BookSummary>, AppError> {
        let author_ids: Vec<ObjectId> = books
            .iter()
            .map(|b| b.author)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let names = self.user_repo.find_usernames(&author_ids).await?;

        Ok(books
            .iter()
            .map(|book| BookSummary::from_book(book, names.get(&book.author).cloned()))
            .collect())
    }
}

fn ensure_manager(book: &Book, user: &AuthenticatedUser) -> Result<(), AppError> {
    if book.is_managed_by(&user.object_id()?, user.is_admin()) {
        Ok(())
    } else {
        Err(AppError::AuthorizationError("Only the author or an admin can modify this book".to_string()))
    }
}

pub(crate) fn new_book(request: CreateBookRequest, author: ObjectId) -> Result<Book, AppError> {
    let now = DateTime::now();
    Ok(Book {
        id: None,
        title: validate_required_string(&request.title, "title")?,
        author,
        description: request.description,
        published_date: request.published_date.map(from_chrono).unwrap_or(now),
        price: request.price,
        rental_price: request.rental_price,
        available_for_purchase: request.available_for_purchase,
        available_for_rental: request.available_for_rental,
        purchasers: Vec::new(),
        renters: Vec::new(),
        created_at: now,
        updated_at: now,
    })
}

/// 카탈로그 필드만 담은 `$set` 문서 (저자와 이력은 변경 불가)
pub(crate) fn build_book_update(request: &UpdateBookRequest) -> Result<Document, AppError> {
    let mut update = doc! { "updated_at": DateTime::now() };

    if let Some(title) = &request.title {
        update.insert("title", validate_required_string(title, "title")?);
    }
    if let Some(description) = &request.description {
        let trimmed = description.trim();
        if trimmed.is_empty() {
            update.insert("description", mongodb::bson::Bson::Null);
        } else {
            update.insert("description", trimmed);
        }
    }
    if let Some(published_date) = request.published_date {
        update.insert("published_date", from_chrono(published_date));
    }
    if let Some(price) = request.price {
        update.insert("price", price);
    }
    if let Some(rental_price) = request.rental_price {
        update.insert("rental_price", rental_price);
    }
    if let Some(available) = request.available_for_purchase {
        update.insert("available_for_purchase", available);
    }
    if let Some(available) = request.available_for_rental {
        update.insert("available_for_rental", available);
    }

    Ok(update)
}
