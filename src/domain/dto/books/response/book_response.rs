//! 도서 응답 DTO
//!
//! 카탈로그 응답([`BookSummary`])은 구매자/대여자 목록을 노출하지 않습니다.
//! 전체 기록([`BookDetailResponse`])은 관리자 조회와 콘텐츠 엔드포인트에서만 반환됩니다.

use serde::{Deserialize, Serialize};
use crate::domain::entities::books::{Book, Purchaser, Renter};
use crate::domain::models::access::AccessGrant;
use crate::utils::time_utils::to_rfc3339;

/// 카탈로그용 도서 요약
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub title: String,
    pub author_id: String,
    /// 저자 사용자명 (저자 계정이 삭제되었으면 None)
    pub author_username: Option<String>,
    pub description: Option<String>,
    pub published_date: String,
    pub price: f64,
    pub rental_price: f64,
    pub available_for_purchase: bool,
    pub available_for_rental: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl BookSummary {
    pub fn from_book(book: &Book, author_username: Option<String>) -> Self {
        Self {
            id: book.id_string(),
            title: book.title.clone(),
            author_id: book.author.to_hex(),
            author_username,
            description: book.description.clone(),
            published_date: to_rfc3339(book.published_date),
            price: book.price,
            rental_price: book.rental_price,
            available_for_purchase: book.available_for_purchase,
            available_for_rental: book.available_for_rental,
            created_at: to_rfc3339(book.created_at),
            updated_at: to_rfc3339(book.updated_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaserEntry {
    pub user_id: String,
    pub payment_id: String,
    pub purchase_date: String,
}

impl From<&Purchaser> for PurchaserEntry {
    fn from(p: &Purchaser) -> Self {
        Self {
            user_id: p.user_id.to_hex(),
            payment_id: p.payment_id.to_hex(),
            purchase_date: to_rfc3339(p.purchase_date),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenterEntry {
    pub user_id: String,
    pub payment_id: String,
    pub rental_date: String,
    pub rental_end_date: String,
}

impl From<&Renter> for RenterEntry {
    fn from(r: &Renter) -> Self {
        Self {
            user_id: r.user_id.to_hex(),
            payment_id: r.payment_id.to_hex(),
            rental_date: to_rfc3339(r.rental_date),
            rental_end_date: to_rfc3339(r.rental_end_date),
        }
    }
}

/// 구매/대여 이력을 포함한 전체 도서 기록
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookDetailResponse {
    #[serde(flatten)]
    pub summary: BookSummary,
    pub purchasers: Vec<PurchaserEntry>,
    pub renters: Vec<RenterEntry>,
}

impl BookDetailResponse {
    pub fn from_book(book: &Book, author_username: Option<String>) -> Self {
        Self {
            summary: BookSummary::from_book(book, author_username),
            purchasers: book.purchasers.iter().map(PurchaserEntry::from).collect(),
            renters: book.renters.iter().map(RenterEntry::from).collect(),
        }
    }
}

/// 단건 조회 응답 (관리자는 전체 기록, 그 외는 요약)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookView {
    Detail(BookDetailResponse),
    Summary(BookSummary),
}

/// 페이지네이션 목록 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookListResponse {
    pub books: Vec<BookSummary>,
    pub total_books: u64,
    pub current_page: u64,
    pub total_pages: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedBookView {
    pub book: BookSummary,
    pub payment_id: String,
    pub purchase_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentedBookView {
    pub book: BookSummary,
    pub payment_id: String,
    pub rental_date: String,
    pub rental_end_date: String,
    pub active: bool,
}

/// 내 서재 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedBooksResponse {
    pub owned_books: Vec<OwnedBookView>,
    pub rented_books: Vec<RentedBookView>,
}

/// 접근 근거
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessInfo {
    /// `admin` | `purchased` | `rented`
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_end_date: Option<String>,
}

impl From<AccessGrant> for AccessInfo {
    fn from(grant: AccessGrant) -> Self {
        let rental_end_date = match grant {
            AccessGrant::Rented { until } => Some(to_rfc3339(until)),
            _ => None,
        };
        Self {
            kind: grant.as_str().to_string(),
            rental_end_date,
        }
    }
}

/// 콘텐츠 접근 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookContentResponse {
    pub message: String,
    pub access: AccessInfo,
    pub book: BookDetailResponse,
}

impl BookContentResponse {
    pub fn granted(grant: AccessGrant, book: BookDetailResponse) -> Self {
        Self {
            message: "Access granted".to_string(),
            access: AccessInfo::from(grant),
            book,
        }
    }
}
