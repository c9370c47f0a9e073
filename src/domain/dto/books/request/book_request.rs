//! 도서 요청 DTO

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::config::PaginationConfig;

/// 도서 등록 요청 (author 또는 admin)
///
/// ```json
/// {
///   "title": "Dune",
///   "description": "Arrakis",
///   "published_date": "1965-08-01T00:00:00Z",
///   "price": 19.99,
///   "rental_price": 2.99
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookRequest {
    #[validate(length(min = 1, max = 200, message = "제목은 1-200자 사이여야 합니다"))]
    pub title: String,

    #[serde(default, deserialize_with = "crate::utils::string_utils::deserialize_optional_string")]
    pub description: Option<String>,

    /// 없으면 등록 시각
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,

    #[validate(range(min = 0.0, message = "가격은 0 이상이어야 합니다"))]
    pub price: f64,

    #[validate(range(min = 0.0, message = "대여 가격은 0 이상이어야 합니다"))]
    pub rental_price: f64,

    #[serde(default = "default_true")]
    pub available_for_purchase: bool,

    #[serde(default = "default_true")]
    pub available_for_rental: bool,
}

fn default_true() -> bool {
    true
}

/// 도서 수정 요청 (카탈로그 필드만)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_has_changes"))]
pub struct UpdateBookRequest {
    #[validate(length(min = 1, max = 200, message = "제목은 1-200자 사이여야 합니다"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub published_date: Option<DateTime<Utc>>,

    #[validate(range(min = 0.0, message = "가격은 0 이상이어야 합니다"))]
    pub price: Option<f64>,

    #[validate(range(min = 0.0, message = "대여 가격은 0 이상이어야 합니다"))]
    pub rental_price: Option<f64>,

    pub available_for_purchase: Option<bool>,

    pub available_for_rental: Option<bool>,
}

fn validate_has_changes(req: &UpdateBookRequest) -> Result<(), ValidationError> {
    let has_changes = req.title.is_some()
        || req.description.is_some()
        || req.published_date.is_some()
        || req.price.is_some()
        || req.rental_price.is_some()
        || req.available_for_purchase.is_some()
        || req.available_for_rental.is_some();

    if !has_changes {
        return Err(ValidationError::new("empty_update")
            .with_message("수정할 필드가 하나 이상 필요합니다".into()));
    }
    Ok(())
}

/// 목록 조회 쿼리 (`?page=2&limit=10`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// 보정된 페이지 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// 매우 큰 페이지 번호는 오버플로 없이 `i64::MAX`에서 멈춥니다
    pub fn skip(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(i64::MAX as u64)
    }

    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

impl BookListQuery {
    /// 페이지는 1 이상, 크기는 1 이상 최대값 이하로 보정합니다
    pub fn resolve(&self) -> PageRequest {
        let max_limit = PaginationConfig::max_limit();
        let page = self.page.filter(|p| *p > 0).unwrap_or(1);
        let limit = self
            .limit
            .filter(|l| *l > 0)
            .unwrap_or_else(PaginationConfig::default_limit)
            .min(max_limit);

        PageRequest { page, limit }
    }
}

/// 콘텐츠 조회 쿼리 (`?payment_id=...`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookContentQuery {
    #[serde(default, deserialize_with = "crate::utils::string_utils::deserialize_optional_string")]
    pub payment_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_book_defaults() {
        let req: CreateBookRequest = serde_json::from_str(
            r#"{"title":"Dune","price":19.99,"rental_price":2.99,"description":"   "}"#,
        )
        .unwrap();

        assert!(req.validate().is_ok());
        assert!(req.available_for_purchase);
        assert!(req.available_for_rental);
        assert!(req.description.is_none());
        assert!(req.published_date.is_none());
    }

    #[test]
    fn test_create_book_rejects_negative_price_and_empty_title() {
        let req: CreateBookRequest =
            serde_json::from_str(r#"{"title":"","price":-1.0,"rental_price":1.0}"#).unwrap();
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn test_update_book_requires_a_field() {
        assert!(UpdateBookRequest::default().validate().is_err());
        let req = UpdateBookRequest { available_for_rental: Some(false), ..Default::default() };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_page_resolution() {
        if std::env::var("PAGINATION_DEFAULT_LIMIT").is_err() && std::env::var("PAGINATION_MAX_LIMIT").is_err() {
            assert_eq!(BookListQuery::default().resolve(), PageRequest { page: 1, limit: 5 });

            let query = BookListQuery { page: Some(0), limit: Some(500) };
            assert_eq!(query.resolve(), PageRequest { page: 1, limit: 50 });

            let query = BookListQuery { page: Some(3), limit: Some(10) };
            let page = query.resolve();
            assert_eq!(page.skip(), 20);
        }
    }

    #[test]
    fn test_skip_saturates_on_huge_page() {
        let page = PageRequest { page: u64::MAX, limit: 50 };
        assert_eq!(page.skip(), i64::MAX as u64);

        let query = BookListQuery { page: Some(u64::MAX), limit: Some(50) };
        assert!(query.resolve().skip() <= i64::MAX as u64);
    }

    #[test]
    fn test_total_pages() {
        let page = PageRequest { page: 1, limit: 5 };
        assert_eq!(page.total_pages(0), 0);
        assert_eq!(page.total_pages(5), 1);
        assert_eq!(page.total_pages(6), 2);
    }
}
