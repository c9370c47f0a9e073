//! 도서 엔티티
//!
//! 도서 문서는 카탈로그 정보와 함께 구매자/대여자 이력을 내장합니다.
//! 콘텐츠 접근 판정은 이 이력만을 근거로 합니다
//! ([`crate::domain::models::access`] 참조).

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 도서 엔티티
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    /// 저자 사용자 ID
    pub author: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub published_date: DateTime,
    /// 판매가 (통화 단위, 0 이상)
    pub price: f64,
    /// 대여가 (통화 단위, 0 이상)
    pub rental_price: f64,
    pub available_for_purchase: bool,
    pub available_for_rental: bool,
    #[serde(default)]
    pub purchasers: Vec<Purchaser>,
    #[serde(default)]
    pub renters: Vec<Renter>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// 도서 측 구매 기록
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Purchaser {
    pub user_id: ObjectId,
    pub payment_id: ObjectId,
    pub purchase_date: DateTime,
}

/// 도서 측 대여 기록
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Renter {
    pub user_id: ObjectId,
    pub payment_id: ObjectId,
    pub rental_date: DateTime,
    pub rental_end_date: DateTime,
}

impl Renter {
    /// 대여 종료 시각까지(포함) 유효
    pub fn is_active_at(&self, now: DateTime) -> bool {
        now <= self.rental_end_date
    }
}

impl Book {
    pub fn id_string(&self) -> String {
        self.id.map(|id| id.to_hex()).unwrap_or_default()
    }

    /// 관리자 또는 저자 본인만 수정/삭제할 수 있습니다
    pub fn is_managed_by(&self, user_id: &ObjectId, is_admin: bool) -> bool {
        is_admin || self.author == *user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_book(author: ObjectId) -> Book {
        let now = DateTime::now();
        Book {
            id: Some(ObjectId::new()),
            title: "Rust in Action".to_string(),
            author,
            description: None,
            published_date: now,
            price: 29.99,
            rental_price: 4.99,
            available_for_purchase: true,
            available_for_rental: true,
            purchasers: Vec::new(),
            renters: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_renter_active_boundary() {
        let renter = Renter {
            user_id: ObjectId::new(),
            payment_id: ObjectId::new(),
            rental_date: DateTime::from_millis(0),
            rental_end_date: DateTime::from_millis(1_000),
        };

        assert!(renter.is_active_at(DateTime::from_millis(999)));
        assert!(renter.is_active_at(DateTime::from_millis(1_000)));
        assert!(!renter.is_active_at(DateTime::from_millis(1_001)));
    }

    #[test]
    fn test_is_managed_by() {
        let author = ObjectId::new();
        let stranger = ObjectId::new();
        let book = sample_book(author);

        assert!(book.is_managed_by(&author, false));
        assert!(book.is_managed_by(&stranger, true));
        assert!(!book.is_managed_by(&stranger, false));
    }

    #[test]
    fn test_missing_history_arrays_deserialize_as_empty() {
        let author = ObjectId::new();
        let now = DateTime::now();
        let doc = mongodb::bson::doc! {
            "title": "Legacy",
            "author": author,
            "published_date": now,
            "price": 10.0,
            "rental_price": 1.0,
            "available_for_purchase": true,
            "available_for_rental": false,
            "created_at": now,
            "updated_at": now,
        };

        let book: Book = mongodb::bson::from_document(doc).unwrap();
        assert!(book.purchasers.is_empty());
        assert!(book.renters.is_empty());
        assert!(book.description.is_none());
    }
}
