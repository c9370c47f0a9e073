//! 결제 엔티티
//!
//! 호스팅 결제 세션이 `paid`로 확인된 뒤에만 생성됩니다.
//! 처음에는 `pending`으로 기록되고, 도서/사용자 이력 추가가 모두 끝나면
//! `succeeded`로 바뀝니다.
//! `external_transaction_id`는 유니크 인덱스로 보호되어 같은 결제가
//! 두 번 기록되지 않습니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 결제 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
}

/// 결제 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    Purchase,
    Rental,
}

impl PaymentKind {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "purchase" => Ok(PaymentKind::Purchase),
            "rental" => Ok(PaymentKind::Rental),
            _ => Err(format!("Unsupported payment kind: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Purchase => "purchase",
            PaymentKind::Rental => "rental",
        }
    }
}

impl fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 결제 기록
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub book: ObjectId,
    pub user: ObjectId,
    /// 통화 단위 금액 (프로바이더 최소 단위 / 100)
    pub amount: f64,
    pub currency: String,
    pub kind: PaymentKind,
    pub status: PaymentStatus,
    /// 프로바이더 거래 ID (payment intent, 없으면 세션 ID). unique
    pub external_transaction_id: String,
    pub checkout_session_id: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Payment {
    /// 확인된 결제로부터 이력 추가 전(`pending`) 기록을 생성합니다
    pub fn pending(
        book: ObjectId,
        user: ObjectId,
        amount: f64,
        currency: String,
        kind: PaymentKind,
        external_transaction_id: String,
        checkout_session_id: String,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            book,
            user,
            amount,
            currency,
            kind,
            status: PaymentStatus::Pending,
            external_transaction_id,
            checkout_session_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_succeeded(&self) -> bool {
        self.status == PaymentStatus::Succeeded
    }

    pub fn mark_succeeded(&mut self) {
        self.status = PaymentStatus::Succeeded;
        self.updated_at = DateTime::now();
    }
}
