//! 호스팅 결제(Checkout) 세션 모델
//!
//! 결제 프로바이더와 주고받는 세션 정보입니다. 프로바이더 응답 JSON을 그대로
//! 역직렬화할 수 있도록 필드명은 프로바이더 표기를 따릅니다.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::core::errors::AppError;
use crate::domain::entities::payments::PaymentKind;

/// 세션 메타데이터 (`book_id`, `kind`, `user_id`)
///
/// 결제 확정 시 어떤 도서를 누가 어떤 방식으로 결제했는지 복원하는 데 쓰입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutMetadata {
    pub book_id: String,
    pub kind: PaymentKind,
    pub user_id: String,
}

impl CheckoutMetadata {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("book_id", self.book_id.clone()),
            ("kind", self.kind.as_str().to_string()),
            ("user_id", self.user_id.clone()),
        ]
    }

    pub fn from_map(metadata: &HashMap<String, String>) -> Result<Self, AppError> {
        let field = |key: &str| {
            metadata
                .get(key)
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .ok_or_else(|| AppError::ValidationError(format!("Checkout session metadata is missing '{}'", key)))
        };

        let kind = PaymentKind::from_str(&field("kind")?).map_err(AppError::ValidationError)?;

        Ok(Self {
            book_id: field("book_id")?,
            kind,
            user_id: field("user_id")?,
        })
    }
}

/// 세션 생성 요청
#[derive(Debug, Clone)]
pub struct NewCheckoutSession {
    /// 결제 페이지에 표시될 상품명
    pub product_name: String,
    /// 최소 통화 단위 금액 (USD 센트)
    pub unit_amount: i64,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: CheckoutMetadata,
}

/// 세션 결제 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutPaymentStatus {
    Paid,
    Unpaid,
    NoPaymentRequired,
    #[serde(other)]
    Unknown,
}

/// 프로바이더가 돌려주는 세션
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    pub payment_status: CheckoutPaymentStatus,
    #[serde(default)]
    pub payment_intent: Option<String>,
    /// 최소 통화 단위 합계
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == CheckoutPaymentStatus::Paid
    }

    /// 멱등성 키로 쓰이는 거래 ID (payment intent가 없으면 세션 ID)
    pub fn transaction_id(&self) -> &str {
        self.payment_intent
            .as_deref()
            .filter(|id| !id.is_empty())
            .unwrap_or(&self.id)
    }

    pub fn metadata(&self) -> Result<CheckoutMetadata, AppError> {
        CheckoutMetadata::from_map(&self.metadata)
    }
}
