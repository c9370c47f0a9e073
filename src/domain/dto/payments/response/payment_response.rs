use serde::{Deserialize, Serialize};
use crate::domain::entities::payments::{Payment, PaymentKind, PaymentStatus};
use crate::utils::time_utils::to_rfc3339;

/// 결제 세션 생성 응답 (클라이언트는 `url`로 리다이렉트)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: String,
    pub book_id: String,
    pub user_id: String,
    pub amount: f64,
    pub currency: String,
    pub kind: PaymentKind,
    pub status: PaymentStatus,
    pub external_transaction_id: String,
    pub created_at: String,
}

impl From<&Payment> for PaymentResponse {
    fn from(payment: &Payment) -> Self {
        Self {
            id: payment.id.map(|id| id.to_hex()).unwrap_or_default(),
            book_id: payment.book.to_hex(),
            user_id: payment.user.to_hex(),
            amount: payment.amount,
            currency: payment.currency.clone(),
            kind: payment.kind,
            status: payment.status,
            external_transaction_id: payment.external_transaction_id.clone(),
            created_at: to_rfc3339(payment.created_at),
        }
    }
}

/// 결제 확정 응답
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPaymentResponse {
    pub success: bool,
    pub message: String,
    /// 이미 처리된 세션이면 true (이력 추가 없음)
    pub already_processed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentResponse>,
    /// 대여 결제일 때 종료 시각
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rental_end_date: Option<String>,
}

impl ConfirmPaymentResponse {
    pub fn processed(payment: &Payment, rental_end_date: Option<String>) -> Self {
        Self {
            success: true,
            message: "Payment processed successfully".to_string(),
            already_processed: false,
            payment: Some(PaymentResponse::from(payment)),
            rental_end_date,
        }
    }

    pub fn already_processed() -> Self {
        Self {
            success: true,
            message: "Payment already processed".to_string(),
            already_processed: true,
            payment: None,
            rental_end_date: None,
        }
    }
}
