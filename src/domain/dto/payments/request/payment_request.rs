//! 결제 요청 DTO

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::domain::entities::payments::PaymentKind;

/// 결제 세션 생성 요청
///
/// ```json
/// { "book_id": "65f0c0ffee...", "kind": "rental" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCheckoutRequest {
    #[validate(length(min = 1, message = "book_id는 필수입니다"))]
    pub book_id: String,

    /// `purchase` | `rental`
    #[validate(custom(function = "validate_payment_kind"))]
    pub kind: String,
}

impl CreateCheckoutRequest {
    /// 검증 이후 호출
    pub fn payment_kind(&self) -> Result<PaymentKind, String> {
        PaymentKind::from_str(&self.kind)
    }
}

/// 결제 확정 요청 (결제 성공 리다이렉트의 `session_id`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfirmPaymentRequest {
    #[validate(
        length(min = 1, max = 255, message = "session_id는 필수입니다"),
        custom(function = "validate_session_id")
    )]
    pub session_id: String,
}

/// 프로바이더 세션 ID는 영숫자와 `_`만 허용 (요청 URL 경로에 그대로 들어감)
fn validate_session_id(session_id: &str) -> Result<(), ValidationError> {
    if !session_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ValidationError::new("invalid_session_id")
            .with_message("session_id 형식이 올바르지 않습니다".into()));
    }
    Ok(())
}

fn validate_payment_kind(kind: &str) -> Result<(), ValidationError> {
    if PaymentKind::from_str(kind).is_err() {
        return Err(ValidationError::new("invalid_kind")
            .with_message("kind는 purchase 또는 rental 이어야 합니다".into()));
    }
    Ok(())
}
