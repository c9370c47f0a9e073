//! # Payment HTTP Handlers
//!
//! 스코프 전체에 필수 인증이 적용됩니다.
//!
//! ```text
//! POST /payments/checkout  { "book_id": "...", "kind": "purchase" | "rental" }
//!   → { "session_id": "cs_...", "url": "https://checkout..." }
//!
//! POST /payments/confirm   { "session_id": "cs_..." }
//!   → { "success": true, "message": "...", "already_processed": false, "payment": {...} }
//!
//! GET  /payments/history
//! ```

use actix_web::{web, HttpResponse, get, post};
use validator::Validate;
use crate::core::errors::AppError;
use crate::domain::dto::payments::{ConfirmPaymentRequest, CreateCheckoutRequest};
use crate::domain::models::auth::AuthenticatedUser;
use crate::services::payments::PaymentService;

#[post("/checkout")]
pub async fn create_checkout_session(
    user: AuthenticatedUser,
    payload: web::Json<CreateCheckoutRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = PaymentService::instance();
    let session = service.create_checkout_session(&user, payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(session))
}

/// 결제 확정
///
/// 프로바이더 결제 완료 후 클라이언트가 세션 ID로 호출합니다.
/// 같은 세션을 다시 확정해도 이력은 한 번만 추가됩니다.
#[post("/confirm")]
pub async fn confirm_payment(
    user: AuthenticatedUser,
    payload: web::Json<ConfirmPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let service = PaymentService::instance();
    let response = service.confirm_payment(&user, payload.into_inner()).await?;

    Ok(HttpResponse::Ok().json(response))
}

#[get("/history")]
pub async fn payment_history(
    user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = PaymentService::instance();
    let payments = service.payment_history(&user).await?;

    Ok(HttpResponse::Ok().json(payments))
}
