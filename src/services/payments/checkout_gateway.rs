//! # 호스팅 결제 게이트웨이
//!
//! 결제 프로바이더의 Checkout 세션 API를 추상화한 트레이트와 구현체입니다.
//!
//! - [`StripeCheckoutGateway`] - form 인코딩 + Basic 인증 HTTPS 호출
//! - [`InMemoryCheckoutGateway`] - 외부 호출 없는 구현 (개발 환경, 테스트)
//!
//! | 동작 | 요청 |
//! |------|------|
//! | 세션 생성 | `POST /v1/checkout/sessions` |
//! | 세션 조회 | `GET /v1/checkout/sessions/{id}` |

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use uuid::Uuid;
use crate::config::{CheckoutConfig, CheckoutProvider};
use crate::core::errors::AppError;
use crate::domain::models::checkout::{CheckoutPaymentStatus, CheckoutSession, NewCheckoutSession};

#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    /// 결제 세션을 만들고 리다이렉트 URL이 담긴 세션을 반환합니다
    async fn create_session(&self, request: NewCheckoutSession) -> Result<CheckoutSession, AppError>;

    /// 세션의 현재 결제 상태를 조회합니다 (없으면 404)
    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, AppError>;
}

/// 설정된 프로바이더에 맞는 게이트웨이를 생성합니다
pub fn gateway_from_env() -> Arc<dyn CheckoutGateway> {
    match CheckoutConfig::provider() {
        CheckoutProvider::Stripe => Arc::new(StripeCheckoutGateway::from_env()),
        CheckoutProvider::Memory => {
            log::warn!("⚠️ CHECKOUT_PROVIDER=memory: 모든 결제가 즉시 완료로 처리됩니다");
            Arc::new(InMemoryCheckoutGateway::auto_paying())
        }
    }
}

/// 세션 생성 요청을 프로바이더 form 파라미터로 변환
fn session_form(request: &NewCheckoutSession) -> Vec<(String, String)> {
    let mut params = vec![
        ("mode".to_string(), "payment".to_string()),
        ("payment_method_types[0]".to_string(), "card".to_string()),
        ("line_items[0][quantity]".to_string(), "1".to_string()),
        ("line_items[0][price_data][currency]".to_string(), request.currency.clone()),
        ("line_items[0][price_data][unit_amount]".to_string(), request.unit_amount.to_string()),
        ("line_items[0][price_data][product_data][name]".to_string(), request.product_name.clone()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];

    for (key, value) in request.metadata.to_pairs() {
        params.push((format!("metadata[{}]", key), value));
    }

    params
}

/// Stripe Checkout API 클라이언트
pub struct StripeCheckoutGateway {
    http_client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl StripeCheckoutGateway {
    pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(CheckoutConfig::api_base(), CheckoutConfig::secret_key())
    }

    async fn parse_session(response: reqwest::Response) -> Result<CheckoutSession, AppError> {
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("결제 세션을 찾을 수 없습니다".to_string()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            log::error!("❌ 결제 프로바이더 오류 ({}): {}", status, error_text);
            return Err(AppError::ExternalServiceError(format!("Checkout provider error: {}", status)));
        }

        response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Failed to parse checkout session: {}", e)))
    }
}

#[async_trait]
impl CheckoutGateway for StripeCheckoutGateway {
    async fn create_session(&self, request: NewCheckoutSession) -> Result<CheckoutSession, AppError> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .form(&session_form(&request))
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Checkout provider unreachable: {}", e)))?;

        Self::parse_session(response).await
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, AppError> {
        let url = format!("{}/v1/checkout/sessions/{}", self.api_base, session_id);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Checkout provider unreachable: {}", e)))?;

        Self::parse_session(response).await
    }
}

/// 메모리 기반 게이트웨이
///
/// ```rust,ignore
/// let gateway = InMemoryCheckoutGateway::new();
/// let session = gateway.create_session(request).await?;
/// gateway.mark_paid(&session.id);
/// assert!(gateway.retrieve_session(&session.id).await?.is_paid());
/// ```
#[derive(Default)]
pub struct InMemoryCheckoutGateway {
    sessions: Mutex<HashMap<String, CheckoutSession>>,
    auto_pay: bool,
}

impl InMemoryCheckoutGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// 생성 즉시 `paid` 상태가 되는 게이트웨이
    pub fn auto_paying() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            auto_pay: true,
        }
    }

    pub fn mark_paid(&self, session_id: &str) -> bool {
        self.set_status(session_id, CheckoutPaymentStatus::Paid)
    }

    pub fn set_status(&self, session_id: &str, status: CheckoutPaymentStatus) -> bool {
        let mut sessions = match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        match sessions.get_mut(session_id) {
            Some(session) => {
                session.payment_status = status;
                if status == CheckoutPaymentStatus::Paid && session.payment_intent.is_none() {
                    session.payment_intent = Some(format!("pi_mem_{}", Uuid::new_v4().simple()));
                }
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl CheckoutGateway for InMemoryCheckoutGateway {
    async fn create_session(&self, request: NewCheckoutSession) -> Result<CheckoutSession, AppError> {
        let id = format!("cs_mem_{}", Uuid::new_v4().simple());
        let session = CheckoutSession {
            id: id.clone(),
            url: Some(request.success_url.replace("{CHECKOUT_SESSION_ID}", &id)),
            payment_status: CheckoutPaymentStatus::Unpaid,
            payment_intent: None,
            amount_total: Some(request.unit_amount),
            currency: Some(request.currency.clone()),
            metadata: request
                .metadata
                .to_pairs()
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        };

        {
            let mut sessions = match self.sessions.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            sessions.insert(id.clone(), session);
        }

        if self.auto_pay {
            self.mark_paid(&id);
        }

        self.retrieve_session(&id).await
    }

    async fn retrieve_session(&self, session_id: &str) -> Result<CheckoutSession, AppError> {
        let sessions = match self.sessions.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("결제 세션을 찾을 수 없습니다".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::payments::PaymentKind;
    use crate::domain::models::checkout::CheckoutMetadata;

    fn request() -> NewCheckoutSession {
        NewCheckoutSession {
            product_name: "Dune (rental)".to_string(),
            unit_amount: 299,
            currency: "usd".to_string(),
            success_url: "http://localhost:3000/payment/success?session_id={CHECKOUT_SESSION_ID}".to_string(),
            cancel_url: "http://localhost:3000/payment/cancel".to_string(),
            metadata: CheckoutMetadata {
                book_id: "65f0c0ffee0000000000000a".to_string(),
                kind: PaymentKind::Rental,
                user_id: "65f0c0ffee0000000000000b".to_string(),
            },
        }
    }

    #[test]
    fn test_session_form_parameters() {
        let params = session_form(&request());
        let lookup = |key: &str| params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());

        assert_eq!(lookup("mode"), Some("payment"));
        assert_eq!(lookup("line_items[0][price_data][unit_amount]"), Some("299"));
        assert_eq!(lookup("line_items[0][price_data][currency]"), Some("usd"));
        assert_eq!(lookup("metadata[kind]"), Some("rental"));
        assert_eq!(lookup("metadata[user_id]"), Some("65f0c0ffee0000000000000b"));
    }

    #[test]
    fn test_stripe_gateway_trims_base_url() {
        let gateway = StripeCheckoutGateway::new("https://api.stripe.com/", "sk_test");
        assert_eq!(gateway.api_base, "https://api.stripe.com");
    }

    #[actix_web::test]
    async fn test_in_memory_session_lifecycle() {
        let gateway = InMemoryCheckoutGateway::new();
        let session = gateway.create_session(request()).await.unwrap();

        assert!(!session.is_paid());
        assert_eq!(session.amount_total, Some(299));
        assert!(session.url.as_deref().unwrap_or_default().contains(&session.id));
        assert_eq!(session.metadata().unwrap().kind, PaymentKind::Rental);

        assert!(gateway.mark_paid(&session.id));
        let paid = gateway.retrieve_session(&session.id).await.unwrap();
        assert!(paid.is_paid());
        assert!(paid.transaction_id().starts_with("pi_mem_"));
    }

    #[actix_web::test]
    async fn test_in_memory_unknown_session() {
        let gateway = InMemoryCheckoutGateway::new();
        let result = gateway.retrieve_session("cs_missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(!gateway.mark_paid("cs_missing"));
    }

    #[actix_web::test]
    async fn test_auto_paying_gateway() {
        let gateway = InMemoryCheckoutGateway::auto_paying();
        let session = gateway.create_session(request()).await.unwrap();
        assert!(session.is_paid());
    }
}
