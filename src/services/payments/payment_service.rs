//! # 결제 서비스
//!
//! 호스팅 결제 흐름을 담당합니다.
//!
//! ```text
//! 1. POST /payments/checkout  → 세션 생성, 클라이언트는 url로 리다이렉트
//! 2. (프로바이더 결제 페이지)
//! 3. POST /payments/confirm   → 세션 조회, paid 확인 후 결제 기록 + 이력 추가
//! ```
//!
//! 같은 거래 ID로 두 번 확정하면 두 번째 호출은 이력을 추가하지 않고
//! `already_processed`를 반환합니다.
//!
//! 결제는 `pending`으로 먼저 기록되고, 이력 추가가 모두 끝난 뒤에 `succeeded`가
//! 됩니다. 중간에 실패한 확정은 다음 요청이 같은 결제 ID로 이어서 마무리합니다.
//!
//! 결제 게이트웨이를 트레이트 객체로 보관하므로 `#[service]` 매크로 대신
//! 수동 싱글톤 + `inventory` 등록을 사용합니다.

use std::sync::Arc;
use mongodb::bson::{oid::ObjectId, DateTime};
use once_cell::sync::OnceCell;
use crate::{
    config::{CheckoutConfig, RentalConfig},
    core::{errors::AppError, registry::ServiceLocator},
    domain::{
        entities::books::{Book, Purchaser, Renter},
        entities::payments::{Payment, PaymentKind},
        entities::users::{OwnedBook, RentedBook},
        dto::payments::{
            CheckoutSessionResponse, ConfirmPaymentRequest, ConfirmPaymentResponse, CreateCheckoutRequest,
            PaymentResponse,
        },
        models::auth::AuthenticatedUser,
        models::checkout::{CheckoutMetadata, CheckoutSession, NewCheckoutSession},
    },
    repositories::{books::BookRepository, parse_object_id, payments::PaymentRepository, users::UserRepository},
    services::payments::checkout_gateway::{gateway_from_env, CheckoutGateway},
    services::payments::payment_ledger::{MongoPaymentLedger, PaymentLedger},
    utils::time_utils::{add_duration, to_rfc3339},
};

static PAYMENT_SERVICE_INSTANCE: OnceCell<Arc<PaymentService>> = OnceCell::new();

pub struct PaymentService {
    payment_repo: Arc<PaymentRepository>,
    book_repo: Arc<BookRepository>,
    ledger: Arc<dyn PaymentLedger>,
    gateway: Arc<dyn CheckoutGateway>,
}

/// 확인된 세션에서 도출한 기록 계획
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConfirmationPlan {
    pub book_id: ObjectId,
    pub user_id: ObjectId,
    pub kind: PaymentKind,
    pub amount: f64,
    pub currency: String,
    pub external_transaction_id: String,
    pub session_id: String,
}

/// 도서/사용자 양쪽에 추가될 이력 쌍
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HistoryEntries {
    Purchase { purchaser: Purchaser, owned: OwnedBook },
    Rental { renter: Renter, rented: RentedBook },
}

impl PaymentService {
    pub fn instance() -> Arc<Self> {
        PAYMENT_SERVICE_INSTANCE
            .get_or_init(|| {
                Arc::new(Self::with_gateway(
                    ServiceLocator::get::<PaymentRepository>(),
                    ServiceLocator::get::<BookRepository>(),
                    ServiceLocator::get::<UserRepository>(),
                    gateway_from_env(),
                ))
            })
            .clone()
    }

    pub fn with_gateway(
        payment_repo: Arc<PaymentRepository>,
        book_repo: Arc<BookRepository>,
        user_repo: Arc<UserRepository>,
        gateway: Arc<dyn CheckoutGateway>,
    ) -> Self {
        let ledger = Arc::new(MongoPaymentLedger::new(payment_repo.clone(), book_repo.clone(), user_repo));
        Self { payment_repo, book_repo, ledger, gateway }
    }

    /// 결제 세션 생성
    pub async fn create_checkout_session(
        &self,
        user: &AuthenticatedUser,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSessionResponse, AppError> {
        let kind = request.payment_kind().map_err(AppError::ValidationError)?;
        let book = self.book_repo
            .find_by_id(&request.book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;

        let unit_price = ensure_available(&book, kind)?;
        let new_session = NewCheckoutSession {
            product_name: format!("{} ({})", book.title, kind),
            unit_amount: amount_in_minor_units(unit_price),
            currency: CheckoutConfig::currency(),
            success_url: CheckoutConfig::success_url(),
            cancel_url: CheckoutConfig::cancel_url(),
            metadata: CheckoutMetadata {
                book_id: book.id_string(),
                kind,
                user_id: user.user_id.clone(),
            },
        };

        let session = self.gateway.create_session(new_session).await?;

        log::info!("💳 결제 세션 생성: {} - {} ({}) by {}", session.id, book.title, kind, user.username);

        Ok(CheckoutSessionResponse { session_id: session.id, url: session.url })
    }

    /// 결제 확정
    pub async fn confirm_payment(
        &self,
        user: &AuthenticatedUser,
        request: ConfirmPaymentRequest,
    ) -> Result<ConfirmPaymentResponse, AppError> {
        let session = self.gateway.retrieve_session(&request.session_id).await?;
        let plan = plan_confirmation(&session, &user.object_id()?)?;

        let response = record_confirmation(self.ledger.as_ref(), &plan, RentalConfig::duration()).await?;

        if !response.already_processed {
            log::info!(
                "✅ 결제 완료: {} - {} ({}, {:.2} {})",
                user.username, plan.book_id, plan.kind, plan.amount, plan.currency
            );
        }

        Ok(response)
    }

    /// 현재 사용자의 결제 내역 (최신순)
    pub async fn payment_history(&self, user: &AuthenticatedUser) -> Result<Vec<PaymentResponse>, AppError> {
        let payments = self.payment_repo.find_by_user(&user.object_id()?).await?;
        Ok(payments.iter().map(PaymentResponse::from).collect())
    }
}

fn payment_service_constructor() -> Box<dyn std::any::Any + Send + Sync> {
    Box::new(PaymentService::instance())
}

inventory::submit! {
    crate::core::registry::ServiceRegistration {
        name: "payment_service",
        constructor: payment_service_constructor,
    }
}

/// 확인된 결제를 기록하고 도서/사용자 이력을 추가합니다
///
/// - `succeeded` 결제가 이미 있으면 아무것도 추가하지 않습니다
/// - `pending` 결제가 남아 있으면 이력 추가를 이어서 마무리합니다
/// - 동시 확정은 유니크 인덱스 충돌(`ConflictError`)로 감지합니다
pub(crate) async fn record_confirmation(
    ledger: &dyn PaymentLedger,
    plan: &ConfirmationPlan,
    rental_duration: chrono::Duration,
) -> Result<ConfirmPaymentResponse, AppError> {
    let mut payment = match ledger.find_by_transaction(&plan.external_transaction_id).await? {
        Some(existing) if existing.is_succeeded() => {
            log::info!("🔁 이미 처리된 결제: {}", plan.external_transaction_id);
            return Ok(ConfirmPaymentResponse::already_processed());
        }
        Some(pending) => {
            log::warn!("⚠️ 이력 추가가 끝나지 않은 결제 재개: {}", plan.external_transaction_id);
            pending
        }
        None => {
            if !ledger.book_exists(&plan.book_id).await? {
                return Err(AppError::NotFound("Book not found".to_string()));
            }

            let pending = Payment::pending(
                plan.book_id,
                plan.user_id,
                plan.amount,
                plan.currency.clone(),
                plan.kind,
                plan.external_transaction_id.clone(),
                plan.session_id.clone(),
            );

            match ledger.insert(pending).await {
                Ok(payment) => payment,
                Err(AppError::ConflictError(_)) => {
                    log::info!("🔁 동시 확정 요청 감지: {}", plan.external_transaction_id);
                    return Ok(ConfirmPaymentResponse::already_processed());
                }
                Err(e) => return Err(e),
            }
        }
    };
    let payment_id = payment.id.ok_or_else(|| AppError::InternalError("결제 ID가 없습니다".to_string()))?;

    // 재개 시에도 같은 이력이 나오도록 결제 생성 시각을 기준으로 함
    let entries = history_entries(plan, payment_id, payment.created_at, rental_duration);
    ledger.append_history(&plan.book_id, &plan.user_id, &entries).await?;
    ledger.mark_succeeded(&payment_id).await?;
    payment.mark_succeeded();

    let rental_end_date = match &entries {
        HistoryEntries::Rental { rented, .. } => Some(to_rfc3339(rented.rental_end_date)),
        HistoryEntries::Purchase { .. } => None,
    };

    Ok(ConfirmPaymentResponse::processed(&payment, rental_end_date))
}

/// 통화 단위 가격을 최소 단위(센트)로 변환
pub(crate) fn amount_in_minor_units(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

/// 결제 종류에 맞게 판매/대여 중인지 확인하고 단가를 반환
pub(crate) fn ensure_available(book: &Book, kind: PaymentKind) -> Result<f64, AppError> {
    let (available, price) = match kind {
        PaymentKind::Purchase => (book.available_for_purchase, book.price),
        PaymentKind::Rental => (book.available_for_rental, book.rental_price),
    };

    if !available {
        return Err(AppError::ValidationError(format!("Book is not available for {}", kind)));
    }
    if price <= 0.0 {
        return Err(AppError::ValidationError("Book has no price set".to_string()));
    }

    Ok(price)
}

/// 세션이 결제 완료 상태이고 호출자의 것인지 확인한 뒤 기록 계획을 만듭니다
pub(crate) fn plan_confirmation(session: &CheckoutSession, caller: &ObjectId) -> Result<ConfirmationPlan, AppError> {
    if !session.is_paid() {
        return Err(AppError::ValidationError("Payment has not been completed".to_string()));
    }

    let metadata = session.metadata()?;
    let user_id = parse_object_id(&metadata.user_id)?;
    if user_id != *caller {
        return Err(AppError::AuthorizationError("Checkout session belongs to another user".to_string()));
    }

    let amount_total = session
        .amount_total
        .ok_or_else(|| AppError::ExternalServiceError("Checkout session has no amount".to_string()))?;

    Ok(ConfirmationPlan {
        book_id: parse_object_id(&metadata.book_id)?,
        user_id,
        kind: metadata.kind,
        amount: amount_total as f64 / 100.0,
        currency: session.currency.clone().unwrap_or_else(CheckoutConfig::currency),
        external_transaction_id: session.transaction_id().to_string(),
        session_id: session.id.clone(),
    })
}

/// 구매는 소장 이력, 대여는 `now + duration`까지의 대여 이력
pub(crate) fn history_entries(
    plan: &ConfirmationPlan,
    payment_id: ObjectId,
    now: DateTime,
    rental_duration: chrono::Duration,
) -> HistoryEntries {
    match plan.kind {
        PaymentKind::Purchase => HistoryEntries::Purchase {
            purchaser: Purchaser { user_id: plan.user_id, payment_id, purchase_date: now },
            owned: OwnedBook { book_id: plan.book_id, payment_id, purchase_date: now },
        },
        PaymentKind::Rental => {
            let rental_end_date = add_duration(now, rental_duration);
            HistoryEntries::Rental {
                renter: Renter { user_id: plan.user_id, payment_id, rental_date: now, rental_end_date },
                rented: RentedBook { book_id: plan.book_id, payment_id, rental_date: now, rental_end_date },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use async_trait::async_trait;
    use crate::domain::entities::payments::PaymentStatus;
    use crate::domain::models::checkout::CheckoutPaymentStatus;
    use crate::services::payments::checkout_gateway::InMemoryCheckoutGateway;

    /// 메모리 결제 기록 저장소
    #[derive(Default)]
    struct InMemoryPaymentLedger {
        payments: Mutex<Vec<Payment>>,
        books: HashSet<ObjectId>,
        /// 추가된 이력 (payment_id 단위)
        appended: Mutex<Vec<ObjectId>>,
        fail_next_append: AtomicBool,
        /// 다른 요청이 먼저 삽입한 상황 재현: 조회에서는 보이지 않음
        hide_existing: AtomicBool,
    }

    impl InMemoryPaymentLedger {
        fn with_book(book_id: ObjectId) -> Self {
            Self { books: HashSet::from([book_id]), ..Default::default() }
        }

        fn appended_count(&self) -> usize {
            self.appended.lock().unwrap().len()
        }

        fn stored_status(&self) -> Vec<PaymentStatus> {
            self.payments.lock().unwrap().iter().map(|p| p.status).collect()
        }
    }

    #[async_trait]
    impl PaymentLedger for InMemoryPaymentLedger {
        async fn find_by_transaction(&self, external_transaction_id: &str) -> Result<Option<Payment>, AppError> {
            if self.hide_existing.load(Ordering::SeqCst) {
                return Ok(None);
            }
            Ok(self.payments
                .lock()
                .unwrap()
                .iter()
                .find(|p| p.external_transaction_id == external_transaction_id)
                .cloned())
        }

        async fn insert(&self, mut payment: Payment) -> Result<Payment, AppError> {
            let mut payments = self.payments.lock().unwrap();
            if payments.iter().any(|p| p.external_transaction_id == payment.external_transaction_id) {
                return Err(AppError::ConflictError("Payment already processed".to_string()));
            }
            payment.id = Some(ObjectId::new());
            payments.push(payment.clone());
            Ok(payment)
        }

        async fn book_exists(&self, book_id: &ObjectId) -> Result<bool, AppError> {
            Ok(self.books.contains(book_id))
        }

        async fn append_history(
            &self,
            _book_id: &ObjectId,
            _user_id: &ObjectId,
            entries: &HistoryEntries,
        ) -> Result<(), AppError> {
            if self.fail_next_append.swap(false, Ordering::SeqCst) {
                return Err(AppError::DatabaseError("connection reset".to_string()));
            }
            let payment_id = match entries {
                HistoryEntries::Purchase { purchaser, .. } => purchaser.payment_id,
                HistoryEntries::Rental { renter, .. } => renter.payment_id,
            };
            let mut appended = self.appended.lock().unwrap();
            if !appended.contains(&payment_id) {
                appended.push(payment_id);
            }
            Ok(())
        }

        async fn mark_succeeded(&self, payment_id: &ObjectId) -> Result<(), AppError> {
            let mut payments = self.payments.lock().unwrap();
            let payment = payments
                .iter_mut()
                .find(|p| p.id.as_ref() == Some(payment_id))
                .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;
            payment.mark_succeeded();
            Ok(())
        }
    }

    fn plan(book_id: ObjectId, kind: PaymentKind) -> ConfirmationPlan {
        ConfirmationPlan {
            book_id,
            user_id: ObjectId::new(),
            kind,
            amount: 2.5,
            currency: "usd".to_string(),
            external_transaction_id: "pi_1".to_string(),
            session_id: "cs_1".to_string(),
        }
    }

    fn book(available_for_rental: bool) -> Book {
        let now = DateTime::now();
        Book {
            id: Some(ObjectId::new()),
            title: "Dune".to_string(),
            author: ObjectId::new(),
            description: None,
            published_date: now,
            price: 19.99,
            rental_price: 2.5,
            available_for_purchase: true,
            available_for_rental,
            purchasers: Vec::new(),
            renters: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn new_session(book_id: &ObjectId, user_id: &ObjectId, kind: PaymentKind) -> NewCheckoutSession {
        NewCheckoutSession {
            product_name: "Dune".to_string(),
            unit_amount: 250,
            currency: "usd".to_string(),
            success_url: "http://localhost:3000/payment/success".to_string(),
            cancel_url: "http://localhost:3000/payment/cancel".to_string(),
            metadata: CheckoutMetadata { book_id: book_id.to_hex(), kind, user_id: user_id.to_hex() },
        }
    }

    #[test]
    fn test_amount_in_minor_units() {
        assert_eq!(amount_in_minor_units(19.99), 1999);
        assert_eq!(amount_in_minor_units(2.5), 250);
        assert_eq!(amount_in_minor_units(0.1 + 0.2), 30);
    }

    #[test]
    fn test_ensure_available() {
        assert_eq!(ensure_available(&book(true), PaymentKind::Rental).unwrap(), 2.5);
        assert_eq!(ensure_available(&book(false), PaymentKind::Purchase).unwrap(), 19.99);
        assert!(matches!(ensure_available(&book(false), PaymentKind::Rental), Err(AppError::ValidationError(_))));

        let mut free = book(true);
        free.price = 0.0;
        assert!(ensure_available(&free, PaymentKind::Purchase).is_err());
    }

    #[actix_web::test]
    async fn test_plan_confirmation_for_paid_session() {
        let gateway = InMemoryCheckoutGateway::new();
        let (book_id, user_id) = (ObjectId::new(), ObjectId::new());

        let session = gateway.create_session(new_session(&book_id, &user_id, PaymentKind::Rental)).await.unwrap();
        assert!(gateway.mark_paid(&session.id));
        let session = gateway.retrieve_session(&session.id).await.unwrap();

        let plan = plan_confirmation(&session, &user_id).unwrap();
        assert_eq!(plan.book_id, book_id);
        assert_eq!(plan.kind, PaymentKind::Rental);
        assert_eq!(plan.amount, 2.5);
        assert_eq!(plan.session_id, session.id);
        assert_eq!(plan.external_transaction_id, session.transaction_id());
    }

    #[actix_web::test]
    async fn test_plan_confirmation_rejects_unpaid_and_foreign_sessions() {
        let gateway = InMemoryCheckoutGateway::new();
        let (book_id, user_id) = (ObjectId::new(), ObjectId::new());

        let session = gateway.create_session(new_session(&book_id, &user_id, PaymentKind::Purchase)).await.unwrap();
        assert!(matches!(plan_confirmation(&session, &user_id), Err(AppError::ValidationError(_))));

        gateway.set_status(&session.id, CheckoutPaymentStatus::Paid);
        let session = gateway.retrieve_session(&session.id).await.unwrap();
        assert!(matches!(plan_confirmation(&session, &ObjectId::new()), Err(AppError::AuthorizationError(_))));
    }

    #[test]
    fn test_history_entries() {
        let plan = ConfirmationPlan {
            book_id: ObjectId::new(),
            user_id: ObjectId::new(),
            kind: PaymentKind::Rental,
            amount: 2.5,
            currency: "usd".to_string(),
            external_transaction_id: "pi_1".to_string(),
            session_id: "cs_1".to_string(),
        };
        let payment_id = ObjectId::new();
        let now = DateTime::from_millis(1_700_000_000_000);

        match history_entries(&plan, payment_id, now, chrono::Duration::days(7)) {
            HistoryEntries::Rental { renter, rented } => {
                assert_eq!(renter.payment_id, payment_id);
                assert_eq!(renter.rental_end_date.timestamp_millis(), 1_700_000_000_000 + 7 * 86_400_000);
                assert_eq!(rented.rental_end_date, renter.rental_end_date);
                assert_eq!(rented.book_id, plan.book_id);
                assert_eq!(rented.payment_id, payment_id);
            }
            other => panic!("expected rental entries, got {:?}", other),
        }

        let purchase = ConfirmationPlan { kind: PaymentKind::Purchase, ..plan.clone() };
        match history_entries(&purchase, payment_id, now, chrono::Duration::days(7)) {
            HistoryEntries::Purchase { purchaser, owned } => {
                assert_eq!(purchaser.user_id, plan.user_id);
                assert_eq!(owned.purchase_date, now);
                assert_eq!(owned.payment_id, payment_id);

                let keys: Vec<String> = mongodb::bson::to_document(&owned).unwrap().keys().cloned().collect();
                assert_eq!(keys, vec!["book_id", "payment_id", "purchase_date"]);
            }
            other => panic!("expected purchase entries, got {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_confirming_twice_appends_history_once() {
        let book_id = ObjectId::new();
        let ledger = InMemoryPaymentLedger::with_book(book_id);
        let plan = plan(book_id, PaymentKind::Rental);

        let first = record_confirmation(&ledger, &plan, chrono::Duration::days(7)).await.unwrap();
        assert!(!first.already_processed);
        assert!(first.rental_end_date.is_some());
        assert_eq!(first.payment.as_ref().map(|p| p.status), Some(PaymentStatus::Succeeded));

        let second = record_confirmation(&ledger, &plan, chrono::Duration::days(7)).await.unwrap();
        assert!(second.already_processed);
        assert!(second.payment.is_none());

        assert_eq!(ledger.appended_count(), 1);
        assert_eq!(ledger.stored_status(), vec![PaymentStatus::Succeeded]);
    }

    #[actix_web::test]
    async fn test_concurrent_insert_is_reported_as_already_processed() {
        let book_id = ObjectId::new();
        let ledger = InMemoryPaymentLedger::with_book(book_id);
        let plan = plan(book_id, PaymentKind::Purchase);

        record_confirmation(&ledger, &plan, chrono::Duration::days(7)).await.unwrap();
        ledger.hide_existing.store(true, Ordering::SeqCst);

        let racing = record_confirmation(&ledger, &plan, chrono::Duration::days(7)).await.unwrap();
        assert!(racing.already_processed);
        assert_eq!(ledger.appended_count(), 1);
        assert_eq!(ledger.payments.lock().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_failed_history_append_is_resumed_on_retry() {
        let book_id = ObjectId::new();
        let ledger = InMemoryPaymentLedger::with_book(book_id);
        let plan = plan(book_id, PaymentKind::Purchase);
        ledger.fail_next_append.store(true, Ordering::SeqCst);

        let failed = record_confirmation(&ledger, &plan, chrono::Duration::days(7)).await;
        assert!(matches!(failed, Err(AppError::DatabaseError(_))));
        assert_eq!(ledger.stored_status(), vec![PaymentStatus::Pending]);
        assert_eq!(ledger.appended_count(), 0);

        let retried = record_confirmation(&ledger, &plan, chrono::Duration::days(7)).await.unwrap();
        assert!(!retried.already_processed);
        assert_eq!(ledger.stored_status(), vec![PaymentStatus::Succeeded]);
        assert_eq!(ledger.appended_count(), 1);

        let again = record_confirmation(&ledger, &plan, chrono::Duration::days(7)).await.unwrap();
        assert!(again.already_processed);
        assert_eq!(ledger.appended_count(), 1);
    }

    #[actix_web::test]
    async fn test_unknown_book_is_not_recorded() {
        let ledger = InMemoryPaymentLedger::default();
        let result = record_confirmation(&ledger, &plan(ObjectId::new(), PaymentKind::Purchase), chrono::Duration::days(7)).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(ledger.payments.lock().unwrap().is_empty());
    }
}
