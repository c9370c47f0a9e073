//! # 결제 기록 저장소
//!
//! 결제 확정 흐름이 사용하는 저장소 연산만 모은 트레이트입니다.
//! 운영 환경에서는 [`MongoPaymentLedger`]가 결제/도서/사용자 리포지토리에 위임합니다.
//!
//! 이력 추가는 `payment_id` 기준으로 멱등이어야 합니다. 같은 결제로 다시 호출되면
//! 이미 있는 항목은 건너뜁니다.

use std::sync::Arc;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use crate::{
    core::errors::AppError,
    domain::entities::payments::Payment,
    repositories::{books::BookRepository, payments::PaymentRepository, users::UserRepository},
};
use super::payment_service::HistoryEntries;

#[async_trait]
pub(crate) trait PaymentLedger: Send + Sync {
    async fn find_by_transaction(&self, external_transaction_id: &str) -> Result<Option<Payment>, AppError>;

    /// 결제 기록 삽입 (중복 거래 ID면 `ConflictError`)
    async fn insert(&self, payment: Payment) -> Result<Payment, AppError>;

    async fn book_exists(&self, book_id: &ObjectId) -> Result<bool, AppError>;

    /// 도서 쪽, 사용자 쪽 이력을 순서대로 추가
    async fn append_history(
        &self,
        book_id: &ObjectId,
        user_id: &ObjectId,
        entries: &HistoryEntries,
    ) -> Result<(), AppError>;

    async fn mark_succeeded(&self, payment_id: &ObjectId) -> Result<(), AppError>;
}

pub(crate) struct MongoPaymentLedger {
    payment_repo: Arc<PaymentRepository>,
    book_repo: Arc<BookRepository>,
    user_repo: Arc<UserRepository>,
}

impl MongoPaymentLedger {
    pub(crate) fn new(
        payment_repo: Arc<PaymentRepository>,
        book_repo: Arc<BookRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self { payment_repo, book_repo, user_repo }
    }
}

#[async_trait]
impl PaymentLedger for MongoPaymentLedger {
    async fn find_by_transaction(&self, external_transaction_id: &str) -> Result<Option<Payment>, AppError> {
        self.payment_repo.find_by_external_id(external_transaction_id).await
    }

    async fn insert(&self, payment: Payment) -> Result<Payment, AppError> {
        self.payment_repo.create(payment).await
    }

    async fn book_exists(&self, book_id: &ObjectId) -> Result<bool, AppError> {
        Ok(self.book_repo.find_by_id(&book_id.to_hex()).await?.is_some())
    }

    async fn append_history(
        &self,
        book_id: &ObjectId,
        user_id: &ObjectId,
        entries: &HistoryEntries,
    ) -> Result<(), AppError> {
        match entries {
            HistoryEntries::Purchase { purchaser, owned } => {
                self.book_repo.push_purchaser(book_id, purchaser).await?;
                self.user_repo.push_owned_book(user_id, owned).await
            }
            HistoryEntries::Rental { renter, rented } => {
                self.book_repo.push_renter(book_id, renter).await?;
                self.user_repo.push_rented_book(user_id, rented).await
            }
        }
    }

    async fn mark_succeeded(&self, payment_id: &ObjectId) -> Result<(), AppError> {
        self.payment_repo.mark_succeeded(payment_id).await
    }
}
