//! # 결제 리포지토리
//!
//! `external_transaction_id` 유니크 인덱스가 결제 확정의 멱등성을 보장합니다.
//! 동시에 같은 세션을 확정하면 한쪽 삽입이 중복 키로 실패하고,
//! 이 경우 [`AppError::ConflictError`]를 반환합니다.
//!
//! 결제는 `pending`으로 삽입된 뒤 이력 추가가 끝나면 [`PaymentRepository::mark_succeeded`]로
//! 확정됩니다. `pending`으로 남은 결제는 다음 확정 요청이 이어서 처리합니다.

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, oid::ObjectId, DateTime}, options::IndexOptions, IndexModel};
use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::payments::Payment,
};
use singleton_macro::repository;
use crate::errors::errors::AppError;
use crate::repositories::{is_duplicate_key_error, parse_object_id};

#[repository(name = "payment", collection = "payments")]
pub struct PaymentRepository {
    db: Arc<Database>,

    redis: Arc<RedisClient>,
}

impl PaymentRepository {
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Payment>, AppError> {
        let object_id = parse_object_id(id)?;

        self.collection::<Payment>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_external_id(&self, external_transaction_id: &str) -> Result<Option<Payment>, AppError> {
        self.collection::<Payment>()
            .find_one(doc! { "external_transaction_id": external_transaction_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_user(&self, user_id: &ObjectId) -> Result<Vec<Payment>, AppError> {
        let cursor = self.collection::<Payment>()
            .find(doc! { "user": *user_id })
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 결제 기록 삽입 (중복 거래 ID면 `ConflictError`)
    pub async fn create(&self, mut payment: Payment) -> Result<Payment, AppError> {
        let result = self.collection::<Payment>()
            .insert_one(&payment)
            .await
            .map_err(|e| {
                if is_duplicate_key_error(&e) {
                    AppError::ConflictError("Payment already processed".to_string())
                } else {
                    AppError::DatabaseError(e.to_string())
                }
            })?;

        payment.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 문서 ID가 ObjectId가 아닙니다".to_string())
        })?);

        Ok(payment)
    }

    /// 이력 추가가 끝난 결제를 `succeeded`로 전환
    pub async fn mark_succeeded(&self, id: &ObjectId) -> Result<(), AppError> {
        let result = self.collection::<Payment>()
            .update_one(
                doc! { "_id": *id },
                doc! { "$set": { "status": "succeeded", "updated_at": DateTime::now() } },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound("Payment not found".to_string()));
        }
        Ok(())
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let external_id_index = IndexModel::builder()
            .keys(doc! { "external_transaction_id": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("external_transaction_id_unique".to_string())
                .build())
            .build();

        let user_index = IndexModel::builder()
            .keys(doc! { "user": 1, "created_at": -1 })
            .options(IndexOptions::builder()
                .name("user_created_at".to_string())
                .build())
            .build();

        self.collection::<Payment>()
            .create_indexes([external_id_index, user_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
