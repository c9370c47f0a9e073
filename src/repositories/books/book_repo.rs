//! # 도서 리포지토리 구현
//!
//! 카탈로그 CRUD와 구매자/대여자 이력 추가를 담당합니다.
//! 이력 배열은 `$push`로만 변경되며, 카탈로그 수정(`update`)은 이력 필드를 건드리지 않습니다.

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, oid::ObjectId, to_bson, Bson, DateTime, Document}, options::IndexOptions, IndexModel};
use crate::{
    caching::redis::RedisClient,
    config::CacheConfig,
    core::registry::Repository,
    db::Database,
    domain::entities::books::{Book, Purchaser, Renter},
};
use singleton_macro::repository;
use crate::errors::errors::AppError;
use crate::repositories::parse_object_id;

#[repository(name = "book", collection = "books")]
pub struct BookRepository {
    db: Arc<Database>,

    redis: Arc<RedisClient>,
}

impl BookRepository {
    /// ID로 도서 조회 (캐시 우선)
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Book>, AppError> {
        let object_id = parse_object_id(id)?;

        let cache_key = self.cache_key(id);

        if let Ok(Some(cached)) = self.redis.get::<Book>(&cache_key).await {
            return Ok(Some(cached));
        }

        let book = self.collection::<Book>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if let Some(ref book) = book {
            let _ = self.redis
                .set_with_expiry(&cache_key, book, CacheConfig::ttl_seconds())
                .await;
        }

        Ok(book)
    }

    /// 최신 등록순 페이지 조회
    pub async fn find_page(&self, skip: u64, limit: u64) -> Result<Vec<Book>, AppError> {
        let cursor = self.collection::<Book>()
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit as i64)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        self.collection::<Book>()
            .count_documents(doc! {})
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_author(&self, author_id: &ObjectId) -> Result<Vec<Book>, AppError> {
        self.find_many(doc! { "author": *author_id }).await
    }

    pub async fn find_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Book>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.find_many(doc! { "_id": { "$in": ids.to_vec() } }).await
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<Book>, AppError> {
        let cursor = self.collection::<Book>()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut book: Book) -> Result<Book, AppError> {
        let result = self.collection::<Book>()
            .insert_one(&book)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        book.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 문서 ID가 ObjectId가 아닙니다".to_string())
        })?);

        let _ = self.invalidate_collection_cache(None).await;

        Ok(book)
    }

    /// 카탈로그 필드 `$set` 업데이트
    pub async fn update(&self, id: &str, update_doc: Document) -> Result<Option<Book>, AppError> {
        let object_id = parse_object_id(id)?;

        let options = mongodb::options::FindOneAndUpdateOptions::builder()
            .return_document(mongodb::options::ReturnDocument::After)
            .build();

        let updated = self.collection::<Book>()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": update_doc },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if updated.is_some() {
            let _ = self.invalidate_cache(id).await;
        }

        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let object_id = parse_object_id(id)?;

        let result = self.collection::<Book>()
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.deleted_count > 0 {
            let _ = self.invalidate_cache(id).await;
            let _ = self.invalidate_collection_cache(None).await;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub async fn push_purchaser(&self, book_id: &ObjectId, entry: &Purchaser) -> Result<(), AppError> {
        let payment_id = entry.payment_id;
        let entry = to_bson(entry).map_err(|e| AppError::InternalError(e.to_string()))?;
        self.push_history(*book_id, "purchasers", payment_id, entry).await
    }

    pub async fn push_renter(&self, book_id: &ObjectId, entry: &Renter) -> Result<(), AppError> {
        let payment_id = entry.payment_id;
        let entry = to_bson(entry).map_err(|e| AppError::InternalError(e.to_string()))?;
        self.push_history(*book_id, "renters", payment_id, entry).await
    }

    /// 같은 결제로 만든 항목이 이미 있으면 추가하지 않습니다 (재시도 안전)
    async fn push_history(&self, book_id: ObjectId, field: &str, payment_id: ObjectId, entry: Bson) -> Result<(), AppError> {
        let mut filter = doc! { "_id": book_id };
        filter.insert(format!("{}.payment_id", field), doc! { "$ne": payment_id });

        let mut push = Document::new();
        push.insert(field, entry);

        let result = self.collection::<Book>()
            .update_one(
                filter,
                doc! {
                    "$push": push,
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let _ = self.invalidate_cache(&book_id.to_hex()).await;

        if result.matched_count == 0 {
            let exists = self.collection::<Book>()
                .count_documents(doc! { "_id": book_id })
                .await
                .map_err(|e| AppError::DatabaseError(e.to_string()))?
                > 0;
            if !exists {
                return Err(AppError::NotFound("도서를 찾을 수 없습니다".to_string()));
            }
            log::debug!("🔁 이미 기록된 이력: {} {} (payment {})", field, book_id.to_hex(), payment_id.to_hex());
        }
        Ok(())
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let author_index = IndexModel::builder()
            .keys(doc! { "author": 1 })
            .options(IndexOptions::builder()
                .name("author_asc".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        self.collection::<Book>()
            .create_indexes([author_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
