//! # 사용자 리포지토리 구현
//!
//! MongoDB를 주 저장소로 사용하고, ID 조회는 Redis로 캐싱합니다.
//!
//! ## 특징
//!
//! - **자동 의존성 주입**: 싱글톤 매크로를 통한 DI
//! - **데이터 무결성**: `username`, `email` 유니크 인덱스
//! - **이력 추가**: 구매/대여 이력은 `$push`로만 추가

use std::collections::HashMap;
use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, oid::ObjectId, to_bson, Bson, DateTime, Document}, options::IndexOptions, IndexModel};
use crate::{
    caching::redis::RedisClient,
    config::CacheConfig,
    core::registry::Repository,
    db::Database,
    domain::entities::users::{OwnedBook, RentedBook, User},
};
use singleton_macro::repository;
use crate::errors::errors::AppError;
use crate::repositories::{is_duplicate_key_error, parse_object_id};

#[repository(name = "user", collection = "users")]
pub struct UserRepository {
    db: Arc<Database>,

    redis: Arc<RedisClient>,
}

impl UserRepository {
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.collection::<User>()
            .find_one(doc! { "username": username })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.collection::<User>()
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// ID로 사용자 조회 (캐시 우선)
    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let object_id = parse_object_id(id)?;

        let cache_key = self.cache_key(id);

        // 캐시 확인
        if let Ok(Some(cached)) = self.redis.get::<User>(&cache_key).await {
            return Ok(Some(cached));
        }

        // DB 조회
        let user = self.collection::<User>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        // 캐시 저장
        if let Some(ref user) = user {
            let _ = self.redis
                .set_with_expiry(&cache_key, user, CacheConfig::ttl_seconds())
                .await;
        }

        Ok(user)
    }

    pub async fn find_all(&self) -> Result<Vec<User>, AppError> {
        let cursor = self.collection::<User>()
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    /// 사용자 ID → 사용자명 매핑 (목록 응답의 저자명 표시용)
    pub async fn find_usernames(&self, ids: &[ObjectId]) -> Result<HashMap<ObjectId, String>, AppError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let cursor = self.collection::<User>()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let users: Vec<User> = cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(users
            .into_iter()
            .filter_map(|user| user.id.map(|id| (id, user.username)))
            .collect())
    }

    pub async fn create(&self, mut user: User) -> Result<User, AppError> {
        // 중복 확인
        if self.find_by_email(&user.email).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
        }

        if self.find_by_username(&user.username).await?.is_some() {
            return Err(AppError::ConflictError("이미 사용 중인 사용자명입니다".to_string()));
        }

        // DB에 저장 (동시 가입은 유니크 인덱스가 막음)
        let result = self.collection::<User>()
            .insert_one(&user)
            .await
            .map_err(|e| {
                if is_duplicate_key_error(&e) {
                    AppError::ConflictError("이미 사용 중인 사용자명 또는 이메일입니다".to_string())
                } else {
                    AppError::DatabaseError(e.to_string())
                }
            })?;

        user.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 문서 ID가 ObjectId가 아닙니다".to_string())
        })?);

        // 컬렉션 캐시 무효화
        let _ = self.invalidate_collection_cache(None).await;

        Ok(user)
    }

    /// `$set` 업데이트 후 변경된 문서를 반환합니다
    pub async fn update(&self, id: &str, update_doc: Document) -> Result<Option<User>, AppError> {
        let object_id = parse_object_id(id)?;

        let options = mongodb::options::FindOneAndUpdateOptions::builder()
            .return_document(mongodb::options::ReturnDocument::After)
            .build();

        let updated_user = self.collection::<User>()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": update_doc },
            )
            .with_options(options)
            .await
            .map_err(|e| {
                if is_duplicate_key_error(&e) {
                    AppError::ConflictError("이미 사용 중인 사용자명 또는 이메일입니다".to_string())
                } else {
                    AppError::DatabaseError(e.to_string())
                }
            })?;

        // 캐시 무효화
        if updated_user.is_some() {
            let _ = self.invalidate_cache(id).await;
        }

        Ok(updated_user)
    }

    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let object_id = parse_object_id(id)?;

        let result = self.collection::<User>()
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        if result.deleted_count > 0 {
            // 캐시 무효화
            let _ = self.invalidate_cache(id).await;
            let _ = self.invalidate_collection_cache(None).await;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub async fn push_owned_book(&self, user_id: &ObjectId, entry: &OwnedBook) -> Result<(), AppError> {
        let payment_id = entry.payment_id;
        let entry = to_bson(entry).map_err(|e| AppError::InternalError(e.to_string()))?;
        self.push_history(*user_id, "owned_books", payment_id, entry).await
    }

    pub async fn push_rented_book(&self, user_id: &ObjectId, entry: &RentedBook) -> Result<(), AppError> {
        let payment_id = entry.payment_id;
        let entry = to_bson(entry).map_err(|e| AppError::InternalError(e.to_string()))?;
        self.push_history(*user_id, "rented_books", payment_id, entry).await
    }

    /// 같은 결제로 만든 항목이 이미 있으면 추가하지 않습니다 (재시도 안전)
    async fn push_history(&self, user_id: ObjectId, field: &str, payment_id: ObjectId, entry: Bson) -> Result<(), AppError> {
        let mut filter = doc! { "_id": user_id };
        filter.insert(format!("{}.payment_id", field), doc! { "$ne": payment_id });

        let mut push = Document::new();
        push.insert(field, entry);

        let result = self.collection::<User>()
            .update_one(
                filter,
                doc! {
                    "$push": push,
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        let _ = self.invalidate_cache(&user_id.to_hex()).await;

        if result.matched_count == 0 {
            let exists = self.collection::<User>()
                .count_documents(doc! { "_id": user_id })
                .await
                .map_err(|e| AppError::DatabaseError(e.to_string()))?
                > 0;
            if !exists {
                return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
            }
            log::debug!("🔁 이미 기록된 이력: {} {} (payment {})", field, user_id.to_hex(), payment_id.to_hex());
        }
        Ok(())
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let collection = self.collection::<User>();

        // 이메일 유니크 인덱스
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("email_unique".to_string())
                .build())
            .build();

        // 사용자명 유니크 인덱스
        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder()
                .unique(true)
                .name("username_unique".to_string())
                .build())
            .build();

        let created_at_index = IndexModel::builder()
            .keys(doc! { "created_at": -1 })
            .options(IndexOptions::builder()
                .name("created_at_desc".to_string())
                .build())
            .build();

        collection
            .create_indexes([email_index, username_index, created_at_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
