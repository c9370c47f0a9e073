//! 댓글 리포지토리

use std::sync::Arc;
use futures_util::TryStreamExt;
use mongodb::{bson::{doc, oid::ObjectId, Document}, options::IndexOptions, IndexModel};
use crate::{
    caching::redis::RedisClient,
    core::registry::Repository,
    db::Database,
    domain::entities::comments::Comment,
};
use singleton_macro::repository;
use crate::errors::errors::AppError;
use crate::repositories::parse_object_id;

#[repository(name = "comment", collection = "comments")]
pub struct CommentRepository {
    db: Arc<Database>,

    redis: Arc<RedisClient>,
}

impl CommentRepository {
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Comment>, AppError> {
        let object_id = parse_object_id(id)?;

        self.collection::<Comment>()
            .find_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn find_all(&self) -> Result<Vec<Comment>, AppError> {
        self.find_many(doc! {}).await
    }

    pub async fn find_by_book(&self, book_id: &ObjectId) -> Result<Vec<Comment>, AppError> {
        self.find_many(doc! { "book": *book_id }).await
    }

    pub async fn find_by_author(&self, author_id: &ObjectId) -> Result<Vec<Comment>, AppError> {
        self.find_many(doc! { "author": *author_id }).await
    }

    async fn find_many(&self, filter: Document) -> Result<Vec<Comment>, AppError> {
        let cursor = self.collection::<Comment>()
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        cursor
            .try_collect()
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn create(&self, mut comment: Comment) -> Result<Comment, AppError> {
        let result = self.collection::<Comment>()
            .insert_one(&comment)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        comment.id = Some(result.inserted_id.as_object_id().ok_or_else(|| {
            AppError::InternalError("삽입된 문서 ID가 ObjectId가 아닙니다".to_string())
        })?);

        Ok(comment)
    }

    pub async fn update(&self, id: &str, update_doc: Document) -> Result<Option<Comment>, AppError> {
        let object_id = parse_object_id(id)?;

        let options = mongodb::options::FindOneAndUpdateOptions::builder()
            .return_document(mongodb::options::ReturnDocument::After)
            .build();

        self.collection::<Comment>()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": update_doc },
            )
            .with_options(options)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))
    }

    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let object_id = parse_object_id(id)?;

        let result = self.collection::<Comment>()
            .delete_one(doc! { "_id": object_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count > 0)
    }

    /// 도서 삭제 시 딸린 댓글 정리
    pub async fn delete_by_book(&self, book_id: &ObjectId) -> Result<u64, AppError> {
        let result = self.collection::<Comment>()
            .delete_many(doc! { "book": *book_id })
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(result.deleted_count)
    }

    pub async fn create_indexes(&self) -> Result<(), AppError> {
        let book_index = IndexModel::builder()
            .keys(doc! { "book": 1, "created_at": -1 })
            .options(IndexOptions::builder()
                .name("book_created_at".to_string())
                .build())
            .build();

        let author_index = IndexModel::builder()
            .keys(doc! { "author": 1 })
            .options(IndexOptions::builder()
                .name("author_asc".to_string())
                .build())
            .build();

        self.collection::<Comment>()
            .create_indexes([book_index, author_index])
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
