//! 댓글(리뷰) 엔티티

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// 도서 댓글
///
/// `rating`은 1~5 정수이며 검증은 요청 DTO에서 수행됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub book: ObjectId,
    pub author: ObjectId,
    pub description: String,
    pub rating: i32,
    pub published_at: DateTime,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Comment {
    pub fn new(book: ObjectId, author: ObjectId, description: String, rating: i32) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            book,
            author,
            description,
            rating,
            published_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    /// 관리자 또는 작성자 본인만 수정/삭제할 수 있습니다
    pub fn is_managed_by(&self, user_id: &ObjectId, is_admin: bool) -> bool {
        is_admin || self.author == *user_id
    }
}
