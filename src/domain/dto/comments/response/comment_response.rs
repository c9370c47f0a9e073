use serde::{Deserialize, Serialize};
use crate::domain::entities::comments::Comment;
use crate::utils::time_utils::to_rfc3339;

/// 댓글 응답 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub book_id: String,
    pub book_title: Option<String>,
    pub author_id: String,
    pub author_username: Option<String>,
    pub description: String,
    pub rating: i32,
    pub published_at: String,
    pub created_at: String,
    pub updated_at: String,
}

impl CommentResponse {
    pub fn from_comment(comment: &Comment, author_username: Option<String>, book_title: Option<String>) -> Self {
        Self {
            id: comment.id.map(|id| id.to_hex()).unwrap_or_default(),
            book_id: comment.book.to_hex(),
            book_title,
            author_id: comment.author.to_hex(),
            author_username,
            description: comment.description.clone(),
            rating: comment.rating,
            published_at: to_rfc3339(comment.published_at),
            created_at: to_rfc3339(comment.created_at),
            updated_at: to_rfc3339(comment.updated_at),
        }
    }
}

/// 도서별 댓글 목록 (평균 평점 포함)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookCommentsResponse {
    pub book_id: String,
    pub book_title: String,
    pub average_rating: f64,
    pub count: usize,
    pub comments: Vec<CommentResponse>,
}

/// 평균 평점 (소수점 둘째 자리 반올림, 댓글이 없으면 0)
pub fn average_rating(comments: &[Comment]) -> f64 {
    if comments.is_empty() {
        return 0.0;
    }
    let sum: i64 = comments.iter().map(|c| c.rating as i64).sum();
    let average = sum as f64 / comments.len() as f64;
    (average * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn comment(rating: i32) -> Comment {
        Comment::new(ObjectId::new(), ObjectId::new(), "review".to_string(), rating)
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), 0.0);
        assert_eq!(average_rating(&[comment(5)]), 5.0);
        assert_eq!(average_rating(&[comment(4), comment(5)]), 4.5);
        assert_eq!(average_rating(&[comment(1), comment(2), comment(2)]), 1.67);
    }

    #[test]
    fn test_comment_response_fields() {
        let mut c = comment(4);
        c.id = Some(ObjectId::new());
        let response = CommentResponse::from_comment(&c, Some("reader_1".to_string()), Some("Dune".to_string()));

        assert_eq!(response.rating, 4);
        assert_eq!(response.author_username.as_deref(), Some("reader_1"));
        assert_eq!(response.book_id, c.book.to_hex());
        assert!(!response.id.is_empty());
    }
}
