//! # 댓글 서비스
//!
//! 도서 리뷰(평점 + 본문)의 작성, 조회, 수정, 삭제를 담당합니다.
//! 작성은 인증된 사용자 누구나 가능하며 수정/삭제는 작성자 본인 또는 관리자만 가능합니다.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use singleton_macro::service;
use crate::{
    domain::{
        entities::comments::Comment,
        dto::comments::{
            average_rating, BookCommentsResponse, CommentResponse, CreateCommentRequest, UpdateCommentRequest,
        },
        models::auth::AuthenticatedUser,
    },
    repositories::{books::BookRepository, comments::CommentRepository, parse_object_id, users::UserRepository},
    utils::string_utils::validate_required_string,
    core::errors::AppError,
};

#[service(name = "comment")]
pub struct CommentService {
    comment_repo: Arc<CommentRepository>,
    book_repo: Arc<BookRepository>,
    user_repo: Arc<UserRepository>,
}

impl CommentService {
    pub async fn create_comment(
        &self,
        user: &AuthenticatedUser,
        book_id: &str,
        request: CreateCommentRequest,
    ) -> Result<CommentResponse, AppError> {
        let book = self.book_repo
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        let book_oid = book.id.ok_or_else(|| AppError::InternalError("도서 ID가 없습니다".to_string()))?;

        let description = validate_required_string(&request.description, "description")?;
        let comment = Comment::new(book_oid, user.object_id()?, description, request.rating);
        let created = self.comment_repo.create(comment).await?;

        log::info!("💬 댓글 작성: {} → {} ({}점)", user.username, book.title, created.rating);

        Ok(CommentResponse::from_comment(&created, Some(user.username.clone()), Some(book.title)))
    }

    pub async fn get_comment(&self, id: &str) -> Result<CommentResponse, AppError> {
        let comment = self.find_comment(id).await?;
        let mut responses = self.to_responses(std::slice::from_ref(&comment)).await?;
        responses
            .pop()
            .ok_or_else(|| AppError::InternalError("댓글 변환 실패".to_string()))
    }

    pub async fn list_comments(&self) -> Result<Vec<CommentResponse>, AppError> {
        let comments = self.comment_repo.find_all().await?;
        self.to_responses(&comments).await
    }

    /// 도서의 댓글 목록과 평균 평점
    pub async fn comments_for_book(&self, book_id: &str) -> Result<BookCommentsResponse, AppError> {
        let book = self.book_repo
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        let book_oid = book.id.ok_or_else(|| AppError::InternalError("도서 ID가 없습니다".to_string()))?;

        let comments = self.comment_repo.find_by_book(&book_oid).await?;

        Ok(BookCommentsResponse {
            book_id: book_oid.to_hex(),
            book_title: book.title,
            average_rating: average_rating(&comments),
            count: comments.len(),
            comments: self.to_responses(&comments).await?,
        })
    }

    pub async fn comments_by_author(&self, author_id: &str) -> Result<Vec<CommentResponse>, AppError> {
        let author = parse_object_id(author_id)?;
        let comments = self.comment_repo.find_by_author(&author).await?;

        if comments.is_empty() {
            return Err(AppError::NotFound("No comments found for this user".to_string()));
        }

        self.to_responses(&comments).await
    }

    pub async fn update_comment(
        &self,
        user: &AuthenticatedUser,
        id: &str,
        request: UpdateCommentRequest,
    ) -> Result<CommentResponse, AppError> {
        let comment = self.find_comment(id).await?;
        ensure_comment_manager(&comment, user)?;

        let update_doc = build_comment_update(&request)?;
        let updated = self.comment_repo
            .update(id, update_doc)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))?;

        let mut responses = self.to_responses(std::slice::from_ref(&updated)).await?;
        responses
            .pop()
            .ok_or_else(|| AppError::InternalError("댓글 변환 실패".to_string()))
    }

    pub async fn delete_comment(&self, user: &AuthenticatedUser, id: &str) -> Result<(), AppError> {
        let comment = self.find_comment(id).await?;
        ensure_comment_manager(&comment, user)?;

        if !self.comment_repo.delete(id).await? {
            return Err(AppError::NotFound("Comment not found".to_string()));
        }

        log::info!("🗑️ 댓글 삭제: {} by {}", id, user.username);
        Ok(())
    }

    async fn find_comment(&self, id: &str) -> Result<Comment, AppError> {
        self.comment_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
    }

    /// 작성자명과 도서 제목을 일괄 조회해 응답으로 변환
    async fn to_responses(&self, comments: &[Comment]) -> Result<Vec<CommentResponse>, AppError> {
        let author_ids: Vec<ObjectId> = comments.iter().map(|c| c.author).collect::<HashSet<_>>().into_iter().collect();
        let book_ids: Vec<ObjectId> = comments.iter().map(|c| c.book).collect::<HashSet<_>>().into_iter().collect();

        let usernames = self.user_repo.find_usernames(&author_ids).await?;
        let titles: HashMap<ObjectId, String> = self.book_repo
            .find_by_ids(&book_ids)
            .await?
            .into_iter()
            .filter_map(|book| book.id.map(|id| (id, book.title)))
            .collect();

        Ok(comments
            .iter()
            .map(|c| CommentResponse::from_comment(c, usernames.get(&c.author).cloned(), titles.get(&c.book).cloned()))
            .collect())
    }
}

fn ensure_comment_manager(comment: &Comment, user: &AuthenticatedUser) -> Result<(), AppError> {
    if comment.is_managed_by(&user.object_id()?, user.is_admin()) {
        Ok(())
    } else {
        Err(AppError::AuthorizationError("Only the comment author or an admin can modify this comment".to_string()))
    }
}

/// 본문과 평점만 변경 (도서/작성자는 고정)
pub(crate) fn build_comment_update(request: &UpdateCommentRequest) -> Result<Document, AppError> {
    let mut update = doc! { "updated_at": DateTime::now() };

    if let Some(description) = &request.description {
        update.insert("description", validate_required_string(description, "description")?);
    }
    if let Some(rating) = request.rating {
        update.insert("rating", rating);
    }

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Role;

    fn principal(user_id: ObjectId, roles: Vec<Role>) -> AuthenticatedUser {
        AuthenticatedUser { user_id: user_id.to_hex(), username: "reader".to_string(), roles }
    }

    #[test]
    fn test_build_comment_update() {
        let request = UpdateCommentRequest { description: Some("  Great read  ".to_string()), rating: Some(4) };
        let update = build_comment_update(&request).unwrap();

        assert_eq!(update.get_str("description").unwrap(), "Great read");
        assert_eq!(update.get_i32("rating").unwrap(), 4);
        assert!(update.get("book").is_none());
        assert!(update.get("author").is_none());
    }

    #[test]
    fn test_build_comment_update_rejects_blank_description() {
        let request = UpdateCommentRequest { description: Some("  ".to_string()), rating: None };
        assert!(matches!(build_comment_update(&request), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_ensure_comment_manager() {
        let author = ObjectId::new();
        let comment = Comment::new(ObjectId::new(), author, "ok".to_string(), 3);

        assert!(ensure_comment_manager(&comment, &principal(author, vec![Role::Reader])).is_ok());
        assert!(ensure_comment_manager(&comment, &principal(ObjectId::new(), vec![Role::Admin])).is_ok());
        assert!(matches!(
            ensure_comment_manager(&comment, &principal(ObjectId::new(), vec![Role::Reader])),
            Err(AppError::AuthorizationError(_))
        ));
    }
}
