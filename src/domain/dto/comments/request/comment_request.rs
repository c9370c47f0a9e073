//! 댓글 요청 DTO

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// 댓글 작성 요청 (`POST /books/{book_id}/comments`)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "댓글 내용은 1-2000자 사이여야 합니다"))]
    pub description: String,

    #[validate(range(min = 1, max = 5, message = "평점은 1-5 사이의 정수여야 합니다"))]
    pub rating: i32,
}

/// 댓글 수정 요청
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_has_changes"))]
pub struct UpdateCommentRequest {
    #[validate(length(min = 1, max = 2000, message = "댓글 내용은 1-2000자 사이여야 합니다"))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 5, message = "평점은 1-5 사이의 정수여야 합니다"))]
    pub rating: Option<i32>,
}

fn validate_has_changes(req: &UpdateCommentRequest) -> Result<(), ValidationError> {
    if req.description.is_none() && req.rating.is_none() {
        return Err(ValidationError::new("empty_update")
            .with_message("수정할 필드가 하나 이상 필요합니다".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        for rating in 1..=5 {
            let req = CreateCommentRequest { description: "good".to_string(), rating };
            assert!(req.validate().is_ok(), "rating {rating}");
        }
        for rating in [0, 6, -1] {
            let req = CreateCommentRequest { description: "good".to_string(), rating };
            assert!(req.validate().is_err(), "rating {rating}");
        }
    }

    #[test]
    fn test_description_required() {
        let req = CreateCommentRequest { description: String::new(), rating: 3 };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_comment() {
        assert!(UpdateCommentRequest::default().validate().is_err());
        assert!(UpdateCommentRequest { rating: Some(9), ..Default::default() }.validate().is_err());
        assert!(UpdateCommentRequest { rating: Some(4), ..Default::default() }.validate().is_ok());
    }
}
