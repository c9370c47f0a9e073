//! # 리포지토리 계층
//!
//! MongoDB 컬렉션 접근과 Redis 읽기 캐시를 담당합니다.
//! 모든 리포지토리는 `#[repository]` 매크로로 싱글톤 등록되며
//! `db: Arc<Database>`, `redis: Arc<RedisClient>`를 주입받습니다.
//!
//! | 리포지토리 | 컬렉션 | 캐시 |
//! |------------|--------|------|
//! | [`users::UserRepository`] | `users` | `find_by_id` |
//! | [`books::BookRepository`] | `books` | `find_by_id` |
//! | [`comments::CommentRepository`] | `comments` | - |
//! | [`payments::PaymentRepository`] | `payments` | - |
//!
//! 쓰기 연산 뒤에는 항상 해당 문서의 캐시를 무효화합니다.

pub mod users;
pub mod books;
pub mod comments;
pub mod payments;

use mongodb::bson::oid::ObjectId;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use crate::errors::errors::AppError;

const DUPLICATE_KEY_CODE: i32 = 11000;

/// hex 문자열 ID를 `ObjectId`로 변환합니다 (실패 시 400)
pub fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id)
        .map_err(|_| AppError::ValidationError("유효하지 않은 ID 형식입니다".to_string()))
}

/// 유니크 인덱스 위반 여부
pub(crate) fn is_duplicate_key_error(error: &MongoError) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY_CODE,
        _ => error.to_string().contains("E11000"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
        assert!(matches!(parse_object_id("xyz"), Err(AppError::ValidationError(_))));
    }
}
