//! 사용자 엔티티
//!
//! 로컬 계정(사용자명/이메일 + bcrypt 비밀번호)만 지원합니다.
//! 구매/대여 이력은 결제 확정 시 `$push`로만 추가되며 덮어쓰지 않습니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use crate::config::Role;

/// 사용자 엔티티
///
/// `users` 컬렉션의 문서와 1:1로 매핑됩니다.
/// `username`과 `email`은 유니크 인덱스로 보호됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// 로그인 아이디 (unique)
    pub username: String,
    /// 이메일 (unique)
    pub email: String,
    /// bcrypt 해시
    pub password_hash: String,
    /// 역할 집합 (비어 있지 않음)
    pub roles: Vec<Role>,
    /// 구매 이력
    #[serde(default)]
    pub owned_books: Vec<OwnedBook>,
    /// 대여 이력
    #[serde(default)]
    pub rented_books: Vec<RentedBook>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// 사용자 측 구매 기록
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OwnedBook {
    pub book_id: ObjectId,
    /// 이 구매를 만든 결제
    pub payment_id: ObjectId,
    pub purchase_date: DateTime,
}

/// 사용자 측 대여 기록
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RentedBook {
    pub book_id: ObjectId,
    pub payment_id: ObjectId,
    pub rental_date: DateTime,
    pub rental_end_date: DateTime,
}

impl User {
    /// 새 사용자를 생성합니다. 역할은 [`Role::normalize`]로 정규화됩니다.
    pub fn new(username: String, email: String, password_hash: String, roles: &[Role]) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            username,
            email,
            password_hash,
            roles: Role::normalize(roles),
            owned_books: Vec::new(),
            rented_books: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
