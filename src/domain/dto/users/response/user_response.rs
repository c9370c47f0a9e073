use serde::{Deserialize, Serialize};
use mongodb::bson::DateTime;
use crate::config::Role;
use crate::domain::entities::users::{OwnedBook, RentedBook, User};
use crate::domain::models::token::AccessToken;
use crate::utils::time_utils::to_rfc3339;

/// 사용자 응답 DTO (비밀번호 해시 제외)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        let User {
            id,
            username,
            email,
            roles,
            created_at,
            updated_at,
            ..
        } = user;

        Self {
            id: id.map(|id| id.to_hex()).unwrap_or_default(),
            username,
            email,
            roles,
            created_at: to_rfc3339(created_at),
            updated_at: to_rfc3339(updated_at),
        }
    }
}

/// 회원가입 / 로그인 응답 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserResponse,
    #[serde(flatten)]
    pub token: AccessToken,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnedBookEntry {
    pub book_id: String,
    pub payment_id: String,
    pub purchase_date: String,
}

impl From<&OwnedBook> for OwnedBookEntry {
    fn from(owned: &OwnedBook) -> Self {
        Self {
            book_id: owned.book_id.to_hex(),
            payment_id: owned.payment_id.to_hex(),
            purchase_date: to_rfc3339(owned.purchase_date),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentedBookEntry {
    pub book_id: String,
    pub payment_id: String,
    pub rental_date: String,
    pub rental_end_date: String,
    /// 조회 시점에 대여가 유효한지
    pub active: bool,
}

impl RentedBookEntry {
    pub fn from_rental(rental: &RentedBook, now: DateTime) -> Self {
        Self {
            book_id: rental.book_id.to_hex(),
            payment_id: rental.payment_id.to_hex(),
            rental_date: to_rfc3339(rental.rental_date),
            rental_end_date: to_rfc3339(rental.rental_end_date),
            active: now <= rental.rental_end_date,
        }
    }
}

/// `/auth/me` 응답 DTO
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub owned_books: Vec<OwnedBookEntry>,
    pub rented_books: Vec<RentedBookEntry>,
}

impl CurrentUserResponse {
    pub fn from_user(user: User, now: DateTime) -> Self {
        let owned_books = user.owned_books.iter().map(OwnedBookEntry::from).collect();
        let rented_books = user
            .rented_books
            .iter()
            .map(|rental| RentedBookEntry::from_rental(rental, now))
            .collect();

        Self {
            user: UserResponse::from(user),
            owned_books,
            rented_books,
        }
    }
}
