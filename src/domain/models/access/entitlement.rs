//! # 도서 콘텐츠 접근 판정
//!
//! 사용자가 특정 도서의 콘텐츠를 볼 수 있는지 결정하는 순수 함수입니다.
//! I/O도, 시계 조회도 하지 않습니다. 현재 시각은 호출자가 넘깁니다.
//!
//! ## 판정 순서
//!
//! 1. `admin` 역할 → 허용 ([`AccessGrant::Admin`])
//! 2. 구매자 목록에 있음 → 허용 ([`AccessGrant::Purchased`])
//! 3. 대여자 목록에 `now <= rental_end_date`인 기록이 있음 → 허용 ([`AccessGrant::Rented`])
//! 4. 대여 기록은 있으나 모두 만료 → 거부 ([`AccessDenial::RentalExpired`])
//! 5. 그 외 → 거부 ([`AccessDenial::NotEntitled`])
//!
//! `payment_filter`가 주어지면 해당 결제 ID로 만들어진 기록만 고려합니다.
//!
//! ```rust,ignore
//! let decision = evaluate_access(&user_id, &user.roles, &book, None, DateTime::now());
//! let grant = decision.into_result()?; // 403 또는 대여 만료 403
//! ```

use mongodb::bson::{oid::ObjectId, DateTime};
use crate::config::Role;
use crate::core::errors::AppError;
use crate::domain::entities::books::Book;

/// 접근이 허용된 근거
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessGrant {
    Admin,
    Purchased,
    /// 유효한 대여 (여러 건이면 가장 늦은 종료 시각)
    Rented { until: DateTime },
}

/// 접근이 거부된 이유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenial {
    /// 구매/대여 이력 없음
    NotEntitled,
    /// 대여 기록이 모두 만료됨 (가장 늦은 종료 시각)
    RentalExpired { ended_at: DateTime },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted(AccessGrant),
    Denied(AccessDenial),
}

impl AccessGrant {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessGrant::Admin => "admin",
            AccessGrant::Purchased => "purchased",
            AccessGrant::Rented { .. } => "rented",
        }
    }
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted(_))
    }

    /// 서비스 경계의 에러로 변환합니다
    ///
    /// 대여 만료는 [`AppError::RentalExpired`]로, 이력 없음은
    /// [`AppError::AuthorizationError`]로 구분됩니다. 둘 다 403입니다.
    pub fn into_result(self) -> Result<AccessGrant, AppError> {
        match self {
            AccessDecision::Granted(grant) => Ok(grant),
            AccessDecision::Denied(AccessDenial::NotEntitled) => Err(AppError::AuthorizationError(
                "Access denied: you have not purchased or rented this book".to_string(),
            )),
            AccessDecision::Denied(AccessDenial::RentalExpired { ended_at }) => {
                let ended = ended_at
                    .try_to_rfc3339_string()
                    .unwrap_or_else(|_| ended_at.timestamp_millis().to_string());
                Err(AppError::RentalExpired(format!("Rental period ended at {}", ended)))
            }
        }
    }
}

/// 콘텐츠 접근 여부를 판정합니다
pub fn evaluate_access(
    user_id: &ObjectId,
    roles: &[Role],
    book: &Book,
    payment_filter: Option<&ObjectId>,
    now: DateTime,
) -> AccessDecision {
    if roles.contains(&Role::Admin) {
        return AccessDecision::Granted(AccessGrant::Admin);
    }

    let counts = |payment_id: &ObjectId| payment_filter.is_none_or(|wanted| wanted == payment_id);

    let purchased = book
        .purchasers
        .iter()
        .any(|p| p.user_id == *user_id && counts(&p.payment_id));
    if purchased {
        return AccessDecision::Granted(AccessGrant::Purchased);
    }

    let mut active_until: Option<DateTime> = None;
    let mut latest_end: Option<DateTime> = None;

    for renter in book
        .renters
        .iter()
        .filter(|r| r.user_id == *user_id && counts(&r.payment_id))
    {
        let end = renter.rental_end_date;
        latest_end = latest_end.max(Some(end));
        if renter.is_active_at(now) {
            active_until = active_until.max(Some(end));
        }
    }

    match (active_until, latest_end) {
        (Some(until), _) => AccessDecision::Granted(AccessGrant::Rented { until }),
        (None, Some(ended_at)) => AccessDecision::Denied(AccessDenial::RentalExpired { ended_at }),
        (None, None) => AccessDecision::Denied(AccessDenial::NotEntitled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::books::{Purchaser, Renter};

    const HOUR: i64 = 60 * 60 * 1000;

    fn empty_book() -> Book {
        let now = DateTime::from_millis(0);
        Book {
            id: Some(ObjectId::new()),
            title: "The Rust Programming Language".to_string(),
            author: ObjectId::new(),
            description: None,
            published_date: now,
            price: 39.0,
            rental_price: 5.0,
            available_for_purchase: true,
            available_for_rental: true,
            purchasers: Vec::new(),
            renters: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn rent(book: &mut Book, user_id: ObjectId, end_millis: i64) -> ObjectId {
        let payment_id = ObjectId::new();
        book.renters.push(Renter {
            user_id,
            payment_id,
            rental_date: DateTime::from_millis(end_millis - 7 * 24 * HOUR),
            rental_end_date: DateTime::from_millis(end_millis),
        });
        payment_id
    }

    fn purchase(book: &mut Book, user_id: ObjectId) -> ObjectId {
        let payment_id = ObjectId::new();
        book.purchasers.push(Purchaser {
            user_id,
            payment_id,
            purchase_date: DateTime::from_millis(0),
        });
        payment_id
    }

    #[test]
    fn test_admin_always_granted() {
        let admin = ObjectId::new();
        let mut book = empty_book();
        let now = DateTime::from_millis(100 * HOUR);

        assert_eq!(
            evaluate_access(&admin, &[Role::Admin], &book, None, now),
            AccessDecision::Granted(AccessGrant::Admin)
        );

        // 만료된 대여가 있어도 관리자는 허용
        rent(&mut book, admin, HOUR);
        assert_eq!(
            evaluate_access(&admin, &[Role::Reader, Role::Admin], &book, None, now),
            AccessDecision::Granted(AccessGrant::Admin)
        );
    }

    #[test]
    fn test_purchaser_granted() {
        let buyer = ObjectId::new();
        let mut book = empty_book();
        purchase(&mut book, buyer);

        let decision = evaluate_access(&buyer, &[Role::Reader], &book, None, DateTime::now());
        assert_eq!(decision, AccessDecision::Granted(AccessGrant::Purchased));
    }

    #[test]
    fn test_stranger_denied() {
        let stranger = ObjectId::new();
        let mut book = empty_book();
        purchase(&mut book, ObjectId::new());
        rent(&mut book, ObjectId::new(), 10 * HOUR);

        let decision = evaluate_access(&stranger, &[Role::Reader, Role::Author], &book, None, DateTime::from_millis(HOUR));
        assert_eq!(decision, AccessDecision::Denied(AccessDenial::NotEntitled));
        assert!(matches!(decision.into_result(), Err(AppError::AuthorizationError(_))));
    }

    #[test]
    fn test_rental_boundary_is_inclusive() {
        let renter = ObjectId::new();
        let mut book = empty_book();
        let end = 50 * HOUR;
        rent(&mut book, renter, end);

        for offset in [-HOUR, -1, 0] {
            let decision = evaluate_access(&renter, &[Role::Reader], &book, None, DateTime::from_millis(end + offset));
            assert_eq!(
                decision,
                AccessDecision::Granted(AccessGrant::Rented { until: DateTime::from_millis(end) }),
                "offset {offset}"
            );
        }

        for offset in [1, HOUR, 30 * 24 * HOUR] {
            let decision = evaluate_access(&renter, &[Role::Reader], &book, None, DateTime::from_millis(end + offset));
            assert_eq!(
                decision,
                AccessDecision::Denied(AccessDenial::RentalExpired { ended_at: DateTime::from_millis(end) }),
                "offset {offset}"
            );
        }
    }

    #[test]
    fn test_expired_rental_is_distinct_error() {
        let renter = ObjectId::new();
        let mut book = empty_book();
        rent(&mut book, renter, HOUR);

        let decision = evaluate_access(&renter, &[Role::Reader], &book, None, DateTime::from_millis(2 * HOUR));
        assert!(!decision.is_granted());
        assert!(matches!(decision.into_result(), Err(AppError::RentalExpired(_))));
    }

    #[test]
    fn test_latest_active_rental_reported() {
        let renter = ObjectId::new();
        let mut book = empty_book();
        rent(&mut book, renter, HOUR);
        rent(&mut book, renter, 20 * HOUR);
        rent(&mut book, renter, 10 * HOUR);

        let decision = evaluate_access(&renter, &[Role::Reader], &book, None, DateTime::from_millis(5 * HOUR));
        assert_eq!(
            decision,
            AccessDecision::Granted(AccessGrant::Rented { until: DateTime::from_millis(20 * HOUR) })
        );

        let lapsed = evaluate_access(&renter, &[Role::Reader], &book, None, DateTime::from_millis(21 * HOUR));
        assert_eq!(
            lapsed,
            AccessDecision::Denied(AccessDenial::RentalExpired { ended_at: DateTime::from_millis(20 * HOUR) })
        );
    }

    #[test]
    fn test_purchase_wins_over_expired_rental() {
        let user = ObjectId::new();
        let mut book = empty_book();
        rent(&mut book, user, HOUR);
        purchase(&mut book, user);

        let decision = evaluate_access(&user, &[Role::Reader], &book, None, DateTime::from_millis(100 * HOUR));
        assert_eq!(decision, AccessDecision::Granted(AccessGrant::Purchased));
    }

    #[test]
    fn test_payment_filter_limits_entries() {
        let user = ObjectId::new();
        let mut book = empty_book();
        let purchase_payment = purchase(&mut book, user);
        let expired_payment = rent(&mut book, user, HOUR);
        let now = DateTime::from_millis(2 * HOUR);

        assert_eq!(
            evaluate_access(&user, &[Role::Reader], &book, Some(&purchase_payment), now),
            AccessDecision::Granted(AccessGrant::Purchased)
        );
        assert_eq!(
            evaluate_access(&user, &[Role::Reader], &book, Some(&expired_payment), now),
            AccessDecision::Denied(AccessDenial::RentalExpired { ended_at: DateTime::from_millis(HOUR) })
        );
        assert_eq!(
            evaluate_access(&user, &[Role::Reader], &book, Some(&ObjectId::new()), now),
            AccessDecision::Denied(AccessDenial::NotEntitled)
        );
    }

    #[test]
    fn test_other_users_rental_does_not_leak() {
        let user = ObjectId::new();
        let other = ObjectId::new();
        let mut book = empty_book();
        rent(&mut book, other, 10 * HOUR);
        rent(&mut book, user, HOUR);

        let decision = evaluate_access(&user, &[Role::Reader], &book, None, DateTime::from_millis(5 * HOUR));
        assert_eq!(
            decision,
            AccessDecision::Denied(AccessDenial::RentalExpired { ended_at: DateTime::from_millis(HOUR) })
        );
    }

    #[test]
    fn test_grant_labels() {
        assert_eq!(AccessGrant::Admin.as_str(), "admin");
        assert_eq!(AccessGrant::Purchased.as_str(), "purchased");
        assert_eq!(AccessGrant::Rented { until: DateTime::from_millis(0) }.as_str(), "rented");
    }
}
