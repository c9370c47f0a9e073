//! 도서 판매/대여 도메인 설정
//!
//! # Environment Variables
//!
//! * `RENTAL_DURATION_DAYS` - 대여 기간 (기본값: 7일)
//! * `PAGINATION_DEFAULT_LIMIT` / `PAGINATION_MAX_LIMIT` - 목록 페이지 크기 (기본값: 5 / 50)
//! * `CHECKOUT_PROVIDER` - `stripe` 또는 `memory` (개발용, 기본값: stripe)
//! * `CHECKOUT_API_BASE` - 결제 프로바이더 API 주소 (기본값: https://api.stripe.com)
//! * `CHECKOUT_SECRET_KEY` - 결제 프로바이더 비밀 키
//! * `CHECKOUT_CURRENCY` - 결제 통화 (기본값: usd)
//! * `CLIENT_URL` - SPA 주소, 결제 성공/취소 리다이렉트 기준 (기본값: http://localhost:3000)

use std::env;
use chrono::Duration;

/// 대여 설정
pub struct RentalConfig;

impl RentalConfig {
    pub const DEFAULT_DAYS: i64 = 7;

    pub fn duration_days() -> i64 {
        env::var("RENTAL_DURATION_DAYS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|days| *days > 0)
            .unwrap_or(Self::DEFAULT_DAYS)
    }

    pub fn duration() -> Duration {
        Duration::days(Self::duration_days())
    }
}

/// 목록 페이지네이션 설정
pub struct PaginationConfig;

impl PaginationConfig {
    pub fn default_limit() -> u64 {
        env::var("PAGINATION_DEFAULT_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(5)
    }

    pub fn max_limit() -> u64 {
        env::var("PAGINATION_MAX_LIMIT")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(50)
    }
}

/// 호스팅 결제(Checkout) 프로바이더 설정
pub struct CheckoutConfig;

/// 결제 프로바이더 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutProvider {
    Stripe,
    /// 외부 호출 없이 즉시 결제 완료로 처리 (개발용)
    Memory,
}

impl CheckoutConfig {
    pub fn provider() -> CheckoutProvider {
        match env::var("CHECKOUT_PROVIDER").unwrap_or_default().to_lowercase().as_str() {
            "memory" => CheckoutProvider::Memory,
            _ => CheckoutProvider::Stripe,
        }
    }

    pub fn api_base() -> String {
        env::var("CHECKOUT_API_BASE")
            .unwrap_or_else(|_| "https://api.stripe.com".to_string())
    }

    pub fn secret_key() -> String {
        env::var("CHECKOUT_SECRET_KEY")
            .unwrap_or_else(|_| {
                log::warn!("CHECKOUT_SECRET_KEY not set, checkout calls will be rejected by the provider");
                String::new()
            })
    }

    pub fn currency() -> String {
        env::var("CHECKOUT_CURRENCY").unwrap_or_else(|_| "usd".to_string())
    }

    pub fn client_url() -> String {
        env::var("CLIENT_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
    }

    /// 결제 성공 시 리다이렉트 주소 (`{CHECKOUT_SESSION_ID}`는 프로바이더가 치환)
    pub fn success_url() -> String {
        format!("{}/payment/success?session_id={{CHECKOUT_SESSION_ID}}", Self::client_url())
    }

    pub fn cancel_url() -> String {
        format!("{}/payment/cancel", Self::client_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rental_duration_default() {
        if env::var("RENTAL_DURATION_DAYS").is_err() {
            assert_eq!(RentalConfig::duration_days(), 7);
            assert_eq!(RentalConfig::duration(), Duration::days(7));
        }
    }

    #[test]
    fn test_pagination_defaults() {
        if env::var("PAGINATION_DEFAULT_LIMIT").is_err() {
            assert_eq!(PaginationConfig::default_limit(), 5);
        }
        if env::var("PAGINATION_MAX_LIMIT").is_err() {
            assert_eq!(PaginationConfig::max_limit(), 50);
        }
    }

    #[test]
    fn test_checkout_provider_default() {
        if env::var("CHECKOUT_PROVIDER").is_err() {
            assert_eq!(CheckoutConfig::provider(), CheckoutProvider::Stripe);
        }
    }

    #[test]
    fn test_checkout_redirect_urls() {
        if env::var("CLIENT_URL").is_err() {
            assert_eq!(
                CheckoutConfig::success_url(),
                "http://localhost:3000/payment/success?session_id={CHECKOUT_SESSION_ID}"
            );
            assert_eq!(CheckoutConfig::cancel_url(), "http://localhost:3000/payment/cancel");
        }
    }
}
