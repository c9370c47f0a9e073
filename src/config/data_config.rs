//! 실행 환경, 비밀번호 해싱, 서버, 캐시 설정
//!
//! # Environment Variables
//!
//! * `ENVIRONMENT` - development / test / staging / production (기본값: production)
//! * `BCRYPT_COST` - 4~15 범위의 bcrypt cost (미설정 시 환경별 기본값)
//! * `HOST`, `PORT` - 바인딩 주소 (기본값: 127.0.0.1:8080)
//! * `CACHE_TTL_SECONDS` - 리포지토리 캐시 TTL (기본값: 600)

use std::env;

/// 실행 환경
#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl Environment {
    pub fn current() -> Self {
        Self::from_str(&env::var("ENVIRONMENT").unwrap_or_else(|_| "production".to_string()))
    }

    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" | "testing" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }
}

/// 비밀번호 해싱 설정
pub struct PasswordConfig;

impl PasswordConfig {
    /// 현재 환경에 맞는 bcrypt cost
    ///
    /// `BCRYPT_COST`가 유효 범위(4~15)에 있으면 우선 사용합니다.
    pub fn bcrypt_cost() -> u32 {
        env::var("BCRYPT_COST")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|cost| (4..=15).contains(cost))
            .unwrap_or_else(|| Self::bcrypt_cost_for_env(&Environment::current()))
    }

    pub fn bcrypt_cost_for_env(env: &Environment) -> u32 {
        match env {
            Environment::Development => 4,
            Environment::Test => 4,
            Environment::Staging => 10,
            Environment::Production => 12,
        }
    }

    /// 비밀번호 최소 길이
    pub const MIN_LENGTH: u64 = 8;
}

/// HTTP 서버 설정
pub struct ServerConfig;

impl ServerConfig {
    pub fn port() -> u16 {
        env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8080)
    }

    pub fn host() -> String {
        env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string())
    }

    pub fn bind_address() -> String {
        format!("{}:{}", Self::host(), Self::port())
    }
}

/// 리포지토리 읽기 캐시 설정
pub struct CacheConfig;

impl CacheConfig {
    pub fn ttl_seconds() -> usize {
        env::var("CACHE_TTL_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(600)
    }
}
