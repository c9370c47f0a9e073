//! # Redis 캐시 클라이언트
//!
//! 리포지토리의 읽기 캐시(read-through)에 쓰이는 얇은 Redis 래퍼입니다.
//! 값은 JSON 문자열로 저장되며, 모든 쓰기 연산 후에는 해당 키를 삭제하여
//! 캐시가 최신 구매/대여 이력보다 앞서지 않도록 합니다.
//!
//! ## 키 규칙
//!
//! | 키 | 값 |
//! |----|----|
//! | `book:{id}` | 도서 엔티티 |
//! | `user:{id}` | 사용자 엔티티 |
//!
//! ## 연결 관리
//!
//! 호출마다 멀티플렉싱 연결을 얻어 사용합니다.

use redis::{AsyncCommands, Client};
use serde::{Serialize, de::DeserializeOwned};
use std::env;

/// Redis 캐시 클라이언트 래퍼
///
/// ```rust,ignore
/// let redis = RedisClient::new().await?;
/// redis.set_with_expiry("book:65f0...", &book, 600).await?;
/// let cached: Option<Book> = redis.get("book:65f0...").await?;
/// ```
#[derive(Clone)]
pub struct RedisClient {
    client: Client,
}

fn serialization_error(context: &'static str, e: serde_json::Error) -> redis::RedisError {
    redis::RedisError::from((redis::ErrorKind::TypeError, context, e.to_string()))
}

impl RedisClient {
    /// `REDIS_URL`(기본값 `redis://localhost:6379`)로 연결하고 PING으로 확인합니다
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let redis_url = env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)?;

        let mut conn = client.get_multiplexed_async_connection().await?;
        redis::cmd("PING").query_async::<()>(&mut conn).await?;

        log::info!("✅ Redis 연결 성공");

        Ok(Self { client })
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(key).await?;

        match value {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| serialization_error("Deserialization failed", e)),
            None => Ok(None),
        }
    }

    pub async fn set_with_expiry<T: Serialize>(&self, key: &str, value: &T, seconds: usize) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let json = serde_json::to_string(value)
            .map_err(|e| serialization_error("Serialization failed", e))?;
        conn.set_ex(key, json, seconds as u64).await
    }

    pub async fn del(&self, key: &str) -> Result<(), redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(key).await
    }

    pub async fn del_multiple(&self, keys: &[String]) -> Result<(), redis::RedisError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del(keys).await
    }

    pub async fn keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.keys(pattern).await
    }
}

impl Default for RedisClient {
    fn default() -> Self {
        let redis_url = env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());

        let client = Client::open(redis_url)
            .expect("Failed to create Redis client with default configuration");

        Self { client }
    }
}
