//! 캐싱 계층 모듈
//!
//! 리포지토리 읽기 캐시용 Redis 클라이언트를 제공합니다.
//!
//! ```bash
//! REDIS_URL=redis://localhost:6379  # 기본값
//! ```

pub mod redis;
