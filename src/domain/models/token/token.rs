//! JWT 액세스 토큰 클레임
//!
//! RFC 7519 표준 클레임(`sub`, `iat`, `exp`)에 사용자명과 발급 시점의 역할을 더합니다.
//! 역할은 참고용이며, 권한 판정은 미들웨어가 저장소에서 다시 읽은 역할로 합니다.
use serde::{Deserialize, Serialize};
use crate::config::Role;

/// JWT 토큰의 클레임(Payload) 구조체
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// 토큰의 주체 (사용자 ID)
    pub sub: String,
    pub username: String,
    /// 발급 시점의 역할 목록
    pub roles: Vec<Role>,
    /// 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
}

/// 클라이언트에 전달되는 액세스 토큰
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
    /// 만료까지 남은 시간 (초)
    pub expires_in: i64,
}

impl AccessToken {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }
}
