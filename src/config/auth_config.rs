//! 인증 관련 설정과 역할 정의
//!
//! JWT 서명 설정과 사용자 역할 열거형을 제공합니다.
//! 모든 값은 환경변수에서 읽고, 없으면 개발용 기본값을 사용합니다.
//!
//! # Environment Variables
//!
//! * `JWT_SECRET` - HS256 서명 키 (운영 환경에서는 반드시 설정)
//! * `JWT_EXPIRATION_HOURS` - 액세스 토큰 유효 시간 (기본값: 1)

use std::env;
use std::fmt;

/// JWT 토큰 설정
pub struct JwtConfig;

impl JwtConfig {
    pub fn secret() -> String {
        env::var("JWT_SECRET")
            .unwrap_or_else(|_| {
                log::warn!("JWT_SECRET not set, using default (not secure for production!)");
                "library-store-dev-secret".to_string()
            })
    }

    /// 액세스 토큰 유효 시간 (시간 단위)
    pub fn expiration_hours() -> i64 {
        env::var("JWT_EXPIRATION_HOURS")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .filter(|hours| *hours > 0)
            .unwrap_or(1)
    }
}

/// 사용자 역할
///
/// 역할 집합은 항상 이 열거형에서만 뽑히며 비어 있을 수 없습니다.
/// JSON/BSON 에서는 소문자 문자열(`"admin"`, `"author"`, `"reader"`)로 표현됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 전체 카탈로그/사용자 관리, 모든 도서 콘텐츠 열람
    Admin,

    /// 도서 등록 및 본인 도서 관리
    Author,

    /// 기본 역할 (구매, 대여, 댓글)
    Reader,
}

impl Role {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "author" => Ok(Role::Author),
            "reader" => Ok(Role::Reader),
            _ => Err(format!("Unsupported role: {}", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Author => "author",
            Role::Reader => "reader",
        }
    }

    /// 역할 목록을 정규화합니다
    ///
    /// 중복을 제거하되 처음 등장한 순서를 유지하고, 비어 있으면 `[Reader]`를 반환합니다.
    pub fn normalize(roles: &[Role]) -> Vec<Role> {
        let mut normalized: Vec<Role> = Vec::with_capacity(roles.len());
        for role in roles {
            if !normalized.contains(role) {
                normalized.push(*role);
            }
        }

        if normalized.is_empty() {
            normalized.push(Role::Reader);
        }
        normalized
    }
}

impl Role {
    /// 문자열 역할 목록을 파싱하고 정규화합니다. 알 수 없는 역할이 하나라도 있으면 실패합니다.
    pub fn parse_all(values: &[String]) -> Result<Vec<Role>, String> {
        let parsed = values
            .iter()
            .map(|value| Role::from_str(value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Role::normalize(&parsed))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
