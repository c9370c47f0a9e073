//! # JWT 토큰 서비스
//!
//! HS256 액세스 토큰 발급과 검증을 담당합니다.
//! 서명 키와 유효 시간은 [`JwtConfig`]에서 읽습니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use singleton_macro::service;
use crate::{
    config::JwtConfig,
    domain::entities::users::User,
};
use crate::domain::models::token::{AccessToken, TokenClaims};
use crate::errors::errors::AppError;

#[service(name="token")]
pub struct TokenService {
    // 외부 의존성 없음
}

impl TokenService {
    pub fn generate_access_token(&self, user: &User) -> Result<AccessToken, AppError> {
        let hours = JwtConfig::expiration_hours();
        let token = encode_access_token(user, &JwtConfig::secret(), hours)?;
        Ok(AccessToken::bearer(token, hours * 3600))
    }

    pub fn verify_token(&self, token: &str) -> Result<TokenClaims, AppError> {
        decode_access_token(token, &JwtConfig::secret())
    }

    pub fn extract_bearer_token<'a>(&self, auth_header: &'a str) -> Result<&'a str, AppError> {
        extract_bearer_token(auth_header)
    }
}

pub(crate) fn encode_access_token(user: &User, secret: &str, expiration_hours: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expiration = now + Duration::hours(expiration_hours);

    let claims = TokenClaims {
        sub: user.id_string().ok_or_else(|| {
            AppError::InternalError("사용자 ID가 없습니다".to_string())
        })?,
        username: user.username.clone(),
        roles: user.roles.clone(),
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    };

    let encoding_key = EncodingKey::from_secret(secret.as_ref());

    encode(&Header::default(), &claims, &encoding_key)
        .map_err(|e| AppError::InternalError(format!("JWT 토큰 생성 실패: {}", e)))
}

pub(crate) fn decode_access_token(token: &str, secret: &str) -> Result<TokenClaims, AppError> {
    let decoding_key = DecodingKey::from_secret(secret.as_ref());

    decode::<TokenClaims>(token, &decoding_key, &Validation::default())
        .map(|token_data| token_data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::AuthenticationError("토큰이 만료되었습니다".to_string())
            },
            _ => AppError::AuthenticationError("유효하지 않은 토큰입니다".to_string()),
        })
}

pub(crate) fn extract_bearer_token(auth_header: &str) -> Result<&str, AppError> {
    match auth_header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AppError::AuthenticationError("유효하지 않은 인증 헤더 형식입니다".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Role;
    use mongodb::bson::oid::ObjectId;

    const SECRET: &str = "test-secret";

    fn user() -> User {
        let mut user = User::new(
            "author_1".to_string(),
            "author@example.com".to_string(),
            "hash".to_string(),
            &[Role::Author],
        );
        user.id = Some(ObjectId::new());
        user
    }

    #[test]
    fn test_token_round_trip() {
        let user = user();
        let token = encode_access_token(&user, SECRET, 1).unwrap();
        let claims = decode_access_token(&token, SECRET).unwrap();

        assert_eq!(Some(claims.sub), user.id_string());
        assert_eq!(claims.username, "author_1");
        assert_eq!(claims.roles, vec![Role::Author]);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_is_authentication_error() {
        let token = encode_access_token(&user(), SECRET, 1).unwrap();
        let result = decode_access_token(&token, "other-secret");
        assert!(matches!(result, Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_expired_token() {
        let token = encode_access_token(&user(), SECRET, -2).unwrap();
        let result = decode_access_token(&token, SECRET);
        assert!(matches!(result, Err(AppError::AuthenticationError(msg)) if msg.contains("만료")));
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(decode_access_token("not.a.jwt", SECRET), Err(AppError::AuthenticationError(_))));
    }

    #[test]
    fn test_user_without_id_cannot_get_token() {
        let mut user = user();
        user.id = None;
        assert!(matches!(encode_access_token(&user, SECRET, 1), Err(AppError::InternalError(_))));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def").unwrap(), "abc.def");
        assert!(extract_bearer_token("Basic abc").is_err());
        assert!(extract_bearer_token("Bearer ").is_err());
        assert!(extract_bearer_token("bearer abc").is_err());
    }
}
