//! # 인증 서비스
//!
//! 회원가입, 로그인, 현재 사용자 조회를 담당합니다.
//!
//! ```text
//! register ─┬─ 역할 정규화 (admin 자기 요청 거부)
//!           ├─ bcrypt 해싱
//!           ├─ UserRepository::create (username/email 중복 → 409)
//!           └─ TokenService::generate_access_token
//!
//! login ────┬─ username 조회 (없으면 401)
//!           ├─ bcrypt 검증 (불일치 401)
//!           └─ TokenService::generate_access_token
//! ```

use std::sync::Arc;
use mongodb::bson::DateTime;
use singleton_macro::service;
use crate::{
    config::Role,
    domain::{
        entities::users::User,
        dto::users::{AuthResponse, CurrentUserResponse, LoginRequest, RegisterRequest, UserResponse},
    },
    repositories::users::UserRepository,
    services::auth::{hash_password, verify_password, TokenService},
};
use crate::errors::errors::AppError;

#[service(name = "auth")]
pub struct AuthService {
    user_repo: Arc<UserRepository>,
}

impl AuthService {
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        let roles = resolve_registration_roles(request.roles.as_deref())?;
        let password_hash = hash_password(&request.password)?;

        let user = User::new(
            request.username.trim().to_string(),
            request.email.trim().to_lowercase(),
            password_hash,
            &roles,
        );

        let created = self.user_repo.create(user).await?;
        let token = TokenService::instance().generate_access_token(&created)?;

        log::info!("✅ 회원가입 완료: {} {:?}", created.username, created.roles);

        Ok(AuthResponse {
            message: "User registered successfully".to_string(),
            user: UserResponse::from(created),
            token,
        })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        let invalid = || AppError::AuthenticationError("Invalid credentials".to_string());

        let user = self.user_repo
            .find_by_username(request.username.trim())
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(&request.password, &user.password_hash)? {
            log::warn!("🔒 로그인 실패: {}", user.username);
            return Err(invalid());
        }

        let token = TokenService::instance().generate_access_token(&user)?;

        log::info!("🔑 로그인: {}", user.username);

        Ok(AuthResponse {
            message: "Login successful".to_string(),
            user: UserResponse::from(user),
            token,
        })
    }

    pub async fn current_user(&self, user_id: &str) -> Result<CurrentUserResponse, AppError> {
        let user = self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        Ok(CurrentUserResponse::from_user(user, DateTime::now()))
    }
}

/// 자기 가입 시 요청 역할을 정규화합니다
///
/// 알 수 없는 역할은 400, `admin` 요청은 403입니다.
pub(crate) fn resolve_registration_roles(requested: Option<&[String]>) -> Result<Vec<Role>, AppError> {
    let roles = Role::parse_all(requested.unwrap_or_default()).map_err(AppError::ValidationError)?;

    if roles.contains(&Role::Admin) {
        return Err(AppError::AuthorizationError(
            "Admin role cannot be self-assigned".to_string(),
        ));
    }

    Ok(roles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_registration_roles_default_to_reader() {
        assert_eq!(resolve_registration_roles(None).unwrap(), vec![Role::Reader]);
        assert_eq!(resolve_registration_roles(Some(Vec::new().as_slice())).unwrap(), vec![Role::Reader]);
    }

    #[test]
    fn test_registration_roles_dedupe() {
        let roles = resolve_registration_roles(Some(strings(&["author", "reader", "Author"]).as_slice())).unwrap();
        assert_eq!(roles, vec![Role::Author, Role::Reader]);
    }

    #[test]
    fn test_registration_rejects_admin() {
        let result = resolve_registration_roles(Some(strings(&["reader", "admin"]).as_slice()));
        assert!(matches!(result, Err(AppError::AuthorizationError(_))));
    }

    #[test]
    fn test_registration_rejects_unknown_role() {
        let result = resolve_registration_roles(Some(strings(&["superuser"]).as_slice()));
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
