//! # 사용자 관리 서비스 구현
//!
//! 관리자용 사용자 CRUD와 인증 미들웨어의 사용자 로딩을 담당합니다.
//!
//! ## 보안 설계
//!
//! - **bcrypt 해싱**: 관리자가 설정한 비밀번호도 동일한 cost로 해싱
//! - **역할 검증**: 알 수 없는 역할은 400, 빈 역할 집합은 허용하지 않음
//! - **중복 방지**: 사용자명/이메일 변경 시 유일성 재확인
//! - **민감 정보 제거**: 응답 DTO에 비밀번호 해시 미포함

use std::sync::Arc;
use mongodb::bson::{doc, DateTime, Document};
use singleton_macro::service;
use crate::{
    config::Role,
    domain::{
        entities::users::User,
        dto::users::{CreateUserRequest, UpdateUserRequest, UserResponse},
        models::auth::AuthenticatedUser,
    },
    repositories::users::UserRepository,
    services::auth::hash_password,
    core::errors::AppError,
};

#[service(name = "user")]
pub struct UserService {
    user_repo: Arc<UserRepository>,
}

impl UserService {
    pub async fn list_users(&self) -> Result<Vec<UserResponse>, AppError> {
        let users = self.user_repo.find_all().await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserResponse, AppError> {
        let roles = Role::parse_all(&request.roles).map_err(AppError::ValidationError)?;
        let password_hash = hash_password(&request.password)?;

        let user = User::new(
            request.username.trim().to_string(),
            request.email.trim().to_lowercase(),
            password_hash,
            &roles,
        );

        let created = self.user_repo.create(user).await?;
        log::info!("👤 관리자 사용자 생성: {} {:?}", created.username, created.roles);

        Ok(UserResponse::from(created))
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<UserResponse, AppError> {
        let user = self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        Ok(UserResponse::from(user))
    }

    pub async fn update_user(&self, id: &str, request: UpdateUserRequest) -> Result<UserResponse, AppError> {
        let existing = self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        if let Some(username) = request.username.as_deref().map(str::trim) {
            if username != existing.username && self.user_repo.find_by_username(username).await?.is_some() {
                return Err(AppError::ConflictError("이미 사용 중인 사용자명입니다".to_string()));
            }
        }

        if let Some(email) = request.email.as_deref().map(|e| e.trim().to_lowercase()) {
            if email != existing.email && self.user_repo.find_by_email(&email).await?.is_some() {
                return Err(AppError::ConflictError("이미 사용 중인 이메일입니다".to_string()));
            }
        }

        let password_hash = request.password.as_deref().map(hash_password).transpose()?;
        let update_doc = build_user_update(&request, password_hash)?;

        let updated = self.user_repo
            .update(id, update_doc)
            .await?
            .ok_or_else(|| AppError::NotFound("사용자를 찾을 수 없습니다".to_string()))?;

        Ok(UserResponse::from(updated))
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), AppError> {
        let deleted = self.user_repo.delete(id).await?;

        if !deleted {
            return Err(AppError::NotFound("사용자를 찾을 수 없습니다".to_string()));
        }

        log::info!("🗑️ 사용자 삭제: {}", id);
        Ok(())
    }

    /// 토큰 주체(sub)로 현재 사용자를 로딩합니다
    ///
    /// 역할은 저장소 값을 사용하므로 역할 변경이 즉시 반영됩니다.
    /// 사용자가 없거나 ID 형식이 잘못되었으면 401입니다.
    pub async fn load_principal(&self, user_id: &str) -> Result<AuthenticatedUser, AppError> {
        let user = match self.user_repo.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) | Err(AppError::ValidationError(_)) => {
                return Err(AppError::AuthenticationError("사용자를 찾을 수 없습니다".to_string()));
            }
            Err(e) => return Err(e),
        };

        Ok(AuthenticatedUser {
            user_id: user.id_string().unwrap_or_else(|| user_id.to_string()),
            username: user.username,
            roles: user.roles,
        })
    }
}

/// 관리자 수정 요청을 `$set` 문서로 변환합니다
pub(crate) fn build_user_update(request: &UpdateUserRequest, password_hash: Option<String>) -> Result<Document, AppError> {
    let mut update = doc! { "updated_at": DateTime::now() };

    if let Some(username) = &request.username {
        update.insert("username", username.trim());
    }
    if let Some(email) = &request.email {
        update.insert("email", email.trim().to_lowercase());
    }
    if let Some(hash) = password_hash {
        update.insert("password_hash", hash);
    }
    if let Some(roles) = &request.roles {
        if roles.is_empty() {
            return Err(AppError::ValidationError("역할은 최소 하나 이상이어야 합니다".to_string()));
        }
        let roles = Role::parse_all(roles).map_err(AppError::ValidationError)?;
        let roles: Vec<&str> = roles.iter().map(Role::as_str).collect();
        update.insert("roles", roles);
    }

    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_update_sets_only_given_fields() {
        let request = UpdateUserRequest {
            email: Some(" New@Example.com ".to_string()),
            ..Default::default()
        };
        let update = build_user_update(&request, None).unwrap();

        assert_eq!(update.get_str("email").unwrap(), "new@example.com");
        assert!(update.get("username").is_none());
        assert!(update.get("password_hash").is_none());
        assert!(update.get("updated_at").is_some());
    }

    #[test]
    fn test_build_user_update_normalizes_roles() {
        let request = UpdateUserRequest {
            roles: Some(vec!["author".to_string(), "admin".to_string(), "author".to_string()]),
            ..Default::default()
        };
        let update = build_user_update(&request, Some("hash".to_string())).unwrap();

        let roles: Vec<&str> = update
            .get_array("roles")
            .unwrap()
            .iter()
            .filter_map(|r| r.as_str())
            .collect();
        assert_eq!(roles, vec!["author", "admin"]);
        assert_eq!(update.get_str("password_hash").unwrap(), "hash");
    }

    #[test]
    fn test_build_user_update_rejects_bad_roles() {
        let empty = UpdateUserRequest { roles: Some(vec![]), ..Default::default() };
        assert!(matches!(build_user_update(&empty, None), Err(AppError::ValidationError(_))));

        let unknown = UpdateUserRequest { roles: Some(vec!["root".to_string()]), ..Default::default() };
        assert!(matches!(build_user_update(&unknown, None), Err(AppError::ValidationError(_))));
    }
}
