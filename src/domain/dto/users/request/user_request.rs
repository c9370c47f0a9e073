//! 관리자용 사용자 관리 요청 DTO

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use super::auth_request::validate_username;

/// 관리자 사용자 생성 요청 (역할 명시 필수)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 30, message = "사용자명은 3-30자 사이여야 합니다"))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub password: String,

    #[validate(length(min = 1, message = "역할은 최소 하나 이상이어야 합니다"))]
    pub roles: Vec<String>,
}

/// 관리자 사용자 수정 요청
///
/// 모든 필드가 선택이지만 최소 하나는 있어야 합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_has_changes"))]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 30, message = "사용자명은 3-30자 사이여야 합니다"))]
    #[validate(custom(function = "validate_username"))]
    pub username: Option<String>,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: Option<String>,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub password: Option<String>,

    #[validate(length(min = 1, message = "역할은 최소 하나 이상이어야 합니다"))]
    pub roles: Option<Vec<String>>,
}

fn validate_has_changes(req: &UpdateUserRequest) -> Result<(), ValidationError> {
    if req.username.is_none() && req.email.is_none() && req.password.is_none() && req.roles.is_none() {
        return Err(ValidationError::new("empty_update")
            .with_message("수정할 필드가 하나 이상 필요합니다".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_requires_roles() {
        let req = CreateUserRequest {
            username: "editor".to_string(),
            email: "editor@example.com".to_string(),
            password: "password1".to_string(),
            roles: vec![],
        };
        assert!(req.validate().is_err());

        let req = CreateUserRequest { roles: vec!["author".to_string()], ..req };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_user_requires_a_field() {
        assert!(UpdateUserRequest::default().validate().is_err());

        let req = UpdateUserRequest { email: Some("new@example.com".to_string()), ..Default::default() };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_update_user_rejects_empty_roles() {
        let req = UpdateUserRequest { roles: Some(vec![]), ..Default::default() };
        assert!(req.validate().is_err());
    }
}
