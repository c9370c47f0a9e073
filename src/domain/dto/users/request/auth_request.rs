//! 회원가입 / 로그인 요청 DTO

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};
use crate::utils::string_utils::is_valid_username;

/// 회원가입 요청
///
/// ```json
/// {
///   "username": "john_doe",
///   "email": "john@example.com",
///   "password": "correct-horse",
///   "roles": ["author"]
/// }
/// ```
///
/// `roles`가 없거나 비어 있으면 `reader`가 부여됩니다.
/// 자기 가입으로 `admin`을 요청하면 서비스 계층에서 403으로 거부됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 30, message = "사용자명은 3-30자 사이여야 합니다"))]
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(email(message = "유효한 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[validate(length(min = 8, message = "비밀번호는 최소 8자 이상이어야 합니다"))]
    pub password: String,

    #[serde(default)]
    pub roles: Option<Vec<String>>,
}

/// 로그인 요청
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "사용자명은 필수입니다"))]
    pub username: String,

    #[validate(length(min = 1, message = "비밀번호는 필수입니다"))]
    pub password: String,
}

/// 사용자명 문자셋 검증 (영문, 숫자, 언더스코어)
pub(crate) fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !is_valid_username(username) {
        return Err(ValidationError::new("invalid_username")
            .with_message("사용자명은 영문, 숫자, 언더스코어(_)만 사용할 수 있습니다".into()));
    }
    Ok(())
}
