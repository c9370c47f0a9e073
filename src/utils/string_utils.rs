//! 문자열 검증 및 정리 유틸리티
//!
//! 요청 DTO의 `validator` 규칙으로 표현하기 어려운 정리 작업(trim, 빈 문자열 → None)과
//! 사용자명 문자셋 검사를 담당합니다.

use serde::Deserialize;
use crate::core::errors::AppError;

/// 앞뒤 공백을 제거하고 비어 있으면 `ValidationError`를 반환합니다
///
/// ```rust,ignore
/// let title = validate_required_string("  Dune  ", "title")?; // "Dune"
/// ```
pub fn validate_required_string(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(
            format!("{}은(는) 필수입니다", field_name)
        ));
    }
    Ok(trimmed.to_string())
}

/// 공백뿐인 문자열은 `None`으로 정리합니다
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// 사용자명 문자셋 검사 (알파벳, 숫자, 언더스코어)
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty() && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// serde `deserialize_with` 용 선택 문자열 정리기
pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(opt))
}
