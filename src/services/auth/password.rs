//! bcrypt 비밀번호 해싱

use bcrypt::{hash, verify};
use crate::config::PasswordConfig;
use crate::errors::errors::AppError;

/// 환경별 cost로 비밀번호를 해싱합니다
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash_password_with_cost(password, PasswordConfig::bcrypt_cost())
}

pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AppError> {
    let start = std::time::Instant::now();
    let hashed = hash(password, cost)
        .map_err(|e| AppError::InternalError(format!("비밀번호 해싱 실패: {}", e)))?;
    log::debug!("Password hashing took: {:?}", start.elapsed());
    Ok(hashed)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    verify(password, password_hash)
        .map_err(|e| AppError::InternalError(format!("비밀번호 검증 실패: {}", e)))
}
