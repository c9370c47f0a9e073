//! # Application Error Handling System
//!
//! 도서 판매/대여 백엔드를 위한 통합 에러 처리 시스템입니다.
//! 모든 계층(리포지토리, 서비스, 핸들러)은 [`AppError`]를 반환하며,
//! Actix-Web의 `ResponseError` 구현을 통해 일관된 JSON 에러 응답으로 변환됩니다.
//!
//! ## 상태 코드 매핑
//!
//! | 변형 | HTTP 상태 |
//! |------|-----------|
//! | `ValidationError` | 400 Bad Request |
//! | `AuthenticationError` | 401 Unauthorized |
//! | `AuthorizationError` | 403 Forbidden |
//! | `RentalExpired` | 403 Forbidden |
//! | `NotFound` | 404 Not Found |
//! | `ConflictError` | 409 Conflict |
//! | 그 외 | 500 Internal Server Error |
//!
//! ## 응답 형식
//!
//! ```json
//! { "error": "Not found: 도서를 찾을 수 없습니다" }
//! ```
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use crate::core::errors::AppError;
//!
//! let book = self.book_repo
//!     .find_by_id(book_id)
//!     .await?
//!     .ok_or_else(|| AppError::NotFound("도서를 찾을 수 없습니다".to_string()))?;
//! ```

use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// `thiserror`로 `Error` trait을 구현하고 `actix_web::ResponseError`를 구현하여
/// 핸들러에서 `?` 연산자만으로 HTTP 응답으로 변환됩니다.
///
/// ## 에러 카테고리
///
/// ### 1. 인프라 계층 에러
/// - `DatabaseError`: MongoDB 연산 실패
/// - `RedisError`: Redis 캐시 연산 실패
/// - `ExternalServiceError`: 결제 프로바이더 등 외부 API 호출 실패
///
/// ### 2. 비즈니스 계층 에러
/// - `ValidationError`: 입력값 검증 실패
/// - `ConflictError`: 중복 생성 등 비즈니스 규칙 위반
/// - `NotFound`: 요청된 리소스가 존재하지 않음
///
/// ### 3. 보안 계층 에러
/// - `AuthenticationError`: 토큰 누락/만료, 로그인 실패
/// - `AuthorizationError`: 역할 또는 소유권 부족, 구매 이력 없음
/// - `RentalExpired`: 대여 기간이 지난 도서 콘텐츠 접근
///
/// ### 4. 시스템 계층 에러
/// - `InternalError`: 예상하지 못한 시스템 오류
#[derive(Error, Debug)]
pub enum AppError {
    /// MongoDB 연산 중 발생한 오류 (500)
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Redis 캐시 연산 오류 (500)
    ///
    /// 리포지토리는 캐시 실패를 조용히 무시하므로 실제로 응답까지
    /// 전파되는 경우는 드뭅니다.
    #[error("Redis error: {0}")]
    RedisError(String),

    /// 입력값 검증 실패 (400)
    ///
    /// # 예제
    /// ```rust,ignore
    /// payload.validate()
    ///     .map_err(|e| AppError::ValidationError(e.to_string()))?;
    /// ```
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 리소스 없음 (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// 중복/충돌 (409)
    ///
    /// 이미 사용 중인 사용자명이나 이메일로 가입을 시도할 때 발생합니다.
    #[error("Conflict error: {0}")]
    ConflictError(String),

    /// 인증 실패 (401)
    ///
    /// # 발생 시나리오
    /// - Authorization 헤더 누락 또는 Bearer 형식 아님
    /// - 만료되었거나 서명이 잘못된 JWT
    /// - 토큰의 사용자가 더 이상 존재하지 않음
    /// - 잘못된 사용자명/비밀번호
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// 권한 부족 (403)
    ///
    /// # 발생 시나리오
    /// - 관리자 전용 API에 일반 사용자 접근
    /// - 다른 사용자의 도서나 댓글 수정 시도
    /// - 구매/대여 이력이 없는 도서 콘텐츠 접근
    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 대여 기간 만료 (403)
    ///
    /// `AuthorizationError`와 같은 상태 코드를 쓰지만 "구매한 적 없음"과
    /// 구분되도록 별도 변형으로 분리되어 있습니다.
    #[error("Rental expired: {0}")]
    RentalExpired(String),

    /// 외부 서비스 호출 실패 (500)
    ///
    /// # 예제
    /// ```rust,ignore
    /// let response = self.http_client.post(&url).send().await
    ///     .map_err(|e| AppError::ExternalServiceError(
    ///         format!("결제 프로바이더 호출 실패: {}", e)
    ///     ))?;
    /// ```
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 예상하지 못한 내부 오류 (500)
    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "error": self.to_string()
            }))
    }

    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) | AppError::RentalExpired(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 애플리케이션 결과 타입 별칭
pub type AppResult<T> = Result<T, AppError>;

/// 외부 에러에 컨텍스트를 붙여 `AppError::InternalError`로 변환하는 확장 trait
///
/// ```rust,ignore
/// let json = serde_json::to_string(&payload)
///     .context("결제 메타데이터 직렬화 실패")?;
/// ```
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }

    fn with_context<F>(self, f: F) -> AppResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", f(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("rating must be between 1 and 5".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("Book not found".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_authentication_error_response() {
        let error = AppError::AuthenticationError("Invalid token".to_string());
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_authorization_and_rental_expired_share_forbidden() {
        let denied = AppError::AuthorizationError("Access denied".to_string());
        let expired = AppError::RentalExpired("Rental period has expired".to_string());

        assert_eq!(denied.error_response().status(), StatusCode::FORBIDDEN);
        assert_eq!(expired.error_response().status(), StatusCode::FORBIDDEN);
        assert_ne!(denied.to_string(), expired.to_string());
    }

    #[test]
    fn test_conflict_error_response() {
        let error = AppError::ConflictError("Username is already taken".to_string());

        assert_eq!(error.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_infrastructure_errors_are_internal() {
        let errors = [
            AppError::DatabaseError("timeout".to_string()),
            AppError::RedisError("down".to_string()),
            AppError::ExternalServiceError("checkout unavailable".to_string()),
            AppError::InternalError("Something went wrong".to_string()),
        ];

        for error in errors {
            assert_eq!(error.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        assert!(app_result.is_err());
        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }

    #[test]
    fn test_error_with_context_is_lazy() {
        let ok: Result<u8, &str> = Ok(3);
        let value = ok.with_context(|| panic!("must not be evaluated")).unwrap();

        assert_eq!(value, 3);
    }
}
