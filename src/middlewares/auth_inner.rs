//! AuthMiddleware 인증 로직의 핵심적인 기능
use std::rc::Rc;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{Error, HttpMessage, HttpResponse};
use futures_util::future::LocalBoxFuture;
use crate::core::errors::AppError;
use crate::domain::models::auth::{AuthMode, AuthenticatedUser, RequiredRole};
use crate::services::auth::{token_service, TokenService};
use crate::services::users::UserService;

/// 실제 인증 로직을 수행하는 서비스
pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
    pub required_role: Option<RequiredRole>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode.clone();
        let required_role = self.required_role.clone();

        Box::pin(async move {
            let auth_result = authenticate_request(&req).await;

            match resolve_access(&mode, required_role.as_ref(), auth_result) {
                AccessOutcome::Proceed(Some(user)) => {
                    log::debug!("인증 성공: 사용자 {}", user.username);
                    req.extensions_mut().insert(user);
                },
                AccessOutcome::Proceed(None) => {
                    log::debug!("선택적 인증: 인증 정보 없음, 익명으로 진행");
                },
                AccessOutcome::Unauthorized(message) => {
                    log::warn!("인증 실패: {} {} - {}", req.method(), req.path(), message);
                    return Ok(reject(req, HttpResponse::Unauthorized(), "authentication_required", &message));
                },
                AccessOutcome::Forbidden => {
                    log::warn!("권한 부족: {} {}, 필요 권한: {:?}", req.method(), req.path(), required_role);
                    return Ok(reject(req, HttpResponse::Forbidden(), "insufficient_permissions", "접근 권한이 부족합니다"));
                },
                AccessOutcome::Failed(err) => {
                    log::error!("❌ 인증 처리 중 오류: {} {} - {}", req.method(), req.path(), err);
                    return Ok(req.error_response(err).map_into_right_body());
                },
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// 인증 결과에 따른 처리 방향
#[derive(Debug)]
pub(crate) enum AccessOutcome {
    Proceed(Option<AuthenticatedUser>),
    Unauthorized(String),
    Forbidden,
    /// 저장소 장애 등 자격 증명과 무관한 오류 (상태 코드는 `AppError`를 따름)
    Failed(AppError),
}

/// `AuthenticationError`만 자격 증명 문제로 보고, 나머지 오류는 그대로 전달합니다
pub(crate) fn resolve_access(
    mode: &AuthMode,
    required_role: Option<&RequiredRole>,
    auth_result: Result<AuthenticatedUser, AppError>,
) -> AccessOutcome {
    match (mode, auth_result) {
        (_, Err(AppError::AuthenticationError(message))) => match mode {
            AuthMode::Required => AccessOutcome::Unauthorized(message),
            AuthMode::Optional => AccessOutcome::Proceed(None),
        },
        (_, Err(err)) => AccessOutcome::Failed(err),
        (AuthMode::Required, Ok(user)) => match required_role {
            Some(required) if !required.is_satisfied(&user.roles) => AccessOutcome::Forbidden,
            _ => AccessOutcome::Proceed(Some(user)),
        },
        // 선택적 인증에서 권한이 부족하면 익명으로 진행
        (AuthMode::Optional, Ok(user)) => {
            let allowed = required_role.is_none_or(|required| required.is_satisfied(&user.roles));
            AccessOutcome::Proceed(allowed.then_some(user))
        },
    }
}

fn reject<B>(
    req: ServiceRequest,
    mut builder: actix_web::HttpResponseBuilder,
    error: &str,
    message: &str,
) -> ServiceResponse<EitherBody<B>> {
    let response = builder.json(serde_json::json!({
        "error": error,
        "message": message,
    }));
    let (req, _) = req.into_parts();
    ServiceResponse::new(req, response).map_into_right_body()
}

/// 토큰 검증 후 주체를 다시 조회
async fn authenticate_request(req: &ServiceRequest) -> Result<AuthenticatedUser, AppError> {
    let auth_header = req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::AuthenticationError("Authorization 헤더가 없습니다".to_string()))?;

    let token = token_service::extract_bearer_token(auth_header)?;
    let claims = TokenService::instance().verify_token(token)?;

    UserService::instance().load_principal(&claims.sub).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Role;

    fn reader() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "65f0c0ffee0000000000abcd".to_string(),
            username: "reader".to_string(),
            roles: vec![Role::Reader],
        }
    }

    fn credential_error() -> Result<AuthenticatedUser, AppError> {
        Err(AppError::AuthenticationError("토큰이 만료되었습니다".to_string()))
    }

    fn store_error() -> Result<AuthenticatedUser, AppError> {
        Err(AppError::DatabaseError("server selection timeout".to_string()))
    }

    #[test]
    fn test_credential_errors() {
        assert!(matches!(
            resolve_access(&AuthMode::Required, None, credential_error()),
            AccessOutcome::Unauthorized(msg) if msg.contains("만료")
        ));
        assert!(matches!(
            resolve_access(&AuthMode::Optional, None, credential_error()),
            AccessOutcome::Proceed(None)
        ));
    }

    #[test]
    fn test_store_errors_are_not_treated_as_anonymous() {
        for mode in [AuthMode::Required, AuthMode::Optional] {
            assert!(matches!(
                resolve_access(&mode, None, store_error()),
                AccessOutcome::Failed(AppError::DatabaseError(_))
            ));
        }
    }

    #[test]
    fn test_role_requirements() {
        let admin_only = RequiredRole::Single(Role::Admin);

        assert!(matches!(
            resolve_access(&AuthMode::Required, Some(&admin_only), Ok(reader())),
            AccessOutcome::Forbidden
        ));
        assert!(matches!(
            resolve_access(&AuthMode::Optional, Some(&admin_only), Ok(reader())),
            AccessOutcome::Proceed(None)
        ));
        assert!(matches!(
            resolve_access(&AuthMode::Required, None, Ok(reader())),
            AccessOutcome::Proceed(Some(user)) if user.username == "reader"
        ));
    }
}
