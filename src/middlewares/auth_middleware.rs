//! JWT 인증 미들웨어
//!
//! Bearer 토큰을 검증하고 토큰 주체를 데이터베이스에서 다시 조회하여
//! [`AuthenticatedUser`](crate::domain::models::auth::AuthenticatedUser)를 요청 확장에 저장합니다.
//! 삭제된 사용자의 토큰은 서명이 유효해도 거부됩니다.

use std::future::{ready, Ready};
use std::rc::Rc;

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, Result,
    body::EitherBody,
};
use crate::config::Role;
use crate::domain::models::auth::{AuthMode, RequiredRole};
use crate::middlewares::auth_inner::AuthMiddlewareService;

/// JWT 인증 미들웨어
pub struct AuthMiddleware {
    /// 인증 모드 (Required/Optional)
    mode: AuthMode,
    /// 접근에 필요한 역할 (선택사항)
    required_role: Option<RequiredRole>,
}

impl AuthMiddleware {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            required_role: None,
        }
    }

    pub fn new_with_role(mode: AuthMode, required_role: RequiredRole) -> Self {
        Self {
            mode,
            required_role: Some(required_role),
        }
    }

    /// 필수 인증 (토큰 없으면 401)
    pub fn required() -> Self {
        Self::new(AuthMode::Required)
    }

    /// 선택적 인증 (토큰이 있으면 검증, 없거나 무효하면 익명으로 진행)
    pub fn optional() -> Self {
        Self::new(AuthMode::Optional)
    }

    /// 특정 역할 요구 (없으면 403)
    pub fn required_with_role(role: Role) -> Self {
        Self::new_with_role(AuthMode::Required, RequiredRole::Single(role))
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            mode: self.mode.clone(),
            required_role: self.required_role.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    async fn protected() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn test_missing_header_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("/protected")
                    .wrap(AuthMiddleware::required())
                    .route("", web::get().to(protected)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/protected").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "authentication_required");
    }

    #[actix_web::test]
    async fn test_malformed_header_is_unauthorized() {
        let app = test::init_service(
            App::new().service(
                web::scope("/protected")
                    .wrap(AuthMiddleware::required_with_role(Role::Admin))
                    .route("", web::get().to(protected)),
            ),
        )
        .await;

        for header in ["Token abc", "Bearer ", "bearer abc"] {
            let req = test::TestRequest::get()
                .uri("/protected")
                .insert_header(("Authorization", header))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header: {}", header);
        }
    }

    #[actix_web::test]
    async fn test_optional_without_header_passes() {
        let app = test::init_service(
            App::new().service(
                web::scope("/open")
                    .wrap(AuthMiddleware::optional())
                    .route("", web::get().to(protected)),
            ),
        )
        .await;

        let req = test::TestRequest::get().uri("/open").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
