//! API 라우트 설정 모듈
//!
//! 모든 API는 `/api/v1` 아래에 있습니다.
//!
//! | 스코프 | 인증 |
//! |--------|------|
//! | `/auth` | 선택 (`/me`는 추출자로 필수) |
//! | `/users` | `admin` 역할 |
//! | `/books` | 선택 (쓰기/열람은 추출자로 필수) |
//! | `/comments` | 선택 (수정/삭제는 추출자로 필수) |
//! | `/payments` | 필수 |
//!
//! ```rust,ignore
//! use actix_web::App;
//!
//! let app = App::new().configure(configure_all_routes);
//! ```

use crate::config::Role;
use crate::handlers;
use crate::middlewares::AuthMiddleware;
use actix_web::web;
use serde_json::json;

/// 기동 배너에 표시할 대표 엔드포인트
pub const ENDPOINT_SUMMARY: &[(&str, &str)] = &[
    ("GET  /health", "헬스체크"),
    ("POST /api/v1/auth/register", "회원가입"),
    ("POST /api/v1/auth/login", "로그인"),
    ("GET  /api/v1/books", "카탈로그"),
    ("GET  /api/v1/books/{id}/content", "콘텐츠 열람"),
    ("POST /api/v1/payments/checkout", "결제 세션 생성"),
    ("POST /api/v1/payments/confirm", "결제 확정"),
];

/// 모든 라우트를 설정합니다
pub fn configure_all_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check);

    cfg.service(
        web::scope("/api/v1")
            .configure(configure_auth_routes)
            .configure(configure_user_routes)
            .configure(configure_book_routes)
            .configure(configure_comment_routes)
            .configure(configure_payment_routes)
    );
}

fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .wrap(AuthMiddleware::optional())
            .service(handlers::auth::register)
            .service(handlers::auth::login)
            .service(handlers::auth::get_current_user)
    );
}

/// 관리자 전용 사용자 관리
fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .wrap(AuthMiddleware::required_with_role(Role::Admin))
            .service(handlers::users::list_users)
            .service(handlers::users::create_user)
            .service(handlers::users::get_user)
            .service(handlers::users::update_user)
            .service(handlers::users::delete_user)
    );
}

/// 도서 라우트
///
/// 고정 경로(`/owned`, `/author/{id}`)를 `/{book_id}`보다 먼저 등록합니다.
fn configure_book_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/books")
            .wrap(AuthMiddleware::optional())
            .service(handlers::books::list_books)
            .service(handlers::books::create_book)
            .service(handlers::books::owned_books)
            .service(handlers::books::books_by_author)
            .service(handlers::books::get_book_content)
            .service(handlers::books::get_book_comments)
            .service(handlers::books::create_book_comment)
            .service(handlers::books::get_book)
            .service(handlers::books::update_book)
            .service(handlers::books::delete_book)
    );
}

fn configure_comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comments")
            .wrap(AuthMiddleware::optional())
            .service(handlers::comments::list_comments)
            .service(handlers::comments::comments_by_author)
            .service(handlers::comments::get_comment)
            .service(handlers::comments::update_comment)
            .service(handlers::comments::delete_comment)
    );
}

fn configure_payment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .wrap(AuthMiddleware::required())
            .service(handlers::payments::create_checkout_session)
            .service(handlers::payments::confirm_payment)
            .service(handlers::payments::payment_history)
    );
}

/// 헬스체크
///
/// ```json
/// {
///   "status": "healthy",
///   "service": "library_store_backend",
///   "version": "0.1.0",
///   "timestamp": "2024-01-01T00:00:00Z"
/// }
/// ```
#[actix_web::get("/health")]
async fn health_check() -> actix_web::HttpResponse {
    actix_web::HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "features": {
            "database": "MongoDB",
            "cache": "Redis",
            "dependency_injection": "Singleton Macro"
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_protected_scopes_reject_anonymous() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        for (method, uri) in [
            (actix_web::http::Method::GET, "/api/v1/users"),
            (actix_web::http::Method::GET, "/api/v1/payments/history"),
            (actix_web::http::Method::POST, "/api/v1/payments/confirm"),
        ] {
            let req = test::TestRequest::default().method(method).uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[actix_web::test]
    async fn test_extractor_guarded_routes_reject_anonymous() {
        let app = test::init_service(App::new().configure(configure_all_routes)).await;

        for uri in ["/api/v1/auth/me", "/api/v1/books/owned"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }
}
