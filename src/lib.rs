//! 도서 판매/대여 서비스 백엔드
//!
//! 도서 카탈로그, 구매와 기간제 대여, 리뷰, 호스팅 결제를 제공하는 REST API입니다.
//! 도서 콘텐츠는 관리자, 구매자, 대여 기간 내의 대여자에게만 열립니다.
//!
//! # Features
//!
//! - **JWT 인증**: HS256 액세스 토큰, 요청마다 사용자 재조회
//! - **역할**: `reader`, `author`, `admin`
//! - **카탈로그**: 도서 CRUD, 페이지네이션, 저자별 조회
//! - **콘텐츠 권한**: 구매/대여 이력 기반 접근 판정
//! - **결제**: 호스팅 Checkout 세션 생성과 멱등 확정
//! - **싱글톤 DI**: 매크로 기반 자동 의존성 주입
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트 + AuthMiddleware
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청 검증/응답
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 비즈니스 로직, 접근 판정, 결제 게이트웨이
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스, 읽기 캐시
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use library_store_backend::services::books::BookService;
//!
//! let book_service = BookService::instance();
//! let content = book_service.get_book_content(&user, &book_id, &query).await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod errors;
pub mod middlewares;
