//! 도서 판매/대여 서비스 메인 애플리케이션
//!
//! MongoDB, Redis 연결과 서비스 레지스트리를 초기화한 뒤 Actix-web HTTP 서버를 구동합니다.

use std::sync::Arc;
use actix_cors::Cors;
use actix_web::http::header;
use actix_web::{middleware, App, HttpServer};
use actix_governor::{Governor, GovernorConfigBuilder};
use dotenv::dotenv;
use env_logger::Env;
use log::{error, info};
use library_store_backend::caching::redis::RedisClient;
use library_store_backend::config::{CheckoutConfig, ServerConfig};
use library_store_backend::core::registry::ServiceLocator;
use library_store_backend::db::Database;
use library_store_backend::repositories::{
    books::BookRepository, comments::CommentRepository, payments::PaymentRepository, users::UserRepository,
};
use library_store_backend::routes::{configure_all_routes, ENDPOINT_SUMMARY};
use library_store_backend::utils::display_terminal::print_server_banner;

/// Rate Limiting 설정 구조체
#[derive(Debug)]
struct RateLimitConfig {
    per_second: u64,
    burst_size: u32,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 도서 판매/대여 서비스 시작중...");

    let (database, redis_client) = initialize_data_stores().await;

    ServiceLocator::set(database);
    ServiceLocator::set(redis_client);

    ServiceLocator::initialize_all()
        .await
        .expect("서비스 초기화 실패");

    ensure_indexes().await;

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    start_http_server().await
}

/// HTTP 서버를 구성하고 실행합니다
///
/// 미들웨어 순서: Rate Limiting → CORS → 접근 로그 → 경로 정규화
async fn start_http_server() -> std::io::Result<()> {
    let bind_address = ServerConfig::bind_address();

    print_server_banner(&bind_address, ENDPOINT_SUMMARY);

    let rate_limit_config = load_rate_limit_config();
    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(rate_limit_config.per_second)
        .burst_size(rate_limit_config.burst_size)
        .use_headers()
        .finish()
        .expect("Rate Limiting 설정 실패");

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        rate_limit_config.per_second,
        rate_limit_config.burst_size
    );

    let client_url = CheckoutConfig::client_url();

    HttpServer::new(move || {
        let cors = configure_cors(&client_url);

        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
        .bind(&bind_address)?
        .workers(4)
        .run()
        .await
}

/// 환경별 설정 파일을 로드합니다
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => error!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => error!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// `RUST_LOG` 기반 로깅 초기화 (기본값: "info,actix_web=debug")
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info,actix_web=debug"));
}

/// MongoDB와 Redis 연결을 초기화합니다
///
/// # Panics
///
/// * MongoDB 연결 실패 시
/// * Redis 연결 실패 시
async fn initialize_data_stores() -> (Arc<Database>, Arc<RedisClient>) {
    info!("📡 데이터베이스 연결 중...");

    let database = Arc::new(
        Database::new()
            .await
            .expect("데이터베이스 연결 실패")
    );

    let redis_client = Arc::new(
        RedisClient::new()
            .await
            .expect("Redis 연결 실패")
    );

    (database, redis_client)
}

/// 컬렉션 인덱스 생성
///
/// 결제 컬렉션의 유니크 인덱스는 중복 확정 방지에 필요하므로 실패 시 종료합니다.
async fn ensure_indexes() {
    info!("🗂️ 인덱스 확인 중...");

    if let Err(e) = ServiceLocator::get::<UserRepository>().create_indexes().await {
        error!("users 인덱스 생성 실패: {}", e);
    }
    if let Err(e) = ServiceLocator::get::<BookRepository>().create_indexes().await {
        error!("books 인덱스 생성 실패: {}", e);
    }
    if let Err(e) = ServiceLocator::get::<CommentRepository>().create_indexes().await {
        error!("comments 인덱스 생성 실패: {}", e);
    }

    ServiceLocator::get::<PaymentRepository>()
        .create_indexes()
        .await
        .expect("payments 인덱스 생성 실패");
}

/// CORS 설정
///
/// `CLIENT_URL`의 SPA 주소와 로컬 개발 주소를 허용합니다.
fn configure_cors(client_url: &str) -> Cors {
    let mut cors = Cors::default()
        .allowed_origin("http://localhost:3000")
        .allowed_origin("http://127.0.0.1:3000")
        .allowed_origin("http://localhost:8080")
        .allowed_origin("http://127.0.0.1:8080");

    if !client_url.contains("localhost:3000") && !client_url.contains("127.0.0.1:3000") {
        cors = cors.allowed_origin(client_url);
    }

    cors
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .supports_credentials()
        .max_age(3600)
}

/// 환경변수에서 Rate Limiting 설정을 로드합니다
///
/// * `RATE_LIMIT_PER_SECOND` - 초당 허용 요청 수 (기본값: 100)
/// * `RATE_LIMIT_BURST_SIZE` - 버스트 허용량 (기본값: 200)
fn load_rate_limit_config() -> RateLimitConfig {
    let per_second = std::env::var("RATE_LIMIT_PER_SECOND")
        .unwrap_or_else(|_| "100".to_string())
        .parse::<u64>()
        .unwrap_or_else(|e| {
            error!("RATE_LIMIT_PER_SECOND 파싱 실패: {}. 기본값 100 사용", e);
            100
        });

    let burst_size = std::env::var("RATE_LIMIT_BURST_SIZE")
        .unwrap_or_else(|_| "200".to_string())
        .parse::<u32>()
        .unwrap_or_else(|e| {
            error!("RATE_LIMIT_BURST_SIZE 파싱 실패: {}. 기본값 200 사용", e);
            200
        });

    let config = RateLimitConfig {
        per_second,
        burst_size,
    };

    info!("Rate Limiting 설정 로드됨: {:?}", config);
    config
}
