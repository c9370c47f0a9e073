//! MongoDB 연결 관리
//!
//! 애플리케이션 전체에서 공유하는 MongoDB 클라이언트 래퍼입니다.
//! `main`에서 한 번 생성되어 `ServiceLocator::set()`으로 등록되고,
//! 모든 리포지토리에 `Arc<Database>`로 주입됩니다.
//!
//! # Environment Variables
//!
//! * `MONGODB_URI` - 연결 문자열 (기본값: mongodb://localhost:27017)
//! * `DATABASE_NAME` - 데이터베이스 이름 (기본값: library_store_dev)
//!
//! # Collections
//!
//! | 컬렉션 | 엔티티 |
//! |--------|--------|
//! | `users` | 사용자, 소장/대여 이력 |
//! | `books` | 도서 카탈로그, 구매자/대여자 이력 |
//! | `comments` | 댓글과 평점 |
//! | `payments` | 결제 기록 |

use mongodb::{Client, options::ClientOptions};
use std::env;
use log::info;

#[derive(Clone)]
pub struct Database {
    client: Client,
    database_name: String,
}

impl Database {
    /// 환경변수로 연결하고 `ping`으로 가용성을 확인합니다
    ///
    /// # Errors
    ///
    /// * 연결 문자열 파싱 실패
    /// * 서버 응답 없음
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let mongodb_uri = env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let database_name = env::var("DATABASE_NAME")
            .unwrap_or_else(|_| "library_store_dev".to_string());

        let mut client_options = ClientOptions::parse(&mongodb_uri).await?;
        client_options.app_name = Some("library_store".to_string());

        let client = Client::with_options(client_options)?;

        client
            .database(&database_name)
            .run_command(mongodb::bson::doc! { "ping": 1 })
            .await?;

        info!("✅ MongoDB 연결 성공: {}", database_name);

        Ok(Self {
            client,
            database_name,
        })
    }

    pub fn get_database(&self) -> mongodb::Database {
        self.client.database(&self.database_name)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn database_name(&self) -> &str {
        &self.database_name
    }
}
