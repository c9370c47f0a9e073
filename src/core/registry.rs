//! # Service Registry - 싱글톤 의존성 주입 시스템
//!
//! `#[service]` / `#[repository]` 매크로가 생성하는 등록 정보를 `inventory`로 수집하고,
//! 타입 기반으로 싱글톤 인스턴스를 해결하는 전역 컨테이너입니다.
//!
//! ## 구성 요소
//!
//! - [`ServiceLocator`]: `TypeId` → `Arc<dyn Any>` 인스턴스 저장소
//! - [`ServiceRegistration`] / [`RepositoryRegistration`]: 컴파일 타임 수집 대상
//! - [`Service`] / [`Repository`]: 매크로가 구현하는 생명주기 trait
//!
//! ## 동작 방식
//!
//! ```text
//! 1. 컴파일 타임
//!    ├─ #[repository(name = "book", collection = "books")] → RepositoryRegistration
//!    ├─ #[service(name = "book")] → ServiceRegistration
//!    └─ inventory::collect! 로 전역 수집
//!
//! 2. 애플리케이션 시작
//!    ├─ ServiceLocator::set(Arc<Database>)
//!    ├─ ServiceLocator::set(Arc<RedisClient>)
//!    └─ ServiceLocator::initialize_all() → 리포지토리 → 서비스 순서로 생성
//!
//! 3. 의존성 해결
//!    └─ BookService::instance() → Arc<BookRepository> 필드 → ServiceLocator::get()
//! ```
//!
//! ## 이름 규칙
//!
//! 타입 이름에서 `Repository` / `Service` 접미사를 떼고 소문자로 바꾼 값이
//! 등록 이름과 일치해야 합니다. (`BookRepository` → `book`, `PaymentService` → `payment`)
//!
//! ## 트러블슈팅
//!
//! ```text
//! panic: Circular dependency detected: BookService is already being initialized
//! ```
//! 서비스 간 의존성을 단방향으로 재구성해야 합니다.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use crate::utils::display_terminal::{
    print_boxed_title, print_cache_initialized, print_final_summary, print_step_complete,
    print_step_start, print_sub_task,
};

/// 비즈니스 로직 서비스의 생명주기 trait (`#[service]` 매크로가 구현)
#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// 데이터 액세스 리포지토리의 생명주기 trait (`#[repository]` 매크로가 구현)
#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    fn collection_name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// 서비스 등록 정보
///
/// `constructor`는 `Box<Arc<T>>`를 `Box<dyn Any>`로 감싸서 반환해야 합니다.
pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

/// 리포지토리 등록 정보
pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

static SERVICE_NAME_CACHE: Lazy<HashMap<String, &'static ServiceRegistration>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<ServiceRegistration>()
        .map(|registration| (extract_clean_name_static(registration.name), registration))
        .collect();

    print_cache_initialized("Service", cache.len());
    cache
});

static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, &'static RepositoryRegistration>> = Lazy::new(|| {
    let cache: HashMap<_, _> = inventory::iter::<RepositoryRegistration>()
        .map(|registration| (extract_clean_name_static(registration.name), registration))
        .collect();

    print_cache_initialized("Repository", cache.len());
    cache
});

/// 등록 이름에서 `_service` / `_repository` 접미사 제거
fn extract_clean_name_static(name: &str) -> String {
    name.strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .unwrap_or(name)
        .to_string()
}

/// `crate::services::books::BookService` → `BookService`
fn extract_clean_type_name(type_name: &str) -> &str {
    match type_name.rfind("::") {
        Some(pos) => &type_name[pos + 2..],
        None => type_name,
    }
}

/// 타입 이름을 (종류, 엔티티 이름)으로 분해
///
/// `BookRepository` → `Some(("Repository", "book"))`
fn lookup_key(clean_type_name: &str) -> Option<(&'static str, String)> {
    for kind in ["Repository", "Service"] {
        if let Some(entity) = clean_type_name.strip_suffix(kind) {
            return Some((kind, entity.to_lowercase()));
        }
    }
    None
}

/// 전역 서비스 로케이터
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    initializing: RwLock<HashSet<TypeId>>,
}

impl ServiceLocator {
    fn new() -> Self {
        Self {
            instances: RwLock::new(HashMap::new()),
            initializing: RwLock::new(HashSet::new()),
        }
    }

    /// 타입에 해당하는 싱글톤 인스턴스를 반환합니다
    ///
    /// 이미 생성된 인스턴스가 있으면 그대로 반환하고, 없으면 등록된 생성자로
    /// 만들어 캐시합니다.
    ///
    /// # Panics
    ///
    /// * 등록되지 않은 타입
    /// * 순환 의존성
    /// * 생성자가 반환한 타입 불일치
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        if let Some(instance) = Self::try_get::<T>() {
            return instance;
        }

        let type_id = TypeId::of::<T>();
        let type_name = std::any::type_name::<T>();

        {
            let mut initializing = LOCATOR.initializing.write().unwrap();
            if !initializing.insert(type_id) {
                log::error!("❌ Circular dependency detected for type: {}", type_name);
                panic!("Circular dependency detected: {} is already being initialized", type_name);
            }
        }

        // 생성자가 다른 싱글톤을 재귀적으로 요청할 수 있으므로 락을 잡지 않은 채로 생성
        let result = std::panic::catch_unwind(Self::construct::<T>);

        LOCATOR.initializing.write().unwrap().remove(&type_id);

        match result {
            Ok(instance) => {
                let mut instances = LOCATOR.instances.write().unwrap();
                let stored = instances
                    .entry(type_id)
                    .or_insert_with(|| instance.clone() as Arc<dyn Any + Send + Sync>)
                    .clone();
                stored.downcast::<T>().expect("Type mismatch in ServiceLocator")
            }
            Err(e) => {
                log::error!("Failed to create instance for {}: {:?}", type_name, e);
                panic!("Failed to create instance for {}", type_name);
            }
        }
    }

    /// 이미 생성되었거나 수동 등록된 인스턴스만 조회합니다
    pub fn try_get<T: 'static + Send + Sync>() -> Option<Arc<T>> {
        let instances = LOCATOR.instances.read().unwrap();
        instances
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|instance| instance.downcast::<T>().ok())
    }

    fn construct<T: 'static + Send + Sync>() -> Arc<T> {
        let type_name = std::any::type_name::<T>();
        let clean_type_name = extract_clean_type_name(type_name);

        let boxed_instance = match lookup_key(clean_type_name) {
            Some(("Repository", entity_name)) => match REPOSITORY_NAME_CACHE.get(&entity_name) {
                Some(registration) => (registration.constructor)(),
                None => panic!("No repository found for entity: {}", entity_name),
            },
            Some((_, entity_name)) => match SERVICE_NAME_CACHE.get(&entity_name) {
                Some(registration) => (registration.constructor)(),
                None => panic!("No service found for entity: {}", entity_name),
            },
            None => panic!(
                "Service not found: {}. Make sure it's registered with #[service] or #[repository] macro, or manually registered with ServiceLocator::set()",
                type_name
            ),
        };

        match boxed_instance.downcast::<Arc<T>>() {
            Ok(arc_instance) => *arc_instance,
            Err(_) => panic!("Type mismatch for component: {}", clean_type_name),
        }
    }

    /// 인프라 컴포넌트(Database, RedisClient 등)를 수동 등록합니다
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let type_name = std::any::type_name::<T>();
        log::info!("📦 Registering: {}", extract_clean_type_name(type_name));

        let mut instances = LOCATOR.instances.write().unwrap();
        instances.insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
    }

    /// 등록된 모든 리포지토리와 서비스를 미리 생성합니다
    ///
    /// 리포지토리를 먼저 만들고 서비스를 나중에 만들어, 서비스 생성 시점에
    /// 필요한 리포지토리가 이미 준비되어 있도록 합니다.
    pub async fn initialize_all() -> Result<(), Box<dyn std::error::Error>> {
        print_boxed_title("🔄 INITIALIZING SERVICE REGISTRY");

        let repo_registrations: Vec<_> = inventory::iter::<RepositoryRegistration>().collect();
        let repo_count = repo_registrations.len();

        if repo_count > 0 {
            print_step_start(1, "Creating Repository instances");
            for registration in repo_registrations {
                print_sub_task(registration.name, "Creating...");
                let _boxed_instance = (registration.constructor)();
                print_sub_task(registration.name, "✓ Created");
            }
            print_step_complete(1, "Repository instances created", repo_count);
        }

        let service_registrations: Vec<_> = inventory::iter::<ServiceRegistration>().collect();
        let service_count = service_registrations.len();

        if service_count > 0 {
            print_step_start(2, "Creating Service instances");
            for registration in service_registrations {
                print_sub_task(registration.name, "Creating...");
                let _boxed_instance = (registration.constructor)();
                print_sub_task(registration.name, "✓ Created");
            }
            print_step_complete(2, "Service instances created", service_count);
        }

        print_final_summary(repo_count, service_count);

        Ok(())
    }
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(ServiceLocator::new);

#[cfg(test)]
mod tests {
    use super::*;

    struct ManualComponent {
        label: &'static str,
    }

    #[test]
    fn test_extract_clean_name_static() {
        assert_eq!(extract_clean_name_static("book_repository"), "book");
        assert_eq!(extract_clean_name_static("payment_service"), "payment");
        assert_eq!(extract_clean_name_static("token"), "token");
    }

    #[test]
    fn test_lookup_key() {
        assert_eq!(lookup_key("BookRepository"), Some(("Repository", "book".to_string())));
        assert_eq!(lookup_key("CommentService"), Some(("Service", "comment".to_string())));
        assert_eq!(lookup_key("Database"), None);
    }

    #[test]
    fn test_extract_clean_type_name() {
        assert_eq!(
            extract_clean_type_name("library_store_backend::services::books::BookService"),
            "BookService"
        );
        assert_eq!(extract_clean_type_name("Plain"), "Plain");
    }

    #[test]
    fn test_manual_registration_round_trip() {
        ServiceLocator::set(Arc::new(ManualComponent { label: "manual" }));

        let resolved = ServiceLocator::get::<ManualComponent>();
        assert_eq!(resolved.label, "manual");
        assert!(ServiceLocator::try_get::<ManualComponent>().is_some());
    }
}
