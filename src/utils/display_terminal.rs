//! 터미널 출력 포맷팅 유틸리티
//!
//! 서비스 레지스트리 초기화와 서버 기동 정보를 박스/단계 형식으로 출력합니다.
//! 로그 레벨과 무관하게 항상 보여야 하는 기동 화면 전용이며,
//! 요청 처리 중의 출력은 `log` 매크로를 사용합니다.

/// 박스 내부 폭 (테두리 제외)
const BOX_WIDTH: usize = 50;

/// 박스 형태로 둘러싸인 제목을 출력합니다
///
/// ```text
/// ╔══════════════════════════════════════════════════╗
/// ║          🔄 INITIALIZING SERVICE REGISTRY        ║
/// ╚══════════════════════════════════════════════════╝
/// ```
pub fn print_boxed_title(title: &str) {
    let border = "═".repeat(BOX_WIDTH);

    println!("╔{}╗", border);
    println!("║{:^width$}║", title, width = BOX_WIDTH - 1);
    println!("╚{}╝", border);
}

/// `→ Step 1: Creating Repository instances`
pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

/// `✓ Step 1: Repository instances created (4 items)`
pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

/// 하위 작업 한 줄 출력
pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 레지스트리 초기화 완료 요약
pub fn print_final_summary(repos: usize, services: usize) {
    println!();
    print_boxed_title("🎉 SERVICE REGISTRY INITIALIZED");
    println!("   📦 Repositories: {}", repos);
    println!("   🔧 Services: {}", services);
    println!("   🚀 Total Components: {}", repos + services);
    println!();
}

/// 이름 캐시 로딩 결과
pub fn print_cache_initialized(cache_type: &str, count: usize) {
    println!("   ├─ {} Cache: {} entries loaded", cache_type, count);
}

/// 서버 기동 정보를 출력합니다
///
/// # Arguments
///
/// * `bind_address` - `host:port`
/// * `endpoints` - (메서드+경로, 설명) 목록
pub fn print_server_banner(bind_address: &str, endpoints: &[(&str, &str)]) {
    print_boxed_title("📚 LIBRARY STORE BACKEND");
    println!("   🌐 Listening: http://{}", bind_address);
    for (route, description) in endpoints {
        println!("   ├─ {:<36} {}", route, description);
    }
    println!();
}
