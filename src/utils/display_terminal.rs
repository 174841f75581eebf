//! 터미널 출력 포맷팅 유틸리티
//!
//! 서버 부팅 과정(서비스 레지스트리 초기화, 데이터베이스 연결, SSH 터널)을
//! 터미널에 박스/단계 형태로 표시합니다.

const BOX_WIDTH: usize = 50;

/// 박스 형태의 제목 출력
pub fn print_boxed_title(title: &str) {
    let border = "═".repeat(BOX_WIDTH);

    println!("╔{}╗", border);
    println!("║{:^width$}║", title, width = BOX_WIDTH - 1);
    println!("╚{}╝", border);
}

pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

/// 레지스트리 초기화 요약
pub fn print_final_summary(services: usize) {
    println!();
    print_boxed_title("🎉 SERVICE REGISTRY INITIALIZED");
    println!("   🔧 Services: {}", services);
    println!();
}

/// 접속 정보 요약 (비밀번호 등 민감 정보는 호출 측에서 제외)
pub fn print_key_values(title: &str, entries: &[(&str, String)]) {
    print_boxed_title(title);
    for (key, value) in entries {
        println!("   ├─ {:<16} {}", key, value);
    }
    println!();
}
