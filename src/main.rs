//! CloakBox 인증 서비스 메인 애플리케이션
//!
//! 환경 설정을 읽고 데이터베이스 연결과 서비스 레지스트리를 초기화한 뒤
//! Actix-web HTTP 서버를 구동합니다.

use std::sync::Arc;

use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{App, HttpServer, middleware};
use env_logger::Env;
use log::{error, info};

use cloakbox_api::config::{RateLimitConfig, ServerConfig};
use cloakbox_api::core::registry::ServiceLocator;
use cloakbox_api::db::Database;
use cloakbox_api::db::tunnel::TUNNEL_MANAGER;
use cloakbox_api::middlewares::configure_cors;
use cloakbox_api::routes::configure_all_routes;

const DEFAULT_LOG_LEVEL: &str = "info,actix_web=debug";

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    load_env_file();
    init_logging();

    info!("🚀 CloakBox 인증 서비스 시작중...");

    if let Err(e) = initialize_services().await {
        error!("서비스 초기화 실패: {}", e);
        TUNNEL_MANAGER.close_all_tunnels().await;
        return Err(std::io::Error::other(e.to_string()));
    }

    info!("✅ 모든 서비스가 성공적으로 초기화되었습니다!");

    let result = start_http_server().await;

    TUNNEL_MANAGER.close_all_tunnels().await;
    info!("👋 서버 종료");
    result
}

/// 데이터베이스를 연결해 레지스트리에 넣고, 등록된 서비스를 모두 생성합니다.
async fn initialize_services() -> cloakbox_api::core::errors::AppResult<()> {
    info!("📡 데이터베이스 연결 중...");
    let database = Database::new().await?;
    ServiceLocator::set(Arc::new(database));

    ServiceLocator::initialize_all()?;
    Ok(())
}

async fn start_http_server() -> std::io::Result<()> {
    let bind_address = (ServerConfig::host(), ServerConfig::port());
    let prefix = ServerConfig::api_prefix();

    info!("🌐 서버가 http://{}:{} 에서 실행중입니다", bind_address.0, bind_address.1);
    info!("📍 Health check: http://{}:{}/{}/system/health", bind_address.0, bind_address.1, prefix);

    let governor_conf = GovernorConfigBuilder::default()
        .requests_per_second(RateLimitConfig::per_second())
        .burst_size(RateLimitConfig::burst_size())
        .use_headers()
        .finish()
        .ok_or_else(|| std::io::Error::other("Rate Limiting 설정이 올바르지 않습니다"))?;

    info!(
        "🛡️ Rate Limiting 활성화: 초당 {}요청, 버스트 {}개",
        RateLimitConfig::per_second(),
        RateLimitConfig::burst_size()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Governor::new(&governor_conf))
            .wrap(configure_cors())
            .wrap(middleware::Logger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_all_routes)
    })
    .bind(bind_address)?
    .workers(ServerConfig::workers())
    .run()
    .await
}

/// `PROFILE`에 따라 환경 파일을 로드합니다.
///
/// * `PROFILE=dev` - `.env.dev`
/// * `PROFILE=prod` - `.env.prod`
/// * 기타 - `.env`
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_default();

    // 로거 초기화 전이므로 결과는 표준 출력으로 남깁니다.
    let (file, result) = match profile.as_str() {
        "prod" => (".env.prod", dotenv::from_filename(".env.prod").map(|_| ())),
        "dev" => (".env.dev", dotenv::from_filename(".env.dev").map(|_| ())),
        _ => (".env", dotenv::dotenv().map(|_| ())),
    };

    match result {
        Ok(()) => println!("{} 파일 로드 됨 (PROFILE={})", file, profile),
        Err(e) => println!("{} 파일 로드 실패: {}", file, e),
    }
}

/// `LOG_LEVEL`(기본 `info,actix_web=debug`)로 로거를 초기화합니다.
fn init_logging() {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    env_logger::init_from_env(Env::default().default_filter_or(level));
}
