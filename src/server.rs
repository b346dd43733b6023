use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{middleware, Router};
use log::info;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::rate_limit::limit_by_ip;
use crate::api::{create_api_router, RateLimits};
use crate::config::ServerConfig;
use crate::db::{init_database, SqliteOrderRepository};
use crate::service::{OrderService, OrderServiceImpl};

/// 서버 상태 (요청 간 공유, 읽기 전용)
#[derive(Clone)]
pub struct ServerState {
    pub service: Arc<dyn OrderService>,
}

/// 유휴 요청 제한 버킷 정리 주기
const RATE_LIMIT_PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// 미들웨어까지 적용된 애플리케이션 라우터 생성
pub fn build_app(service: Arc<dyn OrderService>, limits: Arc<RateLimits>) -> Router {
    let state = ServerState { service };

    create_api_router()
        .layer(middleware::from_fn_with_state(limits, limit_by_ip))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 서버 시작
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    info!("order-store 서버 시작 중...");

    let pool = init_database(&config.database_url, config.db_max_connections)
        .await
        .with_context(|| format!("데이터베이스 연결 실패: {}", config.database_url))?;

    // 저장소 → 서비스 → 라우터 순으로 조립
    let repository = Arc::new(SqliteOrderRepository::new(pool));
    let service = Arc::new(OrderServiceImpl::new(repository));
    let limits = Arc::new(RateLimits::new(config.get_rate_limit, config.post_rate_limit));
    let app = build_app(service, limits.clone());

    // 유휴 버킷 정리 태스크
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(RATE_LIMIT_PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            limits.prune_idle();
        }
    });

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.rest_port))
        .await
        .with_context(|| format!("REST 서버 바인딩 실패: 포트 {}", config.rest_port))?;

    info!("서버가 성공적으로 시작되었습니다!");
    info!("REST API: http://localhost:{}", config.rest_port);
    info!(
        "요청 제한: GET {}/s, POST {}/s (IP별)",
        config.get_rate_limit, config.post_rate_limit
    );

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .context("REST 서버 오류")?;

    Ok(())
}
