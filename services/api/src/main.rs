mod audits;
mod error;
mod score;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use blink_common::types::ServiceInfo;
use blink_config::AppConfig;
use blink_db::audits::pg_repository::PgAuditRepository;
use blink_db::reports::pg_repository::PgReportRepository;
use blink_scoring::ENGINE_VERSION;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub audit_repo: PgAuditRepository,
    pub report_repo: PgReportRepository,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("blink-api", ENGINE_VERSION))
}

async fn metrics() -> impl IntoResponse {
    let body = "\
# HELP blink_up Service up indicator\n\
# TYPE blink_up gauge\n\
blink_up 1\n\
# HELP blink_info Service info\n\
# TYPE blink_info gauge\n\
blink_info{service=\"blink-api\",version=\"0.1.0\"} 1\n";

    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        body,
    )
}

fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse::<HeaderValue>().unwrap(),
            "http://127.0.0.1:3000".parse::<HeaderValue>().unwrap(),
        ])
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .route("/metrics", get(metrics))
        .merge(score::router())
        .merge(audits::router())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let config = AppConfig::from_env().expect("failed to load config");
    config.init_tracing();
    tracing::info!(service = "blink-api", "starting");

    let pool = blink_db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");

    let state = AppState {
        audit_repo: PgAuditRepository::new(pool.clone()),
        report_repo: PgReportRepository::new(pool),
    };

    let app = build_router(state);
    let addr: SocketAddr = config.bind_addr().parse().expect("invalid bind address");

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
