//! 헬스 체크 endpoint.

use axum::{extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

/// 루트 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    /// 항상 "running"
    pub status: String,
    pub version: String,
}

/// 헬스 체크 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 항상 "healthy"
    pub status: String,
    /// 서버 업타임(초)
    pub uptime_secs: u64,
    /// 텔레그램 전송기 설정 여부
    pub notifier_configured: bool,
    /// 가격 캐시 설정 여부
    pub price_cache_configured: bool,
}

/// 서비스 정보.
///
/// GET /
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(RootResponse {
        message: "Coin Price Relay API".to_string(),
        status: "running".to_string(),
        version: state.version.clone(),
    })
}

/// 헬스 체크 (liveness 확인용).
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime_secs: state.uptime_secs(),
        notifier_configured: state.has_notifier(),
        price_cache_configured: state.has_price_cache(),
    })
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
