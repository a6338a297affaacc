//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `GET /` - 서비스 정보 (공개)
//! - `GET /health` - 헬스 체크 (공개)
//! - `GET /coins` - 시가총액 상위 50개 조회 (인증)
//! - `GET /coins/specific?symbols=A,B` - 지정 심볼 조회 (인증)
//! - `POST /crawl-and-send` - 상위 코인 조회 후 텔레그램 전송 (인증)
//! - `POST /crawl-and-send/specific` - 지정 심볼 조회 후 텔레그램 전송 (인증)

pub mod coins;
pub mod crawl;
pub mod health;

pub use coins::{coins_router, parse_symbols, CoinsResponse, SpecificCoinsResponse};
pub use crawl::{crawl_router, CrawlResponse, DEFAULT_MAX_COINS};
pub use health::{health_router, HealthResponse, RootResponse};

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(health_router())
        .merge(coins_router())
        .merge(crawl_router())
}
