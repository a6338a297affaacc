//! 조회 후 텔레그램 전송 endpoint.
//!
//! 요청마다 조회 → 포맷 → 전송을 끝까지 수행합니다.
//! `send_multiple=true`이면 코인마다 메시지를 하나씩, 아니면 한 메시지로 묶어 보냅니다.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use coin_core::CoinRecord;
use coin_data::{exchange_prior_price, record_price, MAX_TOP_LIMIT};
use coin_notification::NotificationSender;

use super::coins::{requested_symbols, SymbolsQuery};
use crate::auth::TokenAuth;
use crate::error::{api_error, ApiResult};
use crate::state::AppState;

/// `max_coins` 기본값.
pub const DEFAULT_MAX_COINS: i64 = 5;

// ==================== 요청/응답 타입 ====================

/// 상위 코인 전송 쿼리.
#[derive(Debug, Deserialize)]
pub struct CrawlQuery {
    #[serde(default)]
    pub send_multiple: bool,
    #[serde(default = "default_max_coins")]
    pub max_coins: i64,
}

fn default_max_coins() -> i64 {
    DEFAULT_MAX_COINS
}

/// 지정 심볼 전송 쿼리의 전송 방식 부분.
#[derive(Debug, Deserialize)]
pub struct SendModeQuery {
    #[serde(default)]
    pub send_multiple: bool,
}

/// 전송 결과 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct CrawlResponse {
    pub status: String,
    pub message: String,
    pub coins_count: usize,
    pub messages_sent: usize,
    pub send_multiple: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_symbols: Option<Vec<String>>,
}

// ==================== 공통 처리 ====================

/// 설정된 알림 전송기를 꺼냅니다.
fn notifier(state: &AppState) -> ApiResult<Arc<dyn NotificationSender>> {
    state.notifier.clone().ok_or_else(|| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "CONFIG_ERROR",
            "Telegram configuration missing",
        )
    })
}

fn validation_error(message: impl Into<String>) -> (StatusCode, Json<crate::ApiErrorResponse>) {
    api_error(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
}

/// 레코드를 순서대로 메시지 라인으로 렌더링합니다.
///
/// 가격 캐시가 있으면 현재 가격을 저장하고, 추세 정책일 때만 직전 가격을 먼저 읽습니다.
pub async fn render_lines(state: &AppState, coins: &[CoinRecord]) -> Vec<String> {
    let needs_prior = state.formatter.policy().needs_prior_price();
    let mut lines = Vec::with_capacity(coins.len());

    for (i, coin) in coins.iter().enumerate() {
        let prior = match &state.price_cache {
            Some(cache) if needs_prior => {
                exchange_prior_price(cache.as_ref(), &coin.symbol, &coin.price, state.price_ttl)
                    .await
            }
            Some(cache) => {
                record_price(cache.as_ref(), &coin.symbol, &coin.price, state.price_ttl).await;
                None
            }
            None => None,
        };
        lines.push(state.formatter.format(coin, i + 1, prior.as_deref()));
    }

    lines
}

/// 라인을 전송하고 응답을 만듭니다.
async fn deliver(
    notifier: &dyn NotificationSender,
    lines: Vec<String>,
    send_multiple: bool,
    requested_symbols: Option<Vec<String>>,
) -> ApiResult<Json<CrawlResponse>> {
    let coins_count = lines.len();

    let (messages_sent, message) = if send_multiple {
        let sent = notifier.send_messages(&lines).await;
        if sent == 0 {
            return Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "NOTIFICATION_ERROR",
                "Failed to send to Telegram",
            ));
        }
        (sent, format!("Sent {} messages to Telegram", sent))
    } else {
        notifier.send_message(&lines.join("\n")).await.map_err(|e| {
            error!(error = %e, "텔레그램 전송 실패");
            api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "NOTIFICATION_ERROR",
                format!("Failed to send to Telegram: {}", e),
            )
        })?;
        (
            1,
            format!(
                "Sent {} coin prices in one message to Telegram",
                coins_count
            ),
        )
    };

    Ok(Json(CrawlResponse {
        status: "success".to_string(),
        message,
        coins_count,
        messages_sent,
        send_multiple,
        requested_symbols,
    }))
}

// ==================== 핸들러 ====================

/// 상위 코인 조회 후 전송.
///
/// POST /crawl-and-send?send_multiple=false&max_coins=5
pub async fn crawl_and_send(
    TokenAuth(client): TokenAuth,
    State(state): State<Arc<AppState>>,
    query: Result<Query<CrawlQuery>, QueryRejection>,
) -> ApiResult<Json<CrawlResponse>> {
    let Query(query) = query.map_err(|e| validation_error(e.body_text()))?;

    if !(1..=MAX_TOP_LIMIT as i64).contains(&query.max_coins) {
        return Err(validation_error(format!(
            "max_coins must be between 1 and {}",
            MAX_TOP_LIMIT
        )));
    }

    let notifier = notifier(&state)?;

    let coins = state.directory.top_coins(query.max_coins as usize).await;
    if coins.is_empty() {
        return Err(api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "DATA_UNAVAILABLE",
            "Failed to fetch coin data",
        ));
    }

    let lines = render_lines(&state, &coins).await;
    let response = deliver(notifier.as_ref(), lines, query.send_multiple, None).await?;

    info!(
        client = %client.name,
        coins = response.coins_count,
        sent = response.messages_sent,
        "상위 코인 전송 완료"
    );
    Ok(response)
}

/// 지정 심볼 조회 후 전송.
///
/// POST /crawl-and-send/specific?symbols=BTC,ETH&send_multiple=false
pub async fn crawl_and_send_specific(
    TokenAuth(client): TokenAuth,
    State(state): State<Arc<AppState>>,
    symbols_query: Result<Query<SymbolsQuery>, QueryRejection>,
    mode_query: Result<Query<SendModeQuery>, QueryRejection>,
) -> ApiResult<Json<CrawlResponse>> {
    let symbols = requested_symbols(symbols_query)?;
    let Query(mode) = mode_query.map_err(|e| validation_error(e.body_text()))?;

    let notifier = notifier(&state)?;

    let coins = state.directory.specific_coins(&symbols).await;
    if coins.is_empty() {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("No data found for symbols: {}", symbols.join(", ")),
        ));
    }

    let lines = render_lines(&state, &coins).await;
    let response = deliver(notifier.as_ref(), lines, mode.send_multiple, Some(symbols)).await?;

    info!(
        client = %client.name,
        coins = response.coins_count,
        sent = response.messages_sent,
        "지정 심볼 전송 완료"
    );
    Ok(response)
}

/// 전송 라우터 생성.
pub fn crawl_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/crawl-and-send", post(crawl_and_send))
        .route("/crawl-and-send/specific", post(crawl_and_send_specific))
}
