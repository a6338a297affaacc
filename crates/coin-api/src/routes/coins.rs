//! 코인 조회 endpoint.
//!
//! 텔레그램 전송 없이 시세만 반환합니다.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use coin_core::CoinRecord;
use coin_data::MAX_TOP_LIMIT;

use crate::auth::TokenAuth;
use crate::error::{api_error, ApiResult};
use crate::state::AppState;

// ==================== 요청/응답 타입 ====================

/// 심볼 지정 쿼리.
#[derive(Debug, Deserialize)]
pub struct SymbolsQuery {
    /// 쉼표로 구분된 심볼 목록 (예: "BTC,TON,SOL")
    pub symbols: String,
}

/// 상위 코인 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct CoinsResponse {
    pub status: String,
    pub coins: Vec<CoinRecord>,
    pub count: usize,
}

/// 지정 심볼 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct SpecificCoinsResponse {
    pub status: String,
    pub coins: Vec<CoinRecord>,
    pub count: usize,
    pub requested_symbols: Vec<String>,
}

/// 쉼표 구분 심볼 문자열을 대문자 목록으로 변환합니다.
///
/// 빈 항목은 버리며, 순서와 중복은 유지합니다.
pub fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// 쿼리 추출 결과에서 심볼 목록을 검증합니다.
///
/// 파라미터 누락/형식 오류는 422, 빈 목록은 400.
pub(crate) fn requested_symbols(
    query: Result<Query<SymbolsQuery>, QueryRejection>,
) -> ApiResult<Vec<String>> {
    let Query(query) = query.map_err(|e| {
        api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "VALIDATION_ERROR",
            e.body_text(),
        )
    })?;

    let symbols = parse_symbols(&query.symbols);
    if symbols.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "INVALID_INPUT",
            "No symbols provided",
        ));
    }

    Ok(symbols)
}

// ==================== 핸들러 ====================

/// 시가총액 상위 50개 코인 조회.
///
/// GET /coins
pub async fn get_coins(
    TokenAuth(client): TokenAuth,
    State(state): State<Arc<AppState>>,
) -> Json<CoinsResponse> {
    let coins = state.directory.top_coins(MAX_TOP_LIMIT).await;
    info!(client = %client.name, count = coins.len(), "상위 코인 조회");

    Json(CoinsResponse {
        status: "success".to_string(),
        count: coins.len(),
        coins,
    })
}

/// 지정 심볼 코인 조회.
///
/// GET /coins/specific?symbols=BTC,ETH
pub async fn get_specific_coins(
    TokenAuth(client): TokenAuth,
    State(state): State<Arc<AppState>>,
    query: Result<Query<SymbolsQuery>, QueryRejection>,
) -> ApiResult<Json<SpecificCoinsResponse>> {
    let symbols = requested_symbols(query)?;

    let coins = state.directory.specific_coins(&symbols).await;
    info!(
        client = %client.name,
        requested = symbols.len(),
        count = coins.len(),
        "지정 심볼 조회"
    );

    Ok(Json(SpecificCoinsResponse {
        status: "success".to_string(),
        count: coins.len(),
        coins,
        requested_symbols: symbols,
    }))
}

/// 코인 조회 라우터 생성.
pub fn coins_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/coins", get(get_coins))
        .route("/coins/specific", get(get_specific_coins))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbols() {
        assert_eq!(parse_symbols("btc, eth ,SOL"), vec!["BTC", "ETH", "SOL"]);
        assert_eq!(parse_symbols("BTC,,TON,"), vec!["BTC", "TON"]);
        assert_eq!(parse_symbols("BTC,BTC"), vec!["BTC", "BTC"]);
        assert!(parse_symbols(" , ").is_empty());
        assert!(parse_symbols("").is_empty());
    }
}
