//! CoinMarketCap Pro API 클라이언트.
//!
//! ## 엔드포인트
//! - `GET /cryptocurrency/listings/latest?limit=N&convert=USD`: 시가총액 순위 목록
//! - `GET /cryptocurrency/quotes/latest?symbol=A,B&convert=USD`: 심볼별 시세
//!
//! 인증은 `X-CMC_PRO_API_KEY` 헤더로 전달합니다.

use coin_core::CoinRecord;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::quote_usd_price;
use crate::config::DataSourceConfig;
use crate::error::{DataError, Result};

const API_KEY_HEADER: &str = "X-CMC_PRO_API_KEY";

/// CoinMarketCap Pro API 클라이언트.
#[derive(Debug, Clone)]
pub struct CoinMarketCapClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl CoinMarketCapClient {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn new(config: &DataSourceConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// 기존 HTTP 클라이언트를 공유해 생성합니다.
    pub fn with_client(client: Client, config: &DataSourceConfig) -> Self {
        Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.clone(),
        }
    }

    /// API 키가 설정되어 있는지 여부.
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// 인증 헤더를 붙여 GET 요청을 보내고 JSON 본문을 반환합니다.
    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let api_key = self.api_key.as_deref().ok_or(DataError::MissingApiKey)?;
        let url = format!("{}{}", self.base_url, path);

        debug!(url = %url, "CoinMarketCap API 요청");

        let response = self
            .client
            .get(&url)
            .query(params)
            .header(API_KEY_HEADER, api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// 시가총액 상위 `limit`개 코인을 조회합니다.
    ///
    /// 심볼이 비었거나 가격이 0인 항목은 건너뜁니다.
    /// `data`가 없거나 빈 배열이면 빈 벡터를, 배열이 아니면(`null` 포함) 파싱 오류를 반환합니다.
    pub async fn fetch_listings(&self, limit: usize) -> Result<Vec<CoinRecord>> {
        let body = self
            .get(
                "/cryptocurrency/listings/latest",
                &[("limit", limit.to_string()), ("convert", "USD".to_string())],
            )
            .await?;

        let entries: &[Value] = match body.get("data") {
            Some(Value::Array(entries)) => entries.as_slice(),
            None => &[],
            Some(_) => {
                return Err(DataError::ParseError(
                    "listings `data` is not an array".to_string(),
                ))
            }
        };

        let coins: Vec<CoinRecord> = entries
            .iter()
            .filter_map(|entry| {
                let symbol = entry.get("symbol")?.as_str()?;
                let price = quote_usd_price(entry)?;
                CoinRecord::usdt(symbol, price)
            })
            .take(limit)
            .collect();

        debug!(count = coins.len(), "listings 응답 파싱 완료");
        Ok(coins)
    }

    /// 요청한 심볼의 시세를 조회합니다.
    ///
    /// 응답은 심볼을 키로 하며, 요청 순서대로 결과를 만듭니다.
    /// 응답에 없거나 가격이 0인 심볼은 경고 로그를 남기고 제외합니다.
    /// `data`가 객체가 아니면(`null` 포함) 파싱 오류입니다.
    pub async fn fetch_quotes(&self, symbols: &[String]) -> Result<Vec<CoinRecord>> {
        let body = self
            .get(
                "/cryptocurrency/quotes/latest",
                &[("symbol", symbols.join(",")), ("convert", "USD".to_string())],
            )
            .await?;

        let data = match body.get("data") {
            Some(Value::Object(map)) => Some(map),
            None => None,
            Some(_) => {
                return Err(DataError::ParseError(
                    "quotes `data` is not an object".to_string(),
                ))
            }
        };

        let mut coins = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            // v2 형태는 심볼별 배열이므로 첫 항목을 사용
            let entry = data.and_then(|map| map.get(symbol)).and_then(|v| match v {
                Value::Array(items) => items.first(),
                Value::Object(_) => Some(v),
                _ => None,
            });

            let Some(entry) = entry else {
                warn!(symbol = %symbol, "No data found for symbol");
                continue;
            };

            if let Some(record) = quote_usd_price(entry).and_then(|p| CoinRecord::usdt(symbol, p)) {
                coins.push(record);
            }
        }

        Ok(coins)
    }
}
