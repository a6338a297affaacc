//! 임베디드 클라이언트 상태 추출 전략.
//!
//! 목록 페이지는 `<script>` 안에 `window.__APOLLO_STATE__ = {...};` 형태로
//! 정규화된 캐시 상태를 싣습니다. 값 중 `symbol`과 `quote`를 모두 가진 객체를
//! 코인 항목으로 봅니다.
//!
//! 리터럴은 비탐욕 패턴으로 첫 `};`까지 자르므로, 페이로드 내부에 `};`가
//! 있으면 잘린 JSON이 되어 해당 스크립트는 실패 처리됩니다.

use std::sync::LazyLock;

use coin_core::CoinRecord;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

use super::{ExtractionStrategy, StrategyOutcome};
use crate::provider::quote_usd_price;

/// 임베디드 상태 스크립트 식별자.
pub const APOLLO_STATE_MARKER: &str = "window.__APOLLO_STATE__";

static APOLLO_STATE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)window\.__APOLLO_STATE__\s*=\s*(\{.*?\});").expect("Invalid regex")
});

static SCRIPT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("Invalid selector"));

/// `window.__APOLLO_STATE__` 추출 전략.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedStateStrategy;

impl EmbeddedStateStrategy {
    /// 상태 객체에서 코인 항목을 문서 순서대로 수집합니다.
    fn collect_coins(state: &Value, limit: usize) -> Vec<CoinRecord> {
        let Some(entries) = state.as_object() else {
            return Vec::new();
        };

        let mut coins = Vec::new();
        for value in entries.values() {
            if coins.len() >= limit {
                break;
            }

            let Some(entry) = value.as_object() else {
                continue;
            };
            if !entry.contains_key("symbol") || !entry.contains_key("quote") {
                continue;
            }

            let Some(symbol) = entry.get("symbol").and_then(Value::as_str) else {
                continue;
            };
            if let Some(record) = quote_usd_price(value).and_then(|p| CoinRecord::usdt(symbol, p))
            {
                coins.push(record);
            }
        }

        coins
    }
}

impl ExtractionStrategy for EmbeddedStateStrategy {
    fn name(&self) -> &'static str {
        "embedded_state"
    }

    fn extract(&self, document: &Html, limit: usize) -> StrategyOutcome {
        let mut scripts_seen = 0usize;

        for script in document.select(&SCRIPT_SELECTOR) {
            let text: String = script.text().collect();
            if !text.contains(APOLLO_STATE_MARKER) {
                continue;
            }
            scripts_seen += 1;

            let Some(literal) = APOLLO_STATE_REGEX
                .captures(&text)
                .and_then(|caps| caps.get(1))
            else {
                continue;
            };

            let state: Value = match serde_json::from_str(literal.as_str()) {
                Ok(state) => state,
                Err(e) => {
                    debug!(error = %e, "임베디드 상태 JSON 파싱 실패");
                    continue;
                }
            };

            let coins = Self::collect_coins(&state, limit);
            if !coins.is_empty() {
                return StrategyOutcome::Extracted(coins);
            }
        }

        if scripts_seen == 0 {
            StrategyOutcome::Failed("no embedded state script".to_string())
        } else {
            StrategyOutcome::Failed(format!(
                "no coin entries in {} embedded state script(s)",
                scripts_seen
            ))
        }
    }
}
