//! 가격 Provider 모듈.
//!
//! ## CoinMarketCap Pro API
//! - `CoinMarketCapClient`: 순위별 목록(`listings/latest`), 심볼별 시세(`quotes/latest`)
//! - API 키가 필요하며, 없으면 디렉터리가 페이지 추출로 강등합니다.

pub mod coinmarketcap;

pub use coinmarketcap::CoinMarketCapClient;

use coin_core::parse_price;
use serde_json::Value;

/// `quote.USD.price`에서 0이 아닌 가격을 꺼냅니다.
///
/// API 응답과 페이지 임베디드 상태가 같은 구조를 사용합니다.
/// 숫자는 원문 표기를 그대로 문자열화하고, 숫자 문자열도 허용합니다.
pub(crate) fn quote_usd_price(entry: &Value) -> Option<String> {
    let price = entry.get("quote")?.get("USD")?.get("price")?;

    match price {
        Value::Number(n) => {
            if n.as_f64().is_some_and(|v| v != 0.0 && v.is_finite()) {
                Some(n.to_string())
            } else {
                None
            }
        }
        Value::String(s) => {
            let value = parse_price(s)?;
            if value.is_zero() {
                None
            } else {
                Some(s.trim().to_string())
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_usd_price_number() {
        let entry = json!({"symbol": "BTC", "quote": {"USD": {"price": 67000.12}}});
        assert_eq!(quote_usd_price(&entry).as_deref(), Some("67000.12"));
    }

    #[test]
    fn test_quote_usd_price_rejects_zero_and_missing() {
        assert!(quote_usd_price(&json!({"quote": {"USD": {"price": 0}}})).is_none());
        assert!(quote_usd_price(&json!({"quote": {"USD": {"price": "0.0"}}})).is_none());
        assert!(quote_usd_price(&json!({"quote": {"USD": {}}})).is_none());
        assert!(quote_usd_price(&json!({"quote": {"EUR": {"price": 1.0}}})).is_none());
        assert!(quote_usd_price(&json!({"quote": {"USD": {"price": null}}})).is_none());
    }

    #[test]
    fn test_quote_usd_price_numeric_string() {
        let entry = json!({"quote": {"USD": {"price": " 1.25 "}}});
        assert_eq!(quote_usd_price(&entry).as_deref(), Some("1.25"));
        assert!(quote_usd_price(&json!({"quote": {"USD": {"price": "abc"}}})).is_none());
    }
}
