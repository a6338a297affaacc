//! 코인 레코드 타입.

use serde::{Deserialize, Serialize};

/// 모든 소스가 사용하는 기본 호가 통화.
pub const DEFAULT_QUOTE_CURRENCY: &str = "usdt";

/// 정규화된 코인 시세 레코드.
///
/// 가격은 소스 정밀도를 보존하기 위해 문자열로 유지합니다.
/// 심볼과 가격이 비어 있는 레코드는 생성되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoinRecord {
    /// 티커 (대문자)
    pub symbol: String,
    /// 가격 (10진수 문자열)
    pub price: String,
    /// 호가 통화 (소문자)
    pub currency: String,
}

impl CoinRecord {
    /// 새 레코드를 생성합니다.
    ///
    /// 심볼이나 가격이 비어 있으면 `None`을 반환합니다.
    pub fn new(
        symbol: impl AsRef<str>,
        price: impl AsRef<str>,
        currency: impl AsRef<str>,
    ) -> Option<Self> {
        let symbol = symbol.as_ref().trim();
        let price = price.as_ref().trim();

        if symbol.is_empty() || price.is_empty() {
            return None;
        }

        Some(Self {
            symbol: symbol.to_uppercase(),
            price: price.to_string(),
            currency: currency.as_ref().trim().to_lowercase(),
        })
    }

    /// USDT 호가 레코드를 생성합니다.
    pub fn usdt(symbol: impl AsRef<str>, price: impl AsRef<str>) -> Option<Self> {
        Self::new(symbol, price, DEFAULT_QUOTE_CURRENCY)
    }

    /// 대소문자 구분 없이 심볼을 비교합니다.
    pub fn matches_symbol(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol.trim())
    }
}

impl std::fmt::Display for CoinRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.symbol, self.price, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalizes_case() {
        let record = CoinRecord::new(" btc ", "67000.5", "USDT").unwrap();
        assert_eq!(record.symbol, "BTC");
        assert_eq!(record.price, "67000.5");
        assert_eq!(record.currency, "usdt");
    }

    #[test]
    fn test_new_rejects_empty_fields() {
        assert!(CoinRecord::usdt("", "1.0").is_none());
        assert!(CoinRecord::usdt("ETH", "  ").is_none());
    }

    #[test]
    fn test_matches_symbol() {
        let record = CoinRecord::usdt("SOL", "150").unwrap();
        assert!(record.matches_symbol("sol"));
        assert!(record.matches_symbol("SOL"));
        assert!(!record.matches_symbol("SOLO"));
    }

    #[test]
    fn test_serialize_shape() {
        let record = CoinRecord::usdt("TON", "5.25").unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"symbol": "TON", "price": "5.25", "currency": "usdt"})
        );
    }
}
