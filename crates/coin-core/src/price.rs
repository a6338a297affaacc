//! 가격 문자열 파싱.

use rust_decimal::Decimal;
use std::str::FromStr;

/// 가격 문자열을 Decimal로 파싱합니다.
///
/// 일반 표기("1234.5")와 지수 표기("1e-5", "2.5E+3")를 모두 허용합니다.
/// 숫자가 아니면 `None`.
pub fn parse_price(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(value) = Decimal::from_str(text) {
        return Some(value);
    }

    if text.contains(['e', 'E']) {
        let normalized = text.replace("e+", "e").replace("E+", "E");
        return Decimal::from_scientific(&normalized).ok();
    }

    None
}
