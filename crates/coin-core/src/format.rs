//! 텔레그램 메시지 라인 포맷터.
//!
//! 코인 레코드 하나를 `"{표시} {심볼}: {가격} {통화}"` 형태의 한 줄로 렌더링합니다.
//!
//! ## 표시 정책
//! - [`IndicatorPolicy::Rank`]: 순위가 임계값 이내이면 🟢, 아니면 🔴
//! - [`IndicatorPolicy::Trend`]: 직전 가격보다 오르면 ⬆️, 아니면 ⬇️ (직전 가격이 없으면 ⬇️)

use crate::price::parse_price;
use crate::types::CoinRecord;

/// 순위 정책의 기본 임계값.
pub const DEFAULT_RANK_THRESHOLD: usize = 10;

const RANK_TOP: &str = "🟢";
const RANK_REST: &str = "🔴";
const TREND_UP: &str = "⬆️";
const TREND_DOWN: &str = "⬇️";

/// 메시지 앞 표시 정책.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorPolicy {
    /// 순위 기반 (`position <= threshold`)
    Rank { threshold: usize },
    /// 직전 캐시 가격 대비 추세
    Trend,
}

impl Default for IndicatorPolicy {
    fn default() -> Self {
        Self::Rank {
            threshold: DEFAULT_RANK_THRESHOLD,
        }
    }
}

impl std::str::FromStr for IndicatorPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rank" => Ok(Self::default()),
            "trend" => Ok(Self::Trend),
            _ => Err(format!("Unknown indicator policy: {}", s)),
        }
    }
}

impl IndicatorPolicy {
    /// 직전 가격이 필요한 정책인지 여부.
    pub fn needs_prior_price(&self) -> bool {
        matches!(self, Self::Trend)
    }
}

/// 코인 메시지 포맷터.
#[derive(Debug, Clone, Copy, Default)]
pub struct Formatter {
    policy: IndicatorPolicy,
}

impl Formatter {
    /// 주어진 정책으로 포맷터를 생성합니다.
    pub fn new(policy: IndicatorPolicy) -> Self {
        Self { policy }
    }

    /// 현재 정책.
    pub fn policy(&self) -> IndicatorPolicy {
        self.policy
    }

    /// 레코드에 붙일 표시를 결정합니다.
    ///
    /// `position`은 1부터 시작합니다.
    pub fn indicator(
        &self,
        record: &CoinRecord,
        position: usize,
        prior_price: Option<&str>,
    ) -> &'static str {
        match self.policy {
            IndicatorPolicy::Rank { threshold } => {
                if position <= threshold {
                    RANK_TOP
                } else {
                    RANK_REST
                }
            }
            IndicatorPolicy::Trend => {
                let current = parse_price(&record.price);
                let prior = prior_price.and_then(parse_price);
                match (current, prior) {
                    (Some(current), Some(prior)) if current > prior => TREND_UP,
                    _ => TREND_DOWN,
                }
            }
        }
    }

    /// 레코드 한 줄을 렌더링합니다.
    pub fn format(
        &self,
        record: &CoinRecord,
        position: usize,
        prior_price: Option<&str>,
    ) -> String {
        let indicator = self.indicator(record, position, prior_price);
        format!(
            "{} {}: {} {}",
            indicator,
            record.symbol,
            format_price(&record.price),
            record.currency
        )
    }
}

/// 가격 문자열을 표시용으로 렌더링합니다.
///
/// - 1000 이상: 천 단위 구분 + 소수점 1자리 (`1234.5` → `1,234.5`)
/// - 1000 미만: 소수점 4자리 (`12.3456789` → `12.3457`)
/// - 숫자가 아니거나 유한하지 않으면 원문 그대로
///
/// 반올림은 `f64`로 파싱한 이진 값 기준입니다 (`0.00025` → `0.0003`).
pub fn format_price(price: &str) -> String {
    let value = match price.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => return price.to_string(),
    };

    if value >= 1000.0 {
        group_thousands(&format!("{:.1}", value))
    } else {
        format!("{:.4}", value)
    }
}

/// 정수부에 쉼표를 삽입합니다.
fn group_thousands(text: &str) -> String {
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
