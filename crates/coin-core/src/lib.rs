//! # Coin Core
//!
//! 코인 시세 릴레이의 핵심 도메인 모델을 제공합니다.
//!
//! 이 크레이트는 모든 데이터 소스가 공유하는 기본 타입을 제공합니다:
//! - 정규화된 코인 레코드 ([`CoinRecord`])
//! - 가격 문자열 파싱 ([`parse_price`])
//! - 텔레그램 메시지 라인 포맷터 ([`Formatter`])
//! - 로깅 인프라

pub mod format;
pub mod logging;
pub mod price;
pub mod types;

pub use format::{format_price, Formatter, IndicatorPolicy};
pub use logging::{init_logging, LogConfig, LogFormat};
pub use price::parse_price;
pub use types::{CoinRecord, DEFAULT_QUOTE_CURRENCY};
