//! 코인 시세 데이터 소스.
//!
//! 이 crate는 다음을 제공합니다:
//! - CoinMarketCap Pro API 클라이언트 (순위별 목록, 심볼별 시세)
//! - 공개 목록 페이지 추출기 (임베디드 상태 → 테이블 순서의 폴백 전략)
//! - 두 소스를 묶는 [`CoinDirectory`]
//! - 직전 가격 Redis 캐시

pub mod config;
pub mod directory;
pub mod error;
pub mod extract;
pub mod provider;
pub mod storage;

pub use config::DataSourceConfig;
pub use directory::{CoinDirectory, MAX_TOP_LIMIT, SPECIFIC_FALLBACK_LIMIT};
pub use error::{DataError, Result};
pub use extract::{
    EmbeddedStateStrategy, ExtractionStrategy, FallbackExtractor, StrategyOutcome, TableStrategy,
};
pub use provider::CoinMarketCapClient;
pub use storage::{
    exchange_prior_price, record_price, MemoryPriceCache, PriceCache, RedisCache, RedisConfig,
    DEFAULT_PRICE_TTL_SECS,
};
