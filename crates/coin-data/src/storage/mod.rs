//! 직전 가격 저장소.
//!
//! 추세 표시 정책이 비교에 사용할 심볼별 마지막 가격을 보관합니다.
//! 과거 시계열은 저장하지 않습니다.

pub mod redis;

pub use self::redis::{
    exchange_prior_price, record_price, MemoryPriceCache, PriceCache, RedisCache, RedisConfig,
    DEFAULT_PRICE_TTL_SECS,
};
