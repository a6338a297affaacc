//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 진입점에서 명시적인 설정 객체로 구성되며 `Arc`로 공유됩니다.
//! 요청 처리 중 변경되는 공유 상태는 가격 캐시뿐입니다.

use std::sync::Arc;
use std::time::{Duration, Instant};

use coin_core::{Formatter, IndicatorPolicy};
use coin_data::{CoinDirectory, PriceCache, DEFAULT_PRICE_TTL_SECS};
use coin_notification::NotificationSender;

use crate::repository::TokenStore;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 가격 API + 폴백 추출기
    pub directory: Arc<CoinDirectory>,

    /// API 토큰 저장소
    pub token_store: Arc<dyn TokenStore>,

    /// 메시지 포맷터
    pub formatter: Formatter,

    /// 알림 전송기 (미설정 시 전송 엔드포인트는 500)
    pub notifier: Option<Arc<dyn NotificationSender>>,

    /// 직전 가격 캐시 (미설정 시 직전 가격 없음으로 처리)
    pub price_cache: Option<Arc<dyn PriceCache>>,

    /// 가격 캐시 TTL
    pub price_ttl: Duration,

    /// API 버전
    pub version: String,

    started_at: Instant,
}

impl AppState {
    /// 필수 구성 요소로 상태를 생성합니다.
    pub fn new(directory: CoinDirectory, token_store: Arc<dyn TokenStore>) -> Self {
        Self {
            directory: Arc::new(directory),
            token_store,
            formatter: Formatter::default(),
            notifier: None,
            price_cache: None,
            price_ttl: Duration::from_secs(DEFAULT_PRICE_TTL_SECS),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Instant::now(),
        }
    }

    /// 표시 정책을 설정합니다.
    pub fn with_policy(mut self, policy: IndicatorPolicy) -> Self {
        self.formatter = Formatter::new(policy);
        self
    }

    /// 알림 전송기를 설정합니다.
    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSender>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// 가격 캐시를 설정합니다.
    pub fn with_price_cache(mut self, cache: Arc<dyn PriceCache>, ttl: Duration) -> Self {
        self.price_cache = Some(cache);
        self.price_ttl = ttl;
        self
    }

    /// 알림 전송기 설정 여부.
    pub fn has_notifier(&self) -> bool {
        self.notifier.is_some()
    }

    /// 가격 캐시 설정 여부.
    pub fn has_price_cache(&self) -> bool {
        self.price_cache.is_some()
    }

    /// 서버 업타임(초).
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
