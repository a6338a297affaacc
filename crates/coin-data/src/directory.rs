//! 코인 디렉터리.
//!
//! 가격 API와 페이지 추출기를 묶어 항상 결과 벡터(비어 있을 수 있음)를 반환합니다.
//!
//! ```text
//! top_coins(limit)
//!   ├─ API 키 있음 → listings/latest ── 성공 → 그대로 반환 (비어 있어도)
//!   │                                 └─ 실패 → crawl(limit)
//!   └─ API 키 없음 → crawl(limit)
//!
//! specific_coins(symbols)
//!   ├─ API 키 있음 → quotes/latest ── 성공 → 요청 순서대로 반환
//!   │                               └─ 실패 → crawl(200) 후 심볼 필터
//!   └─ API 키 없음 → crawl(200) 후 심볼 필터
//! ```

use coin_core::CoinRecord;
use tracing::{error, info, warn};

use crate::config::DataSourceConfig;
use crate::error::Result;
use crate::extract::FallbackExtractor;
use crate::provider::CoinMarketCapClient;

/// 상위 코인 조회 최대 개수.
pub const MAX_TOP_LIMIT: usize = 50;

/// 심볼 폴백 시 페이지에서 추출할 행 수.
pub const SPECIFIC_FALLBACK_LIMIT: usize = 200;

/// 가격 API + 폴백 추출기 조합.
#[derive(Debug)]
pub struct CoinDirectory {
    api: CoinMarketCapClient,
    extractor: FallbackExtractor,
}

impl CoinDirectory {
    /// 설정으로 디렉터리를 생성합니다.
    pub fn new(config: &DataSourceConfig) -> Result<Self> {
        Ok(Self {
            api: CoinMarketCapClient::new(config)?,
            extractor: FallbackExtractor::new(config)?,
        })
    }

    /// 구성 요소를 직접 지정해 생성합니다.
    pub fn from_parts(api: CoinMarketCapClient, extractor: FallbackExtractor) -> Self {
        Self { api, extractor }
    }

    /// 가격 API 클라이언트.
    pub fn api(&self) -> &CoinMarketCapClient {
        &self.api
    }

    /// 폴백 추출기.
    pub fn extractor(&self) -> &FallbackExtractor {
        &self.extractor
    }

    /// 시가총액 상위 코인을 조회합니다.
    ///
    /// `limit`은 호출자가 `1..=MAX_TOP_LIMIT`로 제한합니다.
    pub async fn top_coins(&self, limit: usize) -> Vec<CoinRecord> {
        if !self.api.has_api_key() {
            warn!("No API key provided, using fallback method");
            return self.extractor.crawl(limit).await;
        }

        match self.api.fetch_listings(limit).await {
            Ok(mut coins) => {
                coins.truncate(limit);
                info!(count = coins.len(), "상위 코인 조회 완료 (API)");
                coins
            }
            Err(e) => {
                error!(error = %e, "Error fetching from API");
                let mut coins = self.extractor.crawl(limit).await;
                coins.truncate(limit);
                coins
            }
        }
    }

    /// 지정한 심볼의 시세를 조회합니다.
    ///
    /// API 경로는 요청 순서를, 폴백 경로는 페이지 순서를 따릅니다.
    pub async fn specific_coins(&self, symbols: &[String]) -> Vec<CoinRecord> {
        let symbols: Vec<String> = symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        if symbols.is_empty() {
            return Vec::new();
        }

        if !self.api.has_api_key() {
            warn!("No API key provided, cannot fetch specific coins");
            return self.fallback_specific(&symbols).await;
        }

        match self.api.fetch_quotes(&symbols).await {
            Ok(coins) => {
                info!(
                    requested = symbols.len(),
                    count = coins.len(),
                    "심볼 시세 조회 완료 (API)"
                );
                coins
            }
            Err(e) => {
                error!(error = %e, "Error fetching specific coins from API");
                self.fallback_specific(&symbols).await
            }
        }
    }

    async fn fallback_specific(&self, symbols: &[String]) -> Vec<CoinRecord> {
        self.extractor
            .crawl(SPECIFIC_FALLBACK_LIMIT)
            .await
            .into_iter()
            .filter(|coin| symbols.iter().any(|s| coin.matches_symbol(s)))
            .collect()
    }
}
