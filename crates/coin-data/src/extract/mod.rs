//! 공개 목록 페이지 폴백 추출기.
//!
//! 가격 API를 쓸 수 없을 때 공개 목록 페이지 HTML에서 코인 시세를 추출합니다.
//! 추출은 이름이 있는 전략들의 순서 목록으로 구성되며, 처음으로 비어 있지 않은
//! 결과를 낸 전략에서 멈춥니다.
//!
//! ## 기본 전략 순서
//! 1. [`EmbeddedStateStrategy`]: 페이지에 임베디드된 클라이언트 상태 JSON
//! 2. [`TableStrategy`]: 일반 HTML 테이블 파싱
//!
//! 모든 전략 실패는 로그로만 남기며 호출자에게 전파하지 않습니다.

pub mod embedded_state;
pub mod table;

pub use embedded_state::EmbeddedStateStrategy;
pub use table::TableStrategy;

use coin_core::CoinRecord;
use reqwest::Client;
use scraper::Html;
use tracing::{debug, error, info, warn};

use crate::config::DataSourceConfig;
use crate::error::{DataError, Result};

/// 전략 하나의 실행 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome {
    /// 하나 이상의 레코드를 추출함
    Extracted(Vec<CoinRecord>),
    /// 추출 실패 (사유)
    Failed(String),
}

impl StrategyOutcome {
    /// 레코드가 비어 있으면 실패로 변환합니다.
    pub fn from_records(records: Vec<CoinRecord>, reason: impl Into<String>) -> Self {
        if records.is_empty() {
            Self::Failed(reason.into())
        } else {
            Self::Extracted(records)
        }
    }
}

/// 페이지 추출 전략.
///
/// 구현체는 순수 함수여야 합니다. 같은 문서와 limit에 대해 항상 같은 결과를 냅니다.
pub trait ExtractionStrategy: Send + Sync {
    /// 로그에 사용할 전략 이름.
    fn name(&self) -> &'static str;

    /// 문서에서 최대 `limit`개의 레코드를 추출합니다.
    fn extract(&self, document: &Html, limit: usize) -> StrategyOutcome;
}

/// 순서가 있는 전략 목록으로 페이지를 추출하는 폴백 추출기.
pub struct FallbackExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
    client: Client,
    page_url: String,
}

impl std::fmt::Debug for FallbackExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackExtractor")
            .field("strategies", &self.strategy_names())
            .field("page_url", &self.page_url)
            .finish()
    }
}

impl FallbackExtractor {
    /// 기본 전략(임베디드 상태 → 테이블)으로 추출기를 생성합니다.
    pub fn new(config: &DataSourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            strategies: Self::default_strategies(),
            client,
            page_url: config.page_url.clone(),
        })
    }

    /// 기본 전략 목록.
    pub fn default_strategies() -> Vec<Box<dyn ExtractionStrategy>> {
        vec![Box::new(EmbeddedStateStrategy), Box::new(TableStrategy)]
    }

    /// 전략 목록을 교체합니다.
    pub fn with_strategies(mut self, strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        self.strategies = strategies;
        self
    }

    /// 적용 순서대로의 전략 이름.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// 대상 페이지 URL.
    pub fn page_url(&self) -> &str {
        &self.page_url
    }

    /// HTML 문자열에서 레코드를 추출합니다.
    ///
    /// 네트워크를 사용하지 않으며, 모든 전략이 실패하면 빈 벡터를 반환합니다.
    pub fn extract(&self, markup: &str, limit: usize) -> Vec<CoinRecord> {
        if limit == 0 {
            return Vec::new();
        }

        let document = Html::parse_document(markup);

        for strategy in &self.strategies {
            match strategy.extract(&document, limit) {
                StrategyOutcome::Extracted(mut records) => {
                    records.truncate(limit);
                    info!(
                        strategy = strategy.name(),
                        count = records.len(),
                        "페이지 추출 성공"
                    );
                    return records;
                }
                StrategyOutcome::Failed(reason) => {
                    debug!(strategy = strategy.name(), reason = %reason, "추출 전략 실패");
                }
            }
        }

        warn!("모든 추출 전략이 실패했습니다");
        Vec::new()
    }

    /// 목록 페이지를 가져옵니다.
    pub async fn fetch_page(&self) -> Result<String> {
        let response = self.client.get(&self.page_url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Status { status, body });
        }

        Ok(response.text().await?)
    }

    /// 페이지를 가져와 추출합니다.
    ///
    /// 가져오기 실패는 로그를 남기고 빈 벡터로 처리합니다.
    pub async fn crawl(&self, limit: usize) -> Vec<CoinRecord> {
        match self.fetch_page().await {
            Ok(markup) => self.extract(&markup, limit),
            Err(e) => {
                error!(url = %self.page_url, error = %e, "Error in fallback crawl");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, Vec<CoinRecord>);

    impl ExtractionStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        fn extract(&self, _document: &Html, _limit: usize) -> StrategyOutcome {
            StrategyOutcome::from_records(self.1.clone(), "empty")
        }
    }

    fn coin(symbol: &str) -> CoinRecord {
        CoinRecord::usdt(symbol, "1.0").unwrap()
    }

    fn extractor() -> FallbackExtractor {
        FallbackExtractor::new(&DataSourceConfig::default()).unwrap()
    }

    #[test]
    fn test_default_strategy_order() {
        assert_eq!(extractor().strategy_names(), vec!["embedded_state", "table"]);
    }

    #[test]
    fn test_first_non_empty_strategy_wins() {
        let extractor = extractor().with_strategies(vec![
            Box::new(Fixed("a", vec![])),
            Box::new(Fixed("b", vec![coin("BTC"), coin("ETH")])),
            Box::new(Fixed("c", vec![coin("SOL")])),
        ]);

        let records = extractor.extract("<html></html>", 10);
        assert_eq!(records, vec![coin("BTC"), coin("ETH")]);
    }

    #[test]
    fn test_result_capped_at_limit() {
        let extractor = extractor().with_strategies(vec![Box::new(Fixed(
            "a",
            vec![coin("BTC"), coin("ETH"), coin("SOL")],
        ))]);

        assert_eq!(extractor.extract("", 2).len(), 2);
        assert!(extractor.extract("", 0).is_empty());
    }

    #[test]
    fn test_nothing_found_is_empty() {
        let records = extractor().extract("<html><body><p>maintenance</p></body></html>", 5);
        assert!(records.is_empty());
    }

    #[test]
    fn test_embedded_state_preferred_over_table() {
        let markup = r#"
            <html><head><script>
            window.__APOLLO_STATE__ = {"c1": {"symbol": "BTC", "quote": {"USD": {"price": 67000}}}};
            </script></head>
            <body><table>
              <tr><th>#</th><th>Name</th><th>Price</th></tr>
              <tr><td>1</td><td>ETH</td><td>$3,000.00</td></tr>
            </table></body></html>
        "#;

        let records = extractor().extract(markup, 5);
        assert_eq!(records, vec![CoinRecord::usdt("BTC", "67000").unwrap()]);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let markup = r#"<table>
            <tr><th>#</th><th>Name</th><th>Price</th></tr>
            <tr><td>1</td><td>BTC Bitcoin</td><td>$67,000.50</td></tr>
        </table>"#;

        let extractor = extractor();
        assert_eq!(extractor.extract(markup, 5), extractor.extract(markup, 5));
    }
}
