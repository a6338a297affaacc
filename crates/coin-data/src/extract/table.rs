//! 일반 HTML 테이블 추출 전략.
//!
//! 셀 위치 기반으로 동작합니다. 각 행의 두 번째 `<td>`를 심볼, 세 번째 `<td>`를
//! 가격으로 간주하므로 페이지 레이아웃이 바뀌면 잘못된 값을 읽을 수 있습니다.

use std::sync::LazyLock;

use coin_core::CoinRecord;
use scraper::{ElementRef, Html, Selector};

use super::{ExtractionStrategy, StrategyOutcome};

const SYMBOL_CELL: usize = 1;
const PRICE_CELL: usize = 2;
const MIN_CELLS: usize = 3;

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("Invalid selector"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("Invalid selector"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("Invalid selector"));

/// 테이블 행 파싱 전략.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableStrategy;

impl TableStrategy {
    /// 테이블 하나에서 헤더 행을 건너뛰고 최대 `limit`개 행을 파싱합니다.
    fn parse_table(table: ElementRef<'_>, limit: usize) -> Vec<CoinRecord> {
        table
            .select(&ROW_SELECTOR)
            .skip(1)
            .take(limit)
            .filter_map(Self::parse_row)
            .collect()
    }

    fn parse_row(row: ElementRef<'_>) -> Option<CoinRecord> {
        let cells: Vec<ElementRef<'_>> = row.select(&CELL_SELECTOR).collect();
        if cells.len() < MIN_CELLS {
            return None;
        }

        let symbol_text = cell_text(cells[SYMBOL_CELL]);
        let symbol = symbol_text.split_whitespace().next()?;
        let price = clean_price(&cell_text(cells[PRICE_CELL]));

        if price.is_empty() || price == "N/A" {
            return None;
        }
        if !price.parse::<f64>().is_ok_and(f64::is_finite) {
            return None;
        }

        CoinRecord::usdt(symbol, price)
    }
}

impl ExtractionStrategy for TableStrategy {
    fn name(&self) -> &'static str {
        "table"
    }

    fn extract(&self, document: &Html, limit: usize) -> StrategyOutcome {
        let mut tables_seen = 0usize;

        for table in document.select(&TABLE_SELECTOR) {
            tables_seen += 1;
            let coins = Self::parse_table(table, limit);
            if !coins.is_empty() {
                return StrategyOutcome::Extracted(coins);
            }
        }

        StrategyOutcome::Failed(format!("no coin rows in {} table(s)", tables_seen))
    }
}

/// 공백을 제거한 텍스트 조각들을 이어 붙입니다.
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// 통화 기호와 천 단위 구분자를 제거합니다.
fn clean_price(text: &str) -> String {
    text.trim().replace(['$', ','], "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(markup: &str, limit: usize) -> StrategyOutcome {
        TableStrategy.extract(&Html::parse_document(markup), limit)
    }

    fn symbols(outcome: StrategyOutcome) -> Vec<String> {
        match outcome {
            StrategyOutcome::Extracted(coins) => coins.into_iter().map(|c| c.symbol).collect(),
            StrategyOutcome::Failed(reason) => panic!("extraction failed: {}", reason),
        }
    }

    const LISTING: &str = r#"<html><body><table>
        <tr><th>#</th><th>Name</th><th>Price</th></tr>
        <tr><td>1</td><td><p>BTC</p> <p>Bitcoin</p></td><td><span>$67,000.50</span></td></tr>
        <tr><td>2</td><td>ETH Ethereum</td><td>$3,100.25</td></tr>
        <tr><td>3</td><td>XYZ</td><td>N/A</td></tr>
        <tr><td>4</td><td>SOL</td></tr>
        <tr><td>5</td><td>TON</td><td>$5.10</td></tr>
    </table></body></html>"#;

    #[test]
    fn test_parses_rows_and_cleans_price() {
        match run(LISTING, 10) {
            StrategyOutcome::Extracted(coins) => {
                assert_eq!(coins.len(), 3);
                // 텍스트 조각은 공백 없이 이어지므로 첫 토큰이 "BTCBitcoin"
                assert_eq!(coins[0].symbol, "BTCBITCOIN");
                assert_eq!(coins[0].price, "67000.50");
                assert_eq!(coins[1], CoinRecord::usdt("ETH", "3100.25").unwrap());
                assert_eq!(coins[2], CoinRecord::usdt("TON", "5.10").unwrap());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_limit_counts_rows_not_records() {
        // 상위 3개 행 중 하나(N/A)는 버려지므로 2개만 남음
        assert_eq!(symbols(run(LISTING, 3)), vec!["BTCBITCOIN", "ETH"]);
    }

    #[test]
    fn test_first_table_with_records_wins() {
        let markup = r#"<table><tr><td>nav</td></tr><tr><td>a</td><td>b</td></tr></table>
            <table>
              <tr><th>#</th></tr>
              <tr><td>1</td><td>BNB</td><td>600.1</td></tr>
            </table>
            <table>
              <tr><th>#</th></tr>
              <tr><td>1</td><td>PAXG</td><td>2400</td></tr>
            </table>"#;

        assert_eq!(symbols(run(markup, 5)), vec!["BNB"]);
    }

    #[test]
    fn test_rejects_non_numeric_price() {
        let markup = r#"<table>
            <tr><th>h</th></tr>
            <tr><td>1</td><td>AAA</td><td>--</td></tr>
            <tr><td>2</td><td>BBB</td><td>NaN</td></tr>
            <tr><td>3</td><td></td><td>1.0</td></tr>
        </table>"#;

        assert!(matches!(run(markup, 10), StrategyOutcome::Failed(_)));
    }

    #[test]
    fn test_no_tables() {
        assert_eq!(
            run("<p>nothing</p>", 5),
            StrategyOutcome::Failed("no coin rows in 0 table(s)".to_string())
        );
    }

    #[test]
    fn test_clean_price() {
        assert_eq!(clean_price(" $1,234.50 "), "1234.50");
        assert_eq!(clean_price("N/A"), "N/A");
    }
}
