//! 코인 시세 전송 스케줄러 바이너리.

use coin_core::{init_logging, LogConfig};
use coin_scheduler::{CoinScheduler, SchedulerConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    init_logging(LogConfig::new("coin_scheduler=info").with_env_format())?;

    let config = match SchedulerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    info!(api_url = %config.api_url, "Coin scheduler 시작");

    let scheduler = CoinScheduler::new(config)?;
    scheduler.run().await;

    Ok(())
}
