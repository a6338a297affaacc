//! 코인 시세 전송 스케줄러.
//!
//! API 서버의 `/crawl-and-send/specific` endpoint를 일정 주기로 호출합니다:
//! - 주기 및 추적 심볼은 환경변수로 설정
//! - 호출 실패 시 고정 지연 후 재시도
//! - Ctrl+C 또는 [`CoinScheduler::stop`]으로 종료

pub mod config;
pub mod error;
pub mod scheduler;

pub use config::{parse_tracked_coins, SchedulerConfig, DEFAULT_TRACKED_COINS};
pub use error::{Result, SchedulerError};
pub use scheduler::CoinScheduler;
