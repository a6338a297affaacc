//! # Coin Notification
//!
//! 코인 시세 알림 서비스.
//!
//! 지원 채널:
//! - Telegram (Bot API `sendMessage`)

pub mod telegram;
pub mod types;

pub use telegram::*;
pub use types::*;
