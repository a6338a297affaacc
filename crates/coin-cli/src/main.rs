//! API 토큰 관리 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 토큰 목록
//! coin list
//!
//! # 무작위 토큰 생성
//! coin create scheduler
//!
//! # 지정한 값으로 생성
//! coin create dashboard my-secret-token
//!
//! # 삭제
//! coin delete scheduler
//! ```

use clap::{Parser, Subcommand};
use tracing::error;

use coin_cli::commands::tokens::{connect, create_token, delete_token, list_tokens};
use coin_core::{init_logging, LogConfig};

#[derive(Parser)]
#[command(name = "coin")]
#[command(about = "Coin price relay CLI - API 토큰 관리", long_about = None)]
#[command(version)]
struct Cli {
    /// 데이터베이스 URL (기본: DATABASE_URL 환경변수)
    #[arg(long, global = true)]
    db_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 등록된 토큰 목록 보기
    List,

    /// 새 토큰 생성
    Create {
        /// 클라이언트 이름 (고유)
        name: String,

        /// 토큰 값 (생략 시 무작위 생성)
        token: Option<String>,
    },

    /// 이름으로 토큰 삭제
    Delete {
        /// 클라이언트 이름
        name: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_logging(LogConfig::new("coin=info,coin_cli=info").with_env_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let cli = Cli::parse();
    let pool = connect(cli.db_url).await?;

    let result = match cli.command {
        Commands::List => list_tokens(&pool).await.map(|_| ()),
        Commands::Create { name, token } => create_token(&pool, &name, token).await.map(|_| ()),
        Commands::Delete { name } => delete_token(&pool, &name).await,
    };

    pool.close().await;

    if let Err(e) = &result {
        error!("Command failed: {:#}", e);
    }
    result
}
