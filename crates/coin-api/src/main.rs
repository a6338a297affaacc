//! 코인 시세 릴레이 API 서버.
//!
//! Axum 기반 REST API 서버를 시작합니다.
//! 시세 조회, 텔레그램 전송, 헬스 체크 엔드포인트를 제공합니다.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use coin_api::repository::{ApiTokenRepository, PgTokenStore};
use coin_api::routes::create_api_router;
use coin_api::state::AppState;
use coin_core::{init_logging, IndicatorPolicy, LogConfig};
use coin_data::{CoinDirectory, DataSourceConfig, RedisCache, RedisConfig};
use coin_notification::TelegramSender;

/// 서버 설정 구조체.
struct ServerConfig {
    /// 바인딩할 호스트 주소
    host: String,
    /// 바인딩할 포트
    port: u16,
    /// 토큰 저장소 PostgreSQL URL
    database_url: String,
    /// 메시지 표시 정책
    policy: IndicatorPolicy,
}

impl ServerConfig {
    /// 환경 변수에서 설정 로드.
    ///
    /// # Errors
    /// `DATABASE_URL`이 없으면 에러를 반환합니다.
    fn from_env() -> Result<Self, String> {
        let host = std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("API_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL environment variable is required".to_string())?;

        let policy = match std::env::var("INDICATOR_POLICY") {
            Ok(value) => value.parse().unwrap_or_else(|e| {
                warn!("{}, using rank policy", e);
                IndicatorPolicy::default()
            }),
            Err(_) => IndicatorPolicy::default(),
        };

        Ok(Self {
            host,
            port,
            database_url,
            policy,
        })
    }

    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// CORS 레이어 생성.
///
/// `CORS_ORIGINS`(쉼표 구분)가 설정되면 해당 origin만 허용합니다.
fn cors_layer() -> CorsLayer {
    let allow_origin = match std::env::var("CORS_ORIGINS") {
        Ok(origins) if !origins.is_empty() => {
            let origins: Vec<_> = origins
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();

            if origins.is_empty() {
                warn!("CORS_ORIGINS is set but contains no valid origins, allowing any");
                AllowOrigin::any()
            } else {
                info!("CORS configured with {} allowed origins", origins.len());
                AllowOrigin::list(origins)
            }
        }
        _ => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .max_age(Duration::from_secs(3600))
}

/// 미들웨어를 포함한 전체 라우터 생성.
fn create_router(state: Arc<AppState>) -> Router {
    create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 (30초) - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(cors_layer())
}

/// AppState 초기화.
///
/// DB 연결과 스키마 생성은 필수이며, Redis와 텔레그램은 선택입니다.
async fn create_app_state(config: &ServerConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(&config.database_url)
        .await?;
    ApiTokenRepository::ensure_schema(&pool).await?;
    info!("Database tables created successfully");

    let data_config = DataSourceConfig::from_env();
    if !data_config.has_api_key() {
        warn!("CMC_API_KEY not set, all lookups will use page extraction");
    }
    let directory = CoinDirectory::new(&data_config)?;

    let mut state = AppState::new(directory, Arc::new(PgTokenStore::new(pool)))
        .with_policy(config.policy);

    match TelegramSender::from_env() {
        Some(sender) => state = state.with_notifier(Arc::new(sender)),
        None => warn!("TELEGRAM_TOKEN/TELEGRAM_CHANNEL not set, notify endpoints will fail"),
    }

    if let Some(redis_config) = RedisConfig::from_env() {
        match RedisCache::connect(&redis_config).await {
            Ok(cache) => match cache.health_check().await {
                Ok(true) => {
                    info!("Redis price cache connected");
                    let ttl = redis_config.default_ttl();
                    state = state.with_price_cache(Arc::new(cache), ttl);
                }
                Ok(false) => warn!("Redis PING returned unexpected reply, continuing without price cache"),
                Err(e) => warn!(error = %e, "Redis PING failed, continuing without price cache"),
            },
            Err(e) => warn!(error = %e, "Redis unavailable, continuing without price cache"),
        }
    }

    Ok(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    init_logging(LogConfig::new("coin_api=info,coin_data=info,tower_http=debug").with_env_format())?;

    info!("Starting Coin API server...");

    let config = ServerConfig::from_env()?;
    let addr = config.socket_addr().map_err(|e| {
        error!(
            host = %config.host,
            port = config.port,
            error = %e,
            "소켓 주소 설정이 유효하지 않습니다. API_HOST, API_PORT 환경변수를 확인하세요."
        );
        e
    })?;

    let state = Arc::new(create_app_state(&config).await?);
    info!(
        version = %state.version,
        policy = ?state.formatter.policy(),
        has_notifier = state.has_notifier(),
        has_cache = state.has_price_cache(),
        "Application state initialized"
    );

    let app = create_router(state);

    info!(%addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
