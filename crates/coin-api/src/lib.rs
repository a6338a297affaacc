//! # Coin API
//!
//! 코인 시세 릴레이 REST API 서버 라이브러리.
//!
//! # 모듈 구조
//!
//! - `auth`: Bearer 토큰 인증 추출기
//! - `error`: 통합 에러 응답 타입
//! - `repository`: API 토큰 저장소 (PostgreSQL)
//! - `routes`: REST 엔드포인트
//! - `state`: 핸들러 공유 상태

pub mod auth;
pub mod error;
pub mod repository;
pub mod routes;
pub mod state;

pub use error::{ApiErrorResponse, ApiResult};
pub use routes::create_api_router;
pub use state::AppState;
