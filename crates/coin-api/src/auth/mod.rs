//! Bearer 토큰 인증.
//!
//! `Authorization: Bearer <token>` 또는 접두사 없는 `<token>`을 받아
//! 토큰 저장소에서 정확히 일치하는 레코드를 찾습니다.

pub mod middleware;

pub use middleware::{extract_token, TokenAuth, TokenAuthError};
