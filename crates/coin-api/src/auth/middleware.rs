//! Axum용 토큰 인증 추출기.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn};

use crate::error::ApiErrorResponse;
use crate::repository::ApiToken;
use crate::state::AppState;

/// 토큰 인증 추출기.
///
/// 인증된 클라이언트의 토큰 레코드를 담습니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// async fn protected_handler(TokenAuth(client): TokenAuth) -> impl IntoResponse {
///     format!("Authenticated client: {}", client.name)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TokenAuth(pub ApiToken);

/// 토큰 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenAuthError {
    #[error("Authorization header required")]
    MissingToken,
    #[error("Invalid API token")]
    InvalidToken,
    #[error("Token store unavailable")]
    StoreUnavailable,
}

impl IntoResponse for TokenAuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            TokenAuthError::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_TOKEN"),
            TokenAuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            TokenAuthError::StoreUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, "TOKEN_STORE_ERROR")
            }
        };

        (status, Json(ApiErrorResponse::new(code, self.to_string()))).into_response()
    }
}

/// Authorization 헤더 값에서 토큰을 꺼냅니다.
///
/// `Bearer ` 접두사가 있으면 제거하고, 없으면 값 전체를 토큰으로 봅니다.
/// 빈 값은 `None`.
pub fn extract_token(header_value: &str) -> Option<&str> {
    let token = header_value
        .strip_prefix("Bearer ")
        .unwrap_or(header_value)
        .trim();

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// 로그용 토큰 앞부분.
fn token_prefix(token: &str) -> &str {
    match token.char_indices().nth(10) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}

impl FromRequestParts<Arc<AppState>> for TokenAuth {
    type Rejection = TokenAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_token)
            .ok_or(TokenAuthError::MissingToken)?;

        let record = state.token_store.find_by_token(token).await.map_err(|e| {
            error!(error = %e, "토큰 조회 실패");
            TokenAuthError::StoreUnavailable
        })?;

        match record {
            Some(record) => {
                info!(client = %record.name, "Authenticated request");
                Ok(TokenAuth(record))
            }
            None => {
                warn!("Invalid API token attempted: {}...", token_prefix(token));
                Err(TokenAuthError::InvalidToken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_bearer_and_bare() {
        assert_eq!(extract_token("Bearer abc123"), Some("abc123"));
        assert_eq!(extract_token("abc123"), Some("abc123"));
        assert_eq!(extract_token("Bearer "), None);
        assert_eq!(extract_token(""), None);
        // 접두사는 대소문자를 구분
        assert_eq!(extract_token("bearer abc"), Some("bearer abc"));
    }

    #[test]
    fn test_token_prefix() {
        assert_eq!(token_prefix("0123456789abcdef"), "0123456789");
        assert_eq!(token_prefix("short"), "short");
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            TokenAuthError::MissingToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TokenAuthError::InvalidToken.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            TokenAuthError::StoreUnavailable.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
