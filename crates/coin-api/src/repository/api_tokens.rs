//! API Token Repository
//!
//! Bearer 인증에 사용하는 API 토큰의 저장과 조회를 담당합니다.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use tokio::sync::RwLock;

// ================================================================================================
// Types
// ================================================================================================

/// API 토큰 레코드
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ApiToken {
    pub id: i32,
    /// 클라이언트 이름 (고유)
    pub name: String,
    /// 토큰 값 (고유)
    #[serde(skip_serializing)]
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 토큰 저장소 에러
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Token with name '{0}' already exists")]
    DuplicateName(String),

    #[error("Token value already exists")]
    DuplicateToken,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ================================================================================================
// Repository
// ================================================================================================

/// API Token Repository
pub struct ApiTokenRepository;

impl ApiTokenRepository {
    /// `api_tokens` 테이블이 없으면 생성합니다.
    pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS api_tokens (
                id SERIAL PRIMARY KEY,
                name VARCHAR NOT NULL UNIQUE,
                token VARCHAR NOT NULL UNIQUE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// 토큰 값으로 조회 (정확히 일치)
    pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<ApiToken>, sqlx::Error> {
        sqlx::query_as::<_, ApiToken>(
            r#"
            SELECT id, name, token, created_at, updated_at
            FROM api_tokens
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await
    }

    /// 이름으로 조회
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<ApiToken>, sqlx::Error> {
        sqlx::query_as::<_, ApiToken>(
            r#"
            SELECT id, name, token, created_at, updated_at
            FROM api_tokens
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    /// 전체 토큰 목록 (생성 순)
    pub async fn list(pool: &PgPool) -> Result<Vec<ApiToken>, sqlx::Error> {
        sqlx::query_as::<_, ApiToken>(
            r#"
            SELECT id, name, token, created_at, updated_at
            FROM api_tokens
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await
    }

    /// 새 토큰 생성
    ///
    /// 이름이나 토큰 값이 이미 있으면 거부합니다.
    pub async fn create(pool: &PgPool, name: &str, token: &str) -> Result<ApiToken, TokenStoreError> {
        if Self::find_by_name(pool, name).await?.is_some() {
            return Err(TokenStoreError::DuplicateName(name.to_string()));
        }
        if Self::find_by_token(pool, token).await?.is_some() {
            return Err(TokenStoreError::DuplicateToken);
        }

        let record = sqlx::query_as::<_, ApiToken>(
            r#"
            INSERT INTO api_tokens (name, token)
            VALUES ($1, $2)
            RETURNING id, name, token, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(token)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            // 동시 생성으로 고유 제약 위반
            let name_conflict = e
                .as_database_error()
                .filter(|db| db.is_unique_violation())
                .map(|db| db.constraint().is_some_and(|c| c.contains("name")));
            match name_conflict {
                Some(true) => TokenStoreError::DuplicateName(name.to_string()),
                Some(false) => TokenStoreError::DuplicateToken,
                None => TokenStoreError::Database(e),
            }
        })?;

        Ok(record)
    }

    /// 이름으로 삭제, 삭제 여부 반환
    pub async fn delete(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM api_tokens WHERE name = $1")
            .bind(name)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ================================================================================================
// Token Store (인증 추출기용)
// ================================================================================================

/// 인증 추출기가 사용하는 토큰 조회 인터페이스.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// 토큰 값과 정확히 일치하는 레코드를 찾습니다.
    async fn find_by_token(&self, token: &str) -> Result<Option<ApiToken>, TokenStoreError>;
}

/// PostgreSQL 기반 토큰 저장소.
#[derive(Debug, Clone)]
pub struct PgTokenStore {
    pool: PgPool,
}

impl PgTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TokenStore for PgTokenStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<ApiToken>, TokenStoreError> {
        Ok(ApiTokenRepository::find_by_token(&self.pool, token).await?)
    }
}

/// 메모리 토큰 저장소 (테스트/로컬 개발용).
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Arc<RwLock<Vec<ApiToken>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 토큰을 추가합니다.
    pub async fn insert(&self, name: &str, token: &str) -> Result<ApiToken, TokenStoreError> {
        let mut tokens = self.tokens.write().await;
        if tokens.iter().any(|t| t.name == name) {
            return Err(TokenStoreError::DuplicateName(name.to_string()));
        }
        if tokens.iter().any(|t| t.token == token) {
            return Err(TokenStoreError::DuplicateToken);
        }

        let now = Utc::now();
        let record = ApiToken {
            id: tokens.len() as i32 + 1,
            name: name.to_string(),
            token: token.to_string(),
            created_at: now,
            updated_at: now,
        };
        tokens.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn find_by_token(&self, token: &str) -> Result<Option<ApiToken>, TokenStoreError> {
        Ok(self
            .tokens
            .read()
            .await
            .iter()
            .find(|t| t.token == token)
            .cloned())
    }
}
