//! API 토큰 관리 명령.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use sqlx::PgPool;
use tracing::info;

use coin_api::repository::{ApiToken, ApiTokenRepository, TokenStoreError};

/// 생성 토큰의 무작위 바이트 수.
pub const TOKEN_BYTES: usize = 32;

/// URL-safe 무작위 토큰을 생성합니다 (패딩 없는 base64, 43자).
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// DB에 연결하고 토큰 테이블을 준비합니다.
pub async fn connect(db_url: Option<String>) -> Result<PgPool> {
    let db_url = db_url
        .or_else(|| std::env::var("DATABASE_URL").ok())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "DATABASE_URL not found. Set DATABASE_URL environment variable or use --db-url flag"
            )
        })?;

    info!("Connecting to database...");
    let pool = PgPool::connect(&db_url)
        .await
        .context("Failed to connect to database")?;

    ApiTokenRepository::ensure_schema(&pool)
        .await
        .context("Failed to prepare api_tokens table")?;

    Ok(pool)
}

/// 토큰 상세 출력 블록.
pub fn format_token(token: &ApiToken) -> String {
    format!(
        "ID: {}\nName: {}\nToken: {}\nCreated: {}\nUpdated: {}",
        token.id, token.name, token.token, token.created_at, token.updated_at
    )
}

/// 토큰 목록 출력.
pub fn format_token_list(tokens: &[ApiToken]) -> String {
    if tokens.is_empty() {
        return "No API tokens found".to_string();
    }

    let separator = "-".repeat(50);
    let mut output = String::from("API Tokens:\n");
    output.push_str(&separator);
    output.push('\n');
    for token in tokens {
        output.push_str(&format_token(token));
        output.push('\n');
        output.push_str(&separator);
        output.push('\n');
    }
    output
}

/// 모든 토큰을 조회해 출력합니다.
pub async fn list_tokens(pool: &PgPool) -> Result<usize> {
    let tokens = ApiTokenRepository::list(pool)
        .await
        .context("Failed to list tokens")?;

    println!("{}", format_token_list(&tokens));
    Ok(tokens.len())
}

/// 토큰을 생성합니다.
///
/// `token`이 없으면 [`generate_token`]으로 만듭니다.
pub async fn create_token(pool: &PgPool, name: &str, token: Option<String>) -> Result<ApiToken> {
    let token = token.unwrap_or_else(generate_token);

    let created = ApiTokenRepository::create(pool, name, &token)
        .await
        .map_err(|e| match e {
            TokenStoreError::DuplicateName(name) => {
                anyhow::anyhow!("Token with name '{}' already exists", name)
            }
            TokenStoreError::DuplicateToken => anyhow::anyhow!("Token value already exists"),
            TokenStoreError::Database(e) => anyhow::Error::new(e).context("Failed to create token"),
        })?;

    println!("Created API token:");
    println!("  Name: {}", created.name);
    println!("  Token: {}", created.token);
    println!("  Created: {}", created.created_at);

    Ok(created)
}

/// 이름으로 토큰을 삭제합니다.
pub async fn delete_token(pool: &PgPool, name: &str) -> Result<()> {
    let deleted = ApiTokenRepository::delete(pool, name)
        .await
        .context("Failed to delete token")?;

    if !deleted {
        anyhow::bail!("Token with name '{}' not found", name);
    }

    println!("Deleted API token: {}", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_token() -> ApiToken {
        let now = Utc::now();
        ApiToken {
            id: 1,
            name: "scheduler".to_string(),
            token: "abc123".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_generated_token_decodes_to_32_bytes() {
        let decoded = URL_SAFE_NO_PAD.decode(generate_token()).unwrap();
        assert_eq!(decoded.len(), TOKEN_BYTES);
    }

    #[test]
    fn test_format_empty_list() {
        assert_eq!(format_token_list(&[]), "No API tokens found");
    }

    #[test]
    fn test_format_list_contains_fields() {
        let output = format_token_list(&[sample_token()]);
        assert!(output.starts_with("API Tokens:"));
        assert!(output.contains("ID: 1\nName: scheduler\nToken: abc123"));
        assert_eq!(output.matches(&"-".repeat(50)).count(), 2);
    }
}
