//! Schema bootstrap, shared by the migrate binary and gated tests.

use anyhow::Result;
use sqlx::PgPool;

/// Create the achievement tables if they do not exist. Idempotent.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS achievement_definitions (
            code             TEXT     PRIMARY KEY,
            category         TEXT     NOT NULL,
            condition_type   TEXT     NOT NULL,
            condition_value  BIGINT   NOT NULL,
            target_category  TEXT,
            is_active        BOOLEAN  NOT NULL DEFAULT TRUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS achievement_grants (
            user_id          UUID         NOT NULL,
            achievement_code TEXT         NOT NULL,
            granted_at       TIMESTAMPTZ  NOT NULL DEFAULT now(),
            PRIMARY KEY (user_id, achievement_code)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
