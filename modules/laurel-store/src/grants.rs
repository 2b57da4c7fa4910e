//! GrantStore — at-most-once achievement grants backed by Postgres.

use std::collections::HashSet;

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use laurel_common::{Grant, GrantOutcome};

/// Grant persistence. The composite primary key on
/// `(user_id, achievement_code)` enforces the at-most-once invariant;
/// there is no application-level locking anywhere above it.
#[derive(Clone)]
pub struct GrantStore {
    pool: PgPool,
}

impl GrantStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a grant. Under concurrent attempts for the same pair exactly
    /// one insert wins; the rest observe `AlreadyGranted`, which is a
    /// successful no-op, not an error.
    pub async fn grant(&self, user_id: Uuid, achievement_code: &str) -> Result<GrantOutcome> {
        let row = sqlx::query_as::<_, (Uuid, String, DateTime<Utc>)>(
            r#"
            INSERT INTO achievement_grants (user_id, achievement_code)
            VALUES ($1, $2)
            ON CONFLICT (user_id, achievement_code) DO NOTHING
            RETURNING user_id, achievement_code, granted_at
            "#,
        )
        .bind(user_id)
        .bind(achievement_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match row {
            Some((user_id, achievement_code, granted_at)) => GrantOutcome::Granted(Grant {
                user_id,
                achievement_code,
                granted_at,
            }),
            None => GrantOutcome::AlreadyGranted,
        })
    }

    /// The set of codes already granted to a user. One read per evaluation
    /// pass, not one lookup per definition.
    pub async fn granted_codes(&self, user_id: Uuid) -> Result<HashSet<String>> {
        let rows = sqlx::query_as::<_, (String,)>(
            "SELECT achievement_code FROM achievement_grants WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(code,)| code).collect())
    }

    /// All grants for a user, oldest first.
    pub async fn grants_for(&self, user_id: Uuid) -> Result<Vec<Grant>> {
        let rows = sqlx::query_as::<_, (Uuid, String, DateTime<Utc>)>(
            r#"
            SELECT user_id, achievement_code, granted_at
            FROM achievement_grants
            WHERE user_id = $1
            ORDER BY granted_at ASC, achievement_code ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, achievement_code, granted_at)| Grant {
                user_id,
                achievement_code,
                granted_at,
            })
            .collect())
    }
}
