//! DefinitionStore — the achievement catalogue's read side, plus the
//! admin upsert that keeps the table populatable. The engine only reads.

use anyhow::Result;
use sqlx::PgPool;

use laurel_common::{AchievementCategory, AchievementDefinition};

#[derive(Clone)]
pub struct DefinitionStore {
    pool: PgPool,
}

type DefinitionRow = (String, String, String, i64, Option<String>, bool);

impl DefinitionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active definitions only. Deactivated definitions stop granting but
    /// their past grants stand.
    pub async fn list_active(&self) -> Result<Vec<AchievementDefinition>> {
        let rows = sqlx::query_as::<_, DefinitionRow>(
            r#"
            SELECT code, category, condition_type, condition_value, target_category, is_active
            FROM achievement_definitions
            WHERE is_active
            ORDER BY code ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(from_row).collect()
    }

    /// Create or replace a definition. Administrator-facing.
    pub async fn upsert(&self, definition: &AchievementDefinition) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO achievement_definitions
                (code, category, condition_type, condition_value, target_category, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (code)
            DO UPDATE SET category = EXCLUDED.category,
                          condition_type = EXCLUDED.condition_type,
                          condition_value = EXCLUDED.condition_value,
                          target_category = EXCLUDED.target_category,
                          is_active = EXCLUDED.is_active
            "#,
        )
        .bind(&definition.code)
        .bind(definition.category.as_str())
        .bind(&definition.condition_type)
        .bind(definition.condition_value)
        .bind(&definition.target_category)
        .bind(definition.is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn from_row(row: DefinitionRow) -> Result<AchievementDefinition> {
    let (code, category, condition_type, condition_value, target_category, is_active) = row;
    Ok(AchievementDefinition {
        code,
        category: category.parse::<AchievementCategory>()?,
        condition_type,
        condition_value,
        target_category,
        is_active,
    })
}
