//! Integration tests for the Postgres stores.
//! Requires a Postgres instance. Set DATABASE_TEST_URL or these tests are skipped.

use sqlx::PgPool;
use uuid::Uuid;

use laurel_common::condition_code;
use laurel_common::{AchievementCategory, AchievementDefinition, GrantOutcome};
use laurel_store::{ensure_schema, DefinitionStore, GrantStore};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_TEST_URL").ok()?;
    let pool = PgPool::connect(&url).await.ok()?;
    ensure_schema(&pool).await.ok()?;
    Some(pool)
}

/// Codes are suffixed per test run so parallel tests and reruns never
/// collide in the shared definitions table.
fn unique_code(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

// =========================================================================
// GrantStore
// =========================================================================

#[tokio::test]
async fn grant_inserts_once_then_reports_already_granted() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = GrantStore::new(pool);
    let user = Uuid::new_v4();

    let first = store.grant(user, "REGULAR").await.unwrap();
    let GrantOutcome::Granted(grant) = first else {
        panic!("first attempt must insert");
    };
    assert_eq!(grant.user_id, user);
    assert_eq!(grant.achievement_code, "REGULAR");

    let second = store.grant(user, "REGULAR").await.unwrap();
    assert!(matches!(second, GrantOutcome::AlreadyGranted));

    assert_eq!(store.grants_for(user).await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_grants_produce_a_single_row() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = GrantStore::new(pool);
    let user = Uuid::new_v4();

    let attempts = (0..8).map(|_| store.grant(user, "VETERAN"));
    let outcomes = futures::future::join_all(attempts).await;

    let inserted = outcomes
        .into_iter()
        .filter(|o| matches!(o, Ok(GrantOutcome::Granted(_))))
        .count();

    assert_eq!(inserted, 1);
    assert_eq!(store.grants_for(user).await.unwrap().len(), 1);
}

#[tokio::test]
async fn granted_codes_returns_the_full_set() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = GrantStore::new(pool);
    let user = Uuid::new_v4();

    store.grant(user, "REGULAR").await.unwrap();
    store.grant(user, "HOST_FIRST").await.unwrap();

    let codes = store.granted_codes(user).await.unwrap();
    assert_eq!(codes.len(), 2);
    assert!(codes.contains("REGULAR"));
    assert!(codes.contains("HOST_FIRST"));

    // Another user's grants are invisible.
    let other = Uuid::new_v4();
    assert!(store.granted_codes(other).await.unwrap().is_empty());
}

// =========================================================================
// DefinitionStore
// =========================================================================

#[tokio::test]
async fn list_active_excludes_deactivated_definitions() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = DefinitionStore::new(pool);

    let active_code = unique_code("REGULAR");
    let retired_code = unique_code("SEASONAL");

    store
        .upsert(&AchievementDefinition::new(
            &active_code,
            AchievementCategory::Basic,
            condition_code::GATHERING_ATTEND_COUNT,
            5,
        ))
        .await
        .unwrap();
    store
        .upsert(
            &AchievementDefinition::new(
                &retired_code,
                AchievementCategory::Seasonal,
                condition_code::EARLY_USER,
                100,
            )
            .inactive(),
        )
        .await
        .unwrap();

    let active = store.list_active().await.unwrap();
    assert!(active.iter().any(|d| d.code == active_code));
    assert!(!active.iter().any(|d| d.code == retired_code));
}

#[tokio::test]
async fn upsert_replaces_an_existing_definition() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let store = DefinitionStore::new(pool);

    let code = unique_code("BOARD_GAME_GURU");
    let original = AchievementDefinition::new(
        &code,
        AchievementCategory::Special,
        condition_code::CATEGORY_SPECIALIST,
        10,
    )
    .with_target_category("board_games");
    store.upsert(&original).await.unwrap();

    let mut raised = original.clone();
    raised.condition_value = 25;
    store.upsert(&raised).await.unwrap();

    let fetched = store
        .list_active()
        .await
        .unwrap()
        .into_iter()
        .find(|d| d.code == code)
        .expect("definition should be listed");

    assert_eq!(fetched.condition_value, 25);
    assert_eq!(fetched.category, AchievementCategory::Special);
    assert_eq!(fetched.target_category.as_deref(), Some("board_games"));
}
