//! Collaborator seams for the achievement engine.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use laurel_common::{AchievementDefinition, ActivitySnapshot, GrantOutcome};

/// Read side of the achievement catalogue. Definitions are authored by an
/// administrator collaborator; the engine only ever sees active ones.
#[async_trait]
pub trait DefinitionCatalog: Send + Sync {
    async fn list_active(&self) -> Result<Vec<AchievementDefinition>>;
}

/// Supplies a user's current activity counters. Reads may be stale
/// relative to the latest event; a missed update self-heals on the next
/// trigger for that user.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn snapshot(&self, user_id: Uuid) -> Result<ActivitySnapshot>;
}

/// Persists grants with the at-most-once guarantee per (user, achievement).
///
/// Implemented by GrantStore (postgres) and MemoryGrantStore (tests).
#[async_trait]
pub trait GrantSink: Send + Sync {
    /// The codes already granted to a user. One read per evaluation pass.
    async fn granted_codes(&self, user_id: Uuid) -> Result<HashSet<String>>;

    /// Idempotent write. A duplicate attempt resolves to `AlreadyGranted`,
    /// never an error.
    async fn grant(&self, user_id: Uuid, achievement_code: &str) -> Result<GrantOutcome>;
}

// ---------------------------------------------------------------------------
// Arc<T> blankets — let the engine and test assertions share one instance
// ---------------------------------------------------------------------------

#[async_trait]
impl<T: DefinitionCatalog + ?Sized> DefinitionCatalog for Arc<T> {
    async fn list_active(&self) -> Result<Vec<AchievementDefinition>> {
        (**self).list_active().await
    }
}

#[async_trait]
impl<T: SnapshotProvider + ?Sized> SnapshotProvider for Arc<T> {
    async fn snapshot(&self, user_id: Uuid) -> Result<ActivitySnapshot> {
        (**self).snapshot(user_id).await
    }
}

#[async_trait]
impl<T: GrantSink + ?Sized> GrantSink for Arc<T> {
    async fn granted_codes(&self, user_id: Uuid) -> Result<HashSet<String>> {
        (**self).granted_codes(user_id).await
    }

    async fn grant(&self, user_id: Uuid, achievement_code: &str) -> Result<GrantOutcome> {
        (**self).grant(user_id, achievement_code).await
    }
}
