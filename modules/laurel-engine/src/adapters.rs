//! Collaborator implementations.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use laurel_common::{AchievementDefinition, ActivitySnapshot, Grant, GrantOutcome};
use laurel_store::{DefinitionStore, GrantStore};

use crate::traits::{DefinitionCatalog, GrantSink, SnapshotProvider};

// ---------------------------------------------------------------------------
// Postgres adapters (production)
// ---------------------------------------------------------------------------

#[async_trait]
impl DefinitionCatalog for DefinitionStore {
    async fn list_active(&self) -> Result<Vec<AchievementDefinition>> {
        DefinitionStore::list_active(self).await
    }
}

#[async_trait]
impl GrantSink for GrantStore {
    async fn granted_codes(&self, user_id: Uuid) -> Result<HashSet<String>> {
        GrantStore::granted_codes(self, user_id).await
    }

    async fn grant(&self, user_id: Uuid, achievement_code: &str) -> Result<GrantOutcome> {
        GrantStore::grant(self, user_id, achievement_code).await
    }
}

// ---------------------------------------------------------------------------
// Memory fakes (tests — no database required)
// ---------------------------------------------------------------------------

/// In-memory catalogue for tests.
#[derive(Default)]
pub struct MemoryCatalog {
    definitions: Mutex<Vec<AchievementDefinition>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, definition: AchievementDefinition) {
        self.definitions.lock().unwrap().push(definition);
    }
}

#[async_trait]
impl DefinitionCatalog for MemoryCatalog {
    async fn list_active(&self) -> Result<Vec<AchievementDefinition>> {
        Ok(self
            .definitions
            .lock()
            .unwrap()
            .iter()
            .filter(|d| d.is_active)
            .cloned()
            .collect())
    }
}

/// In-memory snapshot provider for tests. A user with no snapshot set
/// reads as unavailable, like a provider outage.
#[derive(Default)]
pub struct MemorySnapshots {
    snapshots: Mutex<HashMap<Uuid, ActivitySnapshot>>,
}

impl MemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, user_id: Uuid, snapshot: ActivitySnapshot) {
        self.snapshots.lock().unwrap().insert(user_id, snapshot);
    }
}

#[async_trait]
impl SnapshotProvider for MemorySnapshots {
    async fn snapshot(&self, user_id: Uuid) -> Result<ActivitySnapshot> {
        self.snapshots
            .lock()
            .unwrap()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| anyhow!("no snapshot for user {user_id}"))
    }
}

/// In-memory grant store. A single lock around check-and-insert mirrors
/// the database uniqueness constraint, so concurrency tests exercise the
/// same at-most-once contract. Thread-safe.
#[derive(Default)]
pub struct MemoryGrantStore {
    grants: Mutex<Vec<Grant>>,
}

impl MemoryGrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded grants (for test assertions).
    pub fn grants(&self) -> Vec<Grant> {
        self.grants.lock().unwrap().clone()
    }
}

#[async_trait]
impl GrantSink for MemoryGrantStore {
    async fn granted_codes(&self, user_id: Uuid) -> Result<HashSet<String>> {
        Ok(self
            .grants
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.user_id == user_id)
            .map(|g| g.achievement_code.clone())
            .collect())
    }

    async fn grant(&self, user_id: Uuid, achievement_code: &str) -> Result<GrantOutcome> {
        let mut grants = self.grants.lock().unwrap();

        if grants
            .iter()
            .any(|g| g.user_id == user_id && g.achievement_code == achievement_code)
        {
            return Ok(GrantOutcome::AlreadyGranted);
        }

        let grant = Grant {
            user_id,
            achievement_code: achievement_code.to_string(),
            granted_at: Utc::now(),
        };
        grants.push(grant.clone());

        Ok(GrantOutcome::Granted(grant))
    }
}
