//! The evaluate-and-grant composition.

use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use laurel_common::{ActivitySnapshot, Config, GrantOutcome, LaurelError};

use crate::evaluate::{evaluate, Evaluation, SkippedDefinition};
use crate::registry::ConditionRegistry;
use crate::traits::{DefinitionCatalog, GrantSink, SnapshotProvider};

/// Backoff schedule for grant writes. Delay before attempt N+1 is
/// `base * 2^N`.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base: Duration,
}

impl RetryPolicy {
    pub fn new(attempts: u32, base: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.grant_retry_attempts,
            Duration::from_millis(config.grant_retry_base_ms),
        )
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base: Duration::from_millis(200),
        }
    }
}

/// What one `evaluate_and_grant` pass did for a user.
#[derive(Debug, Default)]
pub struct EvaluationReport {
    /// Codes this pass actually persisted.
    pub newly_granted: Vec<String>,
    /// Codes that qualified but a concurrent pass won the race for.
    pub already_granted: Vec<String>,
    pub skipped: Vec<SkippedDefinition>,
}

/// Per-user, per-trigger entry point. Holds no locks; concurrent calls for
/// the same user race harmlessly on the grant store's uniqueness
/// constraint.
pub struct AchievementEngine<C, S, G> {
    catalog: C,
    snapshots: S,
    grants: G,
    registry: ConditionRegistry,
    retry: RetryPolicy,
}

impl<C, S, G> AchievementEngine<C, S, G>
where
    C: DefinitionCatalog,
    S: SnapshotProvider,
    G: GrantSink,
{
    pub fn new(catalog: C, snapshots: S, grants: G) -> Self {
        Self {
            catalog,
            snapshots,
            grants,
            registry: ConditionRegistry::standard(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_registry(mut self, registry: ConditionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Pure decision for one user: which active, ungranted definitions does
    /// this snapshot satisfy. Performs the two reads but no writes —
    /// usable synchronously for tests and admin recompute tooling.
    pub async fn evaluate_user(
        &self,
        user_id: Uuid,
        snapshot: &ActivitySnapshot,
    ) -> Result<Evaluation, LaurelError> {
        let definitions = self.catalog.list_active().await?;
        let granted = self.grants.granted_codes(user_id).await?;
        Ok(evaluate(&self.registry, &definitions, &granted, snapshot))
    }

    /// Fetch inputs, evaluate, and persist every qualifying grant. What the
    /// trigger dispatcher calls, once per affected user.
    pub async fn evaluate_and_grant(&self, user_id: Uuid) -> Result<EvaluationReport, LaurelError> {
        let snapshot = self
            .snapshots
            .snapshot(user_id)
            .await
            .map_err(|e| LaurelError::SnapshotUnavailable(e.to_string()))?;

        let Evaluation { qualified, skipped } = self.evaluate_user(user_id, &snapshot).await?;

        for skip in &skipped {
            warn!(user = %user_id, achievement = %skip.code, error = %skip.error,
                "Definition skipped during evaluation");
        }

        let mut report = EvaluationReport {
            skipped,
            ..Default::default()
        };

        for code in &qualified {
            match self.grant_with_retry(user_id, code).await? {
                GrantOutcome::Granted(_) => report.newly_granted.push(code.clone()),
                GrantOutcome::AlreadyGranted => report.already_granted.push(code.clone()),
            }
        }

        if !report.newly_granted.is_empty() {
            info!(user = %user_id, count = report.newly_granted.len(), "Achievements granted");
        }

        Ok(report)
    }

    /// Retry transient grant-write failures with exponential backoff. The
    /// uniqueness-conflict path is a success (`AlreadyGranted`) and never
    /// arrives here as an error. Exhausted retries surface to the caller
    /// so the triggering event can be redelivered.
    async fn grant_with_retry(
        &self,
        user_id: Uuid,
        code: &str,
    ) -> Result<GrantOutcome, LaurelError> {
        let mut last_error = String::new();

        for attempt in 0..self.retry.attempts {
            if attempt > 0 {
                tokio::time::sleep(self.retry.base * 2u32.pow(attempt - 1)).await;
            }

            match self.grants.grant(user_id, code).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) => {
                    warn!(user = %user_id, achievement = code, attempt, error = %e,
                        "Grant write failed");
                    last_error = e.to_string();
                }
            }
        }

        Err(LaurelError::Database(last_error))
    }
}
