//! Fans trigger events out to per-user evaluations.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use laurel_common::LaurelError;
use laurel_engine::{
    AchievementEngine, DefinitionCatalog, EvaluationReport, GrantSink, SnapshotProvider,
};

use crate::events::ActivityEvent;

/// Invokes the engine once per affected user when a domain event arrives.
///
/// Evaluations run decoupled from the triggering request. The engine's
/// idempotence makes redundant or racing triggers harmless, so there is
/// no per-user serialization here.
pub struct TriggerDispatcher<C, S, G> {
    engine: Arc<AchievementEngine<C, S, G>>,
}

impl<C, S, G> TriggerDispatcher<C, S, G>
where
    C: DefinitionCatalog + 'static,
    S: SnapshotProvider + 'static,
    G: GrantSink + 'static,
{
    pub fn new(engine: Arc<AchievementEngine<C, S, G>>) -> Self {
        Self { engine }
    }

    /// Fire-and-forget: spawn one evaluation task per affected user and
    /// return immediately. Failures are logged; a missed evaluation is
    /// picked up by whatever trigger arrives next for that user.
    pub fn dispatch(&self, event: ActivityEvent) {
        let users = event.affected_users();
        debug!(event = event.event_type_str(), users = users.len(), "Dispatching trigger");

        for user_id in users {
            let engine = self.engine.clone();
            tokio::spawn(async move {
                match engine.evaluate_and_grant(user_id).await {
                    Ok(report) if !report.newly_granted.is_empty() => {
                        info!(user = %user_id, granted = ?report.newly_granted,
                            "Trigger evaluation granted achievements");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(user = %user_id, error = %e, "Trigger evaluation failed");
                    }
                }
            });
        }
    }

    /// Evaluate every affected user and wait for the results. For tests
    /// and admin recompute, where completion must be observed.
    ///
    /// A user whose snapshot is unavailable is skipped — the next trigger
    /// for that user retries. Storage errors propagate so the event can
    /// be redelivered.
    pub async fn dispatch_wait(
        &self,
        event: ActivityEvent,
    ) -> Result<Vec<(Uuid, EvaluationReport)>, LaurelError> {
        let mut reports = Vec::new();

        for user_id in event.affected_users() {
            match self.engine.evaluate_and_grant(user_id).await {
                Ok(report) => reports.push((user_id, report)),
                Err(LaurelError::SnapshotUnavailable(reason)) => {
                    warn!(user = %user_id, reason = %reason, "Snapshot unavailable, skipping user");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(reports)
    }
}
