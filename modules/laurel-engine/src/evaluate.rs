//! The pure evaluation pass.

use std::collections::HashSet;

use laurel_common::{AchievementDefinition, ActivitySnapshot, LaurelError};

use crate::registry::ConditionRegistry;

/// A definition the pass could not evaluate. Collected and reported,
/// never fatal to the rest of the pass.
#[derive(Debug)]
pub struct SkippedDefinition {
    pub code: String,
    pub error: LaurelError,
}

/// Result of one evaluation pass over a user's snapshot.
#[derive(Debug, Default)]
pub struct Evaluation {
    /// Every active, not-yet-granted code whose condition the snapshot
    /// satisfies. A single snapshot update can cross several thresholds
    /// at once, so this is the full set, not the first match.
    pub qualified: Vec<String>,
    pub skipped: Vec<SkippedDefinition>,
}

/// Decide which achievements the user newly qualifies for.
///
/// Pure and side-effect-free: no I/O, no writes. A failure on one
/// definition is isolated into `skipped` and evaluation continues.
pub fn evaluate(
    registry: &ConditionRegistry,
    definitions: &[AchievementDefinition],
    granted: &HashSet<String>,
    snapshot: &ActivitySnapshot,
) -> Evaluation {
    let mut evaluation = Evaluation::default();

    for definition in definitions {
        if !definition.is_active || granted.contains(&definition.code) {
            continue;
        }

        match registry.satisfies(definition, snapshot) {
            Ok(true) => evaluation.qualified.push(definition.code.clone()),
            Ok(false) => {}
            Err(error) => evaluation.skipped.push(SkippedDefinition {
                code: definition.code.clone(),
                error,
            }),
        }
    }

    evaluation
}
