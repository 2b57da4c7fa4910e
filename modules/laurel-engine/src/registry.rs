//! Condition type registry.
//!
//! A fixed map from condition-type code to a pure extractor over the
//! activity snapshot, paired with the comparison rule for that kind of
//! condition. New thresholds are catalogue data; a new kind of condition
//! is one `register` call.

use std::collections::HashMap;

use laurel_common::condition_code;
use laurel_common::{AchievementDefinition, ActivitySnapshot, LaurelError};

/// How an extracted metric is compared against `condition_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Metric must reach the threshold (counts, totals, streaks).
    AtLeast,
    /// Metric must not exceed the bound (registration rank).
    AtMost,
}

/// Pure metric extraction. No I/O, no mutation — everything needed is
/// already in the snapshot. `Ok(None)` means the metric does not exist
/// for this user (e.g. no registration rank): never qualifies, not an
/// error.
pub type Extractor =
    fn(&ActivitySnapshot, &AchievementDefinition) -> Result<Option<i64>, LaurelError>;

struct Condition {
    rule: Comparison,
    extract: Extractor,
}

pub struct ConditionRegistry {
    conditions: HashMap<String, Condition>,
}

impl ConditionRegistry {
    pub fn empty() -> Self {
        Self {
            conditions: HashMap::new(),
        }
    }

    /// The condition set observed in the domain.
    pub fn standard() -> Self {
        let mut registry = Self::empty();

        registry.register(
            condition_code::GATHERING_HOST_COUNT,
            Comparison::AtLeast,
            |snapshot, _| Ok(Some(snapshot.hosted_count)),
        );
        registry.register(
            condition_code::GATHERING_ATTEND_COUNT,
            Comparison::AtLeast,
            |snapshot, _| Ok(Some(snapshot.attended_count)),
        );
        registry.register(
            condition_code::REVIEW_RATING_AVG,
            Comparison::AtLeast,
            |snapshot, _| Ok(Some(snapshot.review_rating_avg_x10)),
        );
        registry.register(
            condition_code::CONSECUTIVE_DAYS,
            Comparison::AtLeast,
            |snapshot, _| Ok(Some(snapshot.streak_days)),
        );
        registry.register(
            condition_code::POINT_TOTAL,
            Comparison::AtLeast,
            |snapshot, _| Ok(Some(snapshot.point_total)),
        );
        registry.register(condition_code::LEVEL, Comparison::AtLeast, |snapshot, _| {
            Ok(Some(snapshot.level))
        });
        registry.register(
            condition_code::CATEGORY_SPECIALIST,
            Comparison::AtLeast,
            |snapshot, definition| {
                let Some(category) = definition.target_category.as_deref() else {
                    return Err(LaurelError::MalformedDefinition {
                        code: definition.code.clone(),
                        reason: "CATEGORY_SPECIALIST requires target_category".into(),
                    });
                };
                // A category the user never attended counts as zero.
                Ok(Some(
                    snapshot
                        .category_attend_counts
                        .get(category)
                        .copied()
                        .unwrap_or(0),
                ))
            },
        );
        registry.register(
            condition_code::EARLY_USER,
            Comparison::AtMost,
            |snapshot, _| Ok(snapshot.registration_rank),
        );

        registry
    }

    /// Add a condition kind. Replaces any previous entry for the code.
    pub fn register(&mut self, code: impl Into<String>, rule: Comparison, extract: Extractor) {
        self.conditions.insert(code.into(), Condition { rule, extract });
    }

    /// Whether the snapshot satisfies the definition's condition.
    pub fn satisfies(
        &self,
        definition: &AchievementDefinition,
        snapshot: &ActivitySnapshot,
    ) -> Result<bool, LaurelError> {
        let condition = self
            .conditions
            .get(&definition.condition_type)
            .ok_or_else(|| LaurelError::UnknownConditionType(definition.condition_type.clone()))?;

        let Some(value) = (condition.extract)(snapshot, definition)? else {
            return Ok(false);
        };

        Ok(match condition.rule {
            Comparison::AtLeast => value >= definition.condition_value,
            Comparison::AtMost => value <= definition.condition_value,
        })
    }
}

impl Default for ConditionRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
