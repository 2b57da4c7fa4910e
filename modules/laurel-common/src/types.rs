//! Core domain types for the achievement engine.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LaurelError;

/// Condition-type codes known to the standard registry.
///
/// Definitions reference these as plain strings (admin-authored data);
/// an unrecognized code is a per-definition error at evaluation time,
/// not a parse failure at the catalogue boundary.
pub mod condition_code {
    pub const GATHERING_HOST_COUNT: &str = "GATHERING_HOST_COUNT";
    pub const GATHERING_ATTEND_COUNT: &str = "GATHERING_ATTEND_COUNT";
    pub const REVIEW_RATING_AVG: &str = "REVIEW_RATING_AVG";
    pub const CONSECUTIVE_DAYS: &str = "CONSECUTIVE_DAYS";
    pub const POINT_TOTAL: &str = "POINT_TOTAL";
    pub const LEVEL: &str = "LEVEL";
    pub const CATEGORY_SPECIALIST: &str = "CATEGORY_SPECIALIST";
    pub const EARLY_USER: &str = "EARLY_USER";
}

// --- Achievement definitions ---

/// Display grouping for achievements. No effect on evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Basic,
    Host,
    Special,
    Seasonal,
}

impl AchievementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AchievementCategory::Basic => "basic",
            AchievementCategory::Host => "host",
            AchievementCategory::Special => "special",
            AchievementCategory::Seasonal => "seasonal",
        }
    }
}

impl std::fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AchievementCategory {
    type Err = LaurelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(AchievementCategory::Basic),
            "host" => Ok(AchievementCategory::Host),
            "special" => Ok(AchievementCategory::Special),
            "seasonal" => Ok(AchievementCategory::Seasonal),
            other => Err(LaurelError::Validation(format!(
                "unknown achievement category: {other}"
            ))),
        }
    }
}

/// An administrator-authored achievement definition. The engine only ever
/// reads these; authoring and editing live elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDefinition {
    /// Unique identity of the achievement.
    pub code: String,
    pub category: AchievementCategory,
    /// Registry code selecting the extraction/comparison behavior.
    pub condition_type: String,
    /// Threshold the metric must reach, or rank bound it must beat.
    pub condition_value: i64,
    /// Which category a CATEGORY_SPECIALIST threshold applies to.
    /// Ignored by every other condition type.
    pub target_category: Option<String>,
    /// Deactivation stops future grants but never revokes past ones.
    pub is_active: bool,
}

impl AchievementDefinition {
    pub fn new(
        code: impl Into<String>,
        category: AchievementCategory,
        condition_type: impl Into<String>,
        condition_value: i64,
    ) -> Self {
        Self {
            code: code.into(),
            category,
            condition_type: condition_type.into(),
            condition_value,
            target_category: None,
            is_active: true,
        }
    }

    pub fn with_target_category(mut self, category: impl Into<String>) -> Self {
        self.target_category = Some(category.into());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}

// --- Activity snapshots ---

/// Point-in-time read of a user's activity counters. May be stale relative
/// to the latest event; a missed update is picked up on the next trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub hosted_count: i64,
    pub attended_count: i64,
    /// Average rating received, fixed-point ×10 (e.g. 45 = 4.5 stars).
    pub review_rating_avg_x10: i64,
    pub streak_days: i64,
    pub point_total: i64,
    pub level: i64,
    /// Participation counts keyed by gathering category.
    pub category_attend_counts: HashMap<String, i64>,
    /// Global registration rank, if the user has one.
    pub registration_rank: Option<i64>,
}

// --- Grants ---

/// The durable record that a user earned an achievement. Created at most
/// once per (user, achievement) pair, never updated, never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grant {
    pub user_id: Uuid,
    pub achievement_code: String,
    pub granted_at: DateTime<Utc>,
}

/// Outcome of a grant attempt. A duplicate attempt is a successful no-op,
/// not an error — concurrent evaluations race on purpose.
#[derive(Debug, Clone)]
pub enum GrantOutcome {
    Granted(Grant),
    AlreadyGranted,
}

impl GrantOutcome {
    pub fn is_new(&self) -> bool {
        matches!(self, GrantOutcome::Granted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for category in [
            AchievementCategory::Basic,
            AchievementCategory::Host,
            AchievementCategory::Special,
            AchievementCategory::Seasonal,
        ] {
            assert_eq!(category.as_str().parse::<AchievementCategory>().unwrap(), category);
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert!("golden".parse::<AchievementCategory>().is_err());
    }
}
