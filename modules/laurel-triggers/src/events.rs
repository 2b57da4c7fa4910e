//! Domain events that trigger re-evaluation.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Activity events the platform emits. The dispatcher only needs to know
/// which users each event touches; counter bookkeeping happens upstream
/// in the snapshot provider's domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActivityEvent {
    GatheringCompleted { host: Uuid, attendees: Vec<Uuid> },
    ReviewSubmitted { reviewee: Uuid },
    StreakUpdated { user: Uuid },
    PointsAwarded { user: Uuid },
    LevelChanged { user: Uuid },
    UserRegistered { user: Uuid },
}

impl ActivityEvent {
    /// The event type string used in logs.
    pub fn event_type_str(&self) -> &'static str {
        match self {
            ActivityEvent::GatheringCompleted { .. } => "gathering:completed",
            ActivityEvent::ReviewSubmitted { .. } => "review:submitted",
            ActivityEvent::StreakUpdated { .. } => "streak:updated",
            ActivityEvent::PointsAwarded { .. } => "points:awarded",
            ActivityEvent::LevelChanged { .. } => "level:changed",
            ActivityEvent::UserRegistered { .. } => "user:registered",
        }
    }

    /// Users whose achievements this event can affect, deduplicated —
    /// a host attending their own gathering is evaluated once.
    pub fn affected_users(&self) -> Vec<Uuid> {
        let mut users = match self {
            ActivityEvent::GatheringCompleted { host, attendees } => {
                let mut users = vec![*host];
                users.extend(attendees.iter().copied());
                users
            }
            ActivityEvent::ReviewSubmitted { reviewee } => vec![*reviewee],
            ActivityEvent::StreakUpdated { user }
            | ActivityEvent::PointsAwarded { user }
            | ActivityEvent::LevelChanged { user }
            | ActivityEvent::UserRegistered { user } => vec![*user],
        };

        let mut seen = HashSet::new();
        users.retain(|user| seen.insert(*user));
        users
    }
}
