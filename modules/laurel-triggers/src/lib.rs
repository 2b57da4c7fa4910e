//! Trigger boundary for the achievement engine.
//!
//! Domain events name the users they touch; the dispatcher invokes one
//! decoupled evaluation per affected user. The event transport itself is
//! a collaborator concern.

pub mod dispatcher;
pub mod events;

pub use dispatcher::TriggerDispatcher;
pub use events::ActivityEvent;
