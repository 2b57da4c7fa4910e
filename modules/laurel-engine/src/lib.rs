//! Achievement evaluation and grant engine.
//!
//! Given the active achievement catalogue and a user's activity snapshot,
//! decides which achievements the user newly qualifies for and persists at
//! most one grant per (user, achievement) pair. Correctness under
//! concurrent triggers rests entirely on the grant store's uniqueness
//! constraint — there is no engine-level locking.
//!
//! Consumers wire the engine to their storage by implementing
//! `DefinitionCatalog`, `SnapshotProvider`, and `GrantSink`.

pub mod adapters;
pub mod evaluate;
pub mod orchestrate;
pub mod registry;
pub mod traits;

pub use adapters::{MemoryCatalog, MemoryGrantStore, MemorySnapshots};
pub use evaluate::{evaluate, Evaluation, SkippedDefinition};
pub use orchestrate::{AchievementEngine, EvaluationReport, RetryPolicy};
pub use registry::{Comparison, ConditionRegistry, Extractor};
pub use traits::{DefinitionCatalog, GrantSink, SnapshotProvider};
