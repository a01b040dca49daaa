//! cinegen-core: shared types, IDs, errors and the pipeline event bus.
//!
//! This crate is the foundational dependency of the `cinegen` client. It
//! holds the brief and scene data model, the stage enums, the unified error
//! type (including the normalized [`StageFailure`] every remote call resolves
//! to), and a broadcast event bus for progress reporting.

pub mod brief;
pub mod error;
pub mod events;
pub mod ids;
pub mod scene;
pub mod stage;

// Re-export the most commonly used items at the crate root.
pub use brief::*;
pub use error::{Error, FailureKind, Result, StageFailure, StageResult};
pub use ids::RunId;
pub use scene::*;
pub use stage::*;
