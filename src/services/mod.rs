//! Orchestration over the repository and the scheduling core.
//!
//! Services load what an operation needs from a [`FullRepository`], run the
//! pure scheduler functions, and write the result back. They hold no state
//! of their own.

pub mod directory;
pub mod rotation;
pub mod schedule;

pub use directory::remove_area;
pub use rotation::{regenerate_rotation, RotationOutcome};
pub use schedule::{auto_fill_slots, build_slots, save_schedule, schedule_slots};
