//! Pure scheduling core.
//!
//! Everything in this module is a total function over plain values: no
//! repository access, no clocks, no randomness. The services layer wires
//! these into persisted state.

pub mod autofill;
pub mod expand;
pub mod merge;
pub mod rotation;

pub use autofill::{auto_fill, eligible_volunteers};
pub use expand::{expand_slots, team_for_date};
pub use merge::merge_days;
pub use rotation::generate_rotation;
