//! Cycle generation with fair staff rotation.
//!
//! Lays out the slots of a new cycle over a date range and assigns
//! staff round-robin, continuing from where the previous cycle left
//! off. The output is plain `(date, staff)` tuples; creating the cycle
//! and event rows is the caller's concern.
//!
//! # Fairness
//!
//! Rotation order is the roster order (or a seeded shuffle of it for a
//! first cycle). Every staff member is assigned once before anyone is
//! assigned twice.

mod cycle;
mod rotation;

pub use cycle::{CycleGenerator, GeneratedSlot, GenerationRequest};
pub use rotation::Rotation;
