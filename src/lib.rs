//! Recurring duty rotation engine.
//!
//! Keeps recurring staff duties (daily cleaning pairs, weekly OpenTalk
//! presenters) on valid dates as the calendar changes: new holidays
//! ripple events forward, manual moves push collisions aside, and new
//! cycles continue the rotation where the last one stopped.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Cycle`, `Event`, `Staff`, `HolidayCalendar`,
//!   `ChangeSet`, `Resolution`
//! - **`cadence`**: Valid-date rules per schedule type (`next_slot`, `is_valid_slot`)
//! - **`ripple`**: Forward re-dating walker with the holiday and manual-move resolvers
//! - **`generator`**: New cycle layout with round-robin rotation
//! - **`applier`**: Single-batch persistence of a change-set
//! - **`engine`**: Read → compute → write operations over a `ScheduleStore`
//! - **`store`**: Persistence traits and an in-memory reference store
//! - **`validation`**: Input integrity checks (duplicate IDs, empty cycles)
//! - **`config`**: Engine configuration
//!
//! # Architecture
//!
//! Resolvers are pure functions of a loaded snapshot. Only the engine
//! talks to the store, and only through one batch write per operation.
//! Pairings (who serves together) are never changed by rescheduling;
//! only dates move.

pub mod applier;
pub mod cadence;
pub mod config;
pub mod engine;
pub mod error;
pub mod generator;
pub mod models;
pub mod ripple;
pub mod store;
pub mod validation;

pub use config::EngineConfig;
pub use engine::RescheduleEngine;
pub use error::{EngineError, Result};
