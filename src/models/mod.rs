//! Rescheduling domain models.
//!
//! Provides the value types the algorithms pass around: cycles and
//! their events, the holiday calendar, staff, and the updates a
//! computation produces. All of them are plain data; the persistence
//! collaborator is the only mutable boundary.
//!
//! # Domain Mappings
//!
//! | u-rota | Cleaning duty | OpenTalk |
//! |--------|---------------|----------|
//! | Cycle | One roster rotation | One presentation season |
//! | Event | A cleaning day | A presentation week |
//! | Staff | Cleaner pair member | Presenter |

mod calendar;
mod cycle;
mod event;
mod ids;
mod schedule_type;
mod snapshot;
mod staff;
mod update;

pub use calendar::{DateRange, HolidayCalendar};
pub use cycle::Cycle;
pub use event::Event;
pub use ids::{CycleId, EventId, StaffId};
pub use schedule_type::ScheduleType;
pub use snapshot::{
    find_collisions, CycleSnapshot, DateCollision, Resolution, ScheduleSnapshot, SkippedCycle,
};
pub use staff::Staff;
pub use update::{ChangeSet, EventUpdate};
