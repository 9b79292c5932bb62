//! Schedule type classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of recurring schedule a cycle belongs to.
///
/// Determines the cadence (daily business day vs. weekly) and the
/// default number of staff assigned per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScheduleType {
    /// Daily cleaning duty on business days.
    #[serde(rename = "CLEANING")]
    Cleaning,
    /// Weekly presentation slot on a fixed weekday.
    #[serde(rename = "OPENTALK")]
    OpenTalk,
}

impl ScheduleType {
    /// All schedule types, in processing order.
    pub const ALL: [ScheduleType; 2] = [ScheduleType::Cleaning, ScheduleType::OpenTalk];

    /// Stable name as stored by the persistence layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleType::Cleaning => "CLEANING",
            ScheduleType::OpenTalk => "OPENTALK",
        }
    }

    /// Staff per slot when no configuration overrides it.
    pub fn default_slot_size(&self) -> usize {
        match self {
            ScheduleType::Cleaning => 2,
            ScheduleType::OpenTalk => 1,
        }
    }
}

impl fmt::Display for ScheduleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
