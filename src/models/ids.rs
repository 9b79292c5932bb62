//! Identifier newtypes.
//!
//! Persistence rows are keyed by integers; wrapping them keeps event,
//! cycle and staff ids from being mixed up. Ordering is numeric, which
//! the manual-move tie-break relies on.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifies an event (one dated slot).
    EventId
);
id_type!(
    /// Identifies a cycle (a contiguous run of events).
    CycleId
);
id_type!(
    /// Identifies a staff member.
    StaffId
);
