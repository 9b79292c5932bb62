//! Staff model.
//!
//! Staff are opaque to the rescheduling algorithms. Only the cycle
//! generator looks at the roster, and only at its order.

use serde::{Deserialize, Serialize};

use super::StaffId;

/// A staff member eligible for rotation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Staff {
    /// Unique staff identifier.
    pub id: StaffId,
    /// Display label (name, nickname).
    pub label: String,
}

impl Staff {
    /// Creates a staff member with an empty label.
    pub fn new(id: u64) -> Self {
        Self {
            id: StaffId(id),
            label: String::new(),
        }
    }

    /// Sets the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}
