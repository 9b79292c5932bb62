//! The forward ripple walk.
//!
//! # Algorithm
//! 1. Reserve the dates of pinned slots.
//! 2. Visit slots in rule order. Unpinned slots are offered to the rule;
//!    a returned date replaces the slot's date in place.
//! 3. Advance the cursor to the slot's effective date either way, so a
//!    shift ripples into every later decision.
//!
//! # Complexity
//! O(n log n) for the sort plus O(n · k) cadence steps, where k is the
//! number of slots skipped per reassignment.

use chrono::NaiveDate;
use tracing::debug;

use super::{RippleContext, RippleCursor, RippleRule, Slot};
use crate::error::Result;
use crate::models::{ChangeSet, EventUpdate};

/// A ripple walk driven by one rule.
#[derive(Debug)]
pub struct Ripple<'a, R> {
    rule: R,
    context: RippleContext<'a>,
    cursor: RippleCursor,
}

impl<'a, R: RippleRule> Ripple<'a, R> {
    /// Creates a walk with an empty cursor.
    pub fn new(rule: R, context: RippleContext<'a>) -> Self {
        Self {
            rule,
            context,
            cursor: RippleCursor::default(),
        }
    }

    /// Sorts slots into walk order (stable).
    pub fn sort(&self, slots: &mut [Slot]) {
        slots.sort_by(|a, b| self.rule.compare(a, b));
    }

    /// Walks `slots` in their current order and returns the reassignments.
    ///
    /// Callers sort with [`Ripple::sort`] first. The cursor carries over
    /// between calls, so a long timeline can be walked in pieces.
    pub fn walk(&mut self, slots: &mut [Slot]) -> Result<ChangeSet> {
        for slot in slots.iter().filter(|s| s.pinned) {
            self.cursor.reserve(slot.date);
        }

        let mut changes = ChangeSet::new();
        for slot in slots.iter_mut() {
            if let Some(update) = self.step(slot)? {
                changes.record(update);
            }
        }
        Ok(changes)
    }

    /// Places a single slot.
    pub fn step(&mut self, slot: &mut Slot) -> Result<Option<EventUpdate>> {
        self.cursor.enter(slot.cycle_id);

        let moved_to = if slot.pinned {
            None
        } else {
            self.rule.reassign(slot, &self.cursor, &self.context)?
        };

        let update = match moved_to {
            Some(date) if date != slot.date => {
                debug!(
                    rule = self.rule.name(),
                    event_id = %slot.event_id,
                    cycle_id = %slot.cycle_id,
                    from = %slot.date,
                    to = %date,
                    "slot reassigned"
                );
                slot.date = date;
                Some(EventUpdate::new(
                    slot.event_id,
                    slot.cycle_id,
                    slot.original_date,
                    date,
                ))
            }
            _ => None,
        };

        self.cursor.advance(slot.date);
        Ok(update)
    }

    /// Advances the cursor past a slot without consulting the rule.
    pub fn observe(&mut self, slot: &Slot) {
        self.cursor.enter(slot.cycle_id);
        self.cursor.advance(slot.date);
    }

    /// Current walk state.
    pub fn cursor(&self) -> &RippleCursor {
        &self.cursor
    }

    /// Saves the walk state.
    pub fn checkpoint(&self) -> RippleCursor {
        self.cursor.clone()
    }

    /// Rewinds to a saved state.
    pub fn restore(&mut self, cursor: RippleCursor) {
        self.cursor = cursor;
    }

    /// Effective end date of the last walked slot.
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.cursor.previous()
    }
}
