//! Round-robin staff rotation.
//!
//! Staff are handed out in roster order, `n` at a time, wrapping at the
//! end. Consecutive groups are disjoint whenever the roster holds at
//! least `2n` members, so nobody serves two slots in a row.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::models::{Event, StaffId};

/// A rotation pointer over an ordered roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    order: Vec<StaffId>,
    cursor: usize,
}

impl Rotation {
    /// Starts at the head of `order`.
    pub fn new(order: Vec<StaffId>) -> Self {
        Self { order, cursor: 0 }
    }

    /// Starts at the head of `order` after a seeded shuffle.
    ///
    /// The same seed always yields the same order.
    pub fn shuffled(mut order: Vec<StaffId>, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
        Self::new(order)
    }

    /// Continues after the last assignment found in `history`.
    ///
    /// History is scanned from the latest event backwards, and each
    /// event's staff from last to first, until a member still on the
    /// roster is found. The rotation resumes right after that member.
    /// With no match the rotation starts at the head.
    pub fn resume_after(mut self, history: &[Event]) -> Self {
        let mut latest_first: Vec<&Event> = history.iter().collect();
        latest_first.sort_by(|a, b| (b.date, b.id).cmp(&(a.date, a.id)));

        let last_known = latest_first
            .iter()
            .flat_map(|e| e.staff.iter().rev())
            .find_map(|id| self.order.iter().position(|s| s == id));

        if let Some(pos) = last_known {
            self.cursor = (pos + 1) % self.order.len();
        }
        self
    }

    /// Takes the next `size` staff, capped at the roster size so a slot
    /// never holds the same person twice.
    pub fn next_group(&mut self, size: usize) -> Vec<StaffId> {
        let len = self.order.len();
        if len == 0 {
            return Vec::new();
        }
        let take = size.min(len);
        let group = (0..take)
            .map(|i| self.order[(self.cursor + i) % len])
            .collect();
        self.cursor = (self.cursor + take) % len;
        group
    }

    /// Index of the next staff member to be assigned.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// The rotation order.
    pub fn order(&self) -> &[StaffId] {
        &self.order
    }
}
