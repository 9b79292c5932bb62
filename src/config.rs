//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid
//! configuration. Values are checked by [`EngineConfig::validate`]
//! before an engine accepts them.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::models::ScheduleType;

/// Roughly ten years; a cadence search that runs this far means corrupt data.
pub const DEFAULT_MAX_SEARCH_DAYS: u32 = 3660;

/// Tunables for the rescheduling engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Upper bound (days) for any single cadence search.
    pub max_search_days: u32,
    /// Staff per cleaning slot.
    pub cleaning_slot_size: usize,
    /// Staff per presentation slot.
    pub opentalk_slot_size: usize,
    /// Weekday presentations must fall on. `None` accepts any weekday.
    pub opentalk_weekday: Option<Weekday>,
    /// Seed for shuffling the first rotation when no history exists.
    pub rotation_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_search_days: DEFAULT_MAX_SEARCH_DAYS,
            cleaning_slot_size: ScheduleType::Cleaning.default_slot_size(),
            opentalk_slot_size: ScheduleType::OpenTalk.default_slot_size(),
            opentalk_weekday: None,
            rotation_seed: None,
        }
    }
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the cadence search bound.
    pub fn with_max_search_days(mut self, days: u32) -> Self {
        self.max_search_days = days;
        self
    }

    /// Sets the slot size for a schedule type.
    pub fn with_slot_size(mut self, schedule_type: ScheduleType, size: usize) -> Self {
        match schedule_type {
            ScheduleType::Cleaning => self.cleaning_slot_size = size,
            ScheduleType::OpenTalk => self.opentalk_slot_size = size,
        }
        self
    }

    /// Pins presentations to a weekday.
    pub fn with_opentalk_weekday(mut self, weekday: Weekday) -> Self {
        self.opentalk_weekday = Some(weekday);
        self
    }

    /// Sets the rotation shuffle seed.
    pub fn with_rotation_seed(mut self, seed: u64) -> Self {
        self.rotation_seed = Some(seed);
        self
    }

    /// Staff per slot for a schedule type.
    pub fn slot_size(&self, schedule_type: ScheduleType) -> usize {
        match schedule_type {
            ScheduleType::Cleaning => self.cleaning_slot_size,
            ScheduleType::OpenTalk => self.opentalk_slot_size,
        }
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_search_days == 0 {
            return Err(EngineError::Config(
                "max_search_days must be > 0".to_string(),
            ));
        }
        for schedule_type in ScheduleType::ALL {
            if self.slot_size(schedule_type) == 0 {
                return Err(EngineError::Config(format!(
                    "slot size for {schedule_type} must be > 0"
                )));
            }
        }
        Ok(())
    }
}
