use std::collections::HashMap;

use crate::models::PrayerName;
use crate::utils::format::adjust_time;

/// Per-prayer minute offsets entered by the user. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayTimes {
    minutes: HashMap<PrayerName, u32>,
}

impl Default for DelayTimes {
    fn default() -> Self {
        Self {
            minutes: PrayerName::all().into_iter().map(|p| (p, 0)).collect(),
        }
    }
}

impl DelayTimes {
    pub fn get(&self, prayer: PrayerName) -> u32 {
        self.minutes.get(&prayer).copied().unwrap_or(0)
    }

    pub fn set(&mut self, prayer: PrayerName, minutes: u32) {
        self.minutes.insert(prayer, minutes);
    }

    /// `base` shifted by this prayer's delay, or `None` if `base` is not a
    /// valid `HH:MM` time.
    pub fn adjusted(&self, prayer: PrayerName, base: &str) -> Option<String> {
        adjust_time(base, self.get(prayer))
    }
}
