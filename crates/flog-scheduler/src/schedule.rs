use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::error::{Result, SchedulerError};

/// Fires once a day at a fixed local wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
}

impl DailySchedule {
    pub fn new(hour: u32, minute: u32) -> Result<Self> {
        let at = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            SchedulerError::InvalidSchedule(format!("daily at {hour:02}:{minute:02}"))
        })?;
        Ok(Self { at })
    }

    /// Local midnight.
    pub fn midnight() -> Self {
        Self { at: NaiveTime::MIN }
    }

    /// The first firing strictly after `from`.
    pub fn next_after(&self, from: NaiveDateTime) -> NaiveDateTime {
        // Build today's candidate at HH:MM:00.
        let candidate = from.date().and_time(self.at);
        if candidate > from {
            candidate
        } else {
            // Already past today, so tomorrow.
            candidate + Duration::days(1)
        }
    }
}
