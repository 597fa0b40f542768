//! Booking-window arithmetic.
//!
//! The reservation site opens a day for booking a fixed number of days
//! ahead, at midnight. Only the calendar day of a target matters here; the
//! requested tee time is applied later when slots are filtered.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::BookingConfig;
use crate::error::{FlogError, Result};
use crate::types::{format_day, parse_day};

/// Days ahead of the target day that the site accepts bookings.
pub const DAYS_CAN_BOOK: i64 = 8;
pub const DEFAULT_HOUR: u32 = 7;
pub const DEFAULT_MINUTE: u32 = 10;
/// Largest party the site seats on one tee time.
pub const MAX_PLAYERS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub days_can_book: i64,
    pub default_hour: u32,
    pub default_minute: u32,
    pub max_players: u32,
}

impl Default for BookingWindow {
    fn default() -> Self {
        Self {
            days_can_book: DAYS_CAN_BOOK,
            default_hour: DEFAULT_HOUR,
            default_minute: DEFAULT_MINUTE,
            max_players: MAX_PLAYERS,
        }
    }
}

impl BookingWindow {
    pub fn from_config(cfg: &BookingConfig) -> Self {
        Self {
            days_can_book: cfg.days_can_book,
            default_hour: cfg.default_hour,
            default_minute: cfg.default_minute,
            max_players: cfg.max_players,
        }
    }

    /// The instant `day` becomes bookable: its midnight minus the horizon.
    pub fn opens_at(&self, day: &str) -> Result<NaiveDateTime> {
        let target = parse_day(day)?;
        Ok(truncate_to_day(target) - Duration::days(self.days_can_book))
    }

    /// True once `now` has reached [`opens_at`](Self::opens_at).
    pub fn is_bookable(&self, day: &str, now: NaiveDateTime) -> Result<bool> {
        let available = self.opens_at(day)?;
        Ok(available <= now)
    }

    /// Party sizes outside `1..=max_players` are [`FlogError::InvalidPartySize`].
    pub fn check_party_size(&self, players: u32) -> Result<()> {
        if (1..=self.max_players).contains(&players) {
            Ok(())
        } else {
            Err(FlogError::InvalidPartySize {
                players,
                max: self.max_players,
            })
        }
    }

    /// The furthest day that will open on the next sweep, at the default tee time.
    pub fn default_day(&self, now: NaiveDateTime) -> Result<String> {
        let date: NaiveDate = (now + Duration::days(self.days_can_book + 1)).date();
        let time = NaiveTime::from_hms_opt(self.default_hour, self.default_minute, 0).ok_or_else(
            || {
                FlogError::Config(format!(
                    "invalid default tee time {:02}:{:02}",
                    self.default_hour, self.default_minute
                ))
            },
        )?;
        Ok(format_day(date.and_time(time)))
    }
}

pub fn truncate_to_day(t: NaiveDateTime) -> NaiveDateTime {
    t.date().and_time(NaiveTime::MIN)
}
