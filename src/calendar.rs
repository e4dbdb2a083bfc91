use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};

use crate::config::CalendarConfig;

/// calendar-day granularity for every date-dependent figure
///
/// Timestamps are floored to the calendar day they fall on at a fixed
/// UTC offset. Hours within a day never count towards a day difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Calendar {
    /// calendar in UTC
    pub fn utc() -> Self {
        Self {
            offset: Utc.fix(),
        }
    }

    /// calendar at a fixed offset from UTC
    pub fn with_offset(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// build from configuration, falling back to UTC for an out-of-range offset
    pub fn from_config(config: &CalendarConfig) -> Self {
        config
            .offset()
            .map(Self::with_offset)
            .unwrap_or_else(Self::utc)
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// the calendar day an instant falls on
    pub fn day_floor(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }

    /// signed whole days from `earlier` to `later`, by calendar day
    pub fn days_between(&self, later: DateTime<Utc>, earlier: DateTime<Utc>) -> i64 {
        (self.day_floor(later) - self.day_floor(earlier)).num_days()
    }

    /// whole days from `earlier` to `later`, floored at zero
    pub fn days_since(&self, later: DateTime<Utc>, earlier: DateTime<Utc>) -> u32 {
        let days = self.days_between(later, earlier).max(0);
        u32::try_from(days).unwrap_or(u32::MAX)
    }

    pub fn is_same_day(&self, a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
        self.day_floor(a) == self.day_floor(b)
    }

    /// add whole days to an instant, keeping its time of day
    pub fn add_days(&self, instant: DateTime<Utc>, days: u32) -> DateTime<Utc> {
        instant + Duration::days(days as i64)
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}
