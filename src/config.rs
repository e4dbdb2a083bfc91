use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, Result};

/// default loan term in days
pub const DEFAULT_TERM_DAYS: u32 = 30;

/// widest offset chrono accepts, in minutes
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// ledger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub calendar: CalendarConfig,
    /// days between start date and due date, also the length of one extension
    pub term_days: u32,
}

/// where calendar days begin and end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CalendarConfig {
    pub utc_offset_minutes: i32,
}

impl CalendarConfig {
    /// Indian Standard Time (+05:30)
    pub fn ist() -> Self {
        Self { utc_offset_minutes: 330 }
    }

    pub fn offset(&self) -> Option<FixedOffset> {
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return None;
        }
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
    }
}

impl LedgerConfig {
    /// configuration for a lender keeping books in IST
    pub fn india() -> Self {
        Self {
            calendar: CalendarConfig::ist(),
            term_days: DEFAULT_TERM_DAYS,
        }
    }

    /// parse and validate a json document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LedgerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.term_days == 0 {
            return Err(LedgerError::InvalidConfiguration {
                message: "term_days must be at least 1".to_string(),
            });
        }

        if self.calendar.offset().is_none() {
            return Err(LedgerError::InvalidConfiguration {
                message: format!(
                    "utc_offset_minutes {} outside +/-{}",
                    self.calendar.utc_offset_minutes, MAX_OFFSET_MINUTES
                ),
            });
        }

        Ok(())
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            calendar: CalendarConfig::default(),
            term_days: DEFAULT_TERM_DAYS,
        }
    }
}
