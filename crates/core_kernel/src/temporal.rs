//! Policy periods at day granularity
//!
//! A policy covers the dates from `start` up to `end`. The end date is
//! always strictly after the start date.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors related to temporal operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemporalError {
    #[error("Invalid period: start {start} must be before end {end}")]
    InvalidPeriod {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Duration must be at least one day, got {0}")]
    InvalidDuration(u32),

    #[error("Date out of range: {start} + {days} days")]
    OutOfRange {
        start: NaiveDate,
        days: u32,
    },
}

/// Computes `start + days` at day granularity
///
/// Returns `None` for a zero duration or when the result leaves chrono's
/// representable range.
pub fn end_date_for(start: NaiveDate, days: u32) -> Option<NaiveDate> {
    if days == 0 {
        return None;
    }
    start.checked_add_days(Days::new(u64::from(days)))
}

/// The covered period of a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl PolicyPeriod {
    /// Creates a period, rejecting `end <= start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TemporalError> {
        if end <= start {
            return Err(TemporalError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a period lasting `days` days from `start`
    pub fn from_duration(start: NaiveDate, days: u32) -> Result<Self, TemporalError> {
        if days == 0 {
            return Err(TemporalError::InvalidDuration(days));
        }
        let end = end_date_for(start, days).ok_or(TemporalError::OutOfRange { start, days })?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days between start and end
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Returns true if the date falls within `[start, end)`
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}
