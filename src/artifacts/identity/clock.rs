//! Commit timestamps
//!
//! The local timezone is ambient state too, so commit builders ask a [`Clock`]
//! for the current instant instead of reading it themselves.

use chrono::{DateTime, FixedOffset};

pub trait Clock {
    /// Current instant with the UTC offset to record alongside it
    fn now(&self) -> DateTime<FixedOffset>;
}

/// Wall clock in the local timezone, unless pinned by `GIT_AUTHOR_DATE`
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    pinned: Option<DateTime<FixedOffset>>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Honor `GIT_AUTHOR_DATE` when it holds a parseable date
    pub fn from_env() -> Self {
        SystemClock {
            pinned: std::env::var("GIT_AUTHOR_DATE")
                .ok()
                .and_then(|date| parse_date(&date)),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.pinned
            .unwrap_or_else(|| chrono::Local::now().fixed_offset())
    }
}

/// RFC 2822, or `%Y-%m-%d %H:%M:%S %z`
pub fn parse_date(date: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(date)
        .or_else(|_| DateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S %z"))
        .ok()
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<FixedOffset>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}
