//! Rate limiting between successive provider refreshes.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl TimeUnit {
    fn as_str(&self) -> &'static str {
        match self {
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "min",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }
}

/// Minimum time between two refreshes. A negative amount disables the limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateLimit {
    pub amount: i64,
    pub unit: TimeUnit,
}

impl RateLimit {
    pub const UNLIMITED: RateLimit = RateLimit::new(-1, TimeUnit::Seconds);

    pub const fn new(amount: i64, unit: TimeUnit) -> Self {
        Self { amount, unit }
    }

    pub const fn seconds(amount: i64) -> Self {
        Self::new(amount, TimeUnit::Seconds)
    }

    pub fn is_unlimited(&self) -> bool {
        self.amount < 0
    }

    /// Length of the cooldown window, or `None` when unlimited. Saturates on
    /// overflow.
    pub fn window(&self) -> Option<TimeDelta> {
        if self.is_unlimited() {
            return None;
        }
        let window = match self.unit {
            TimeUnit::Milliseconds => TimeDelta::try_milliseconds(self.amount),
            TimeUnit::Seconds => TimeDelta::try_seconds(self.amount),
            TimeUnit::Minutes => TimeDelta::try_minutes(self.amount),
            TimeUnit::Hours => TimeDelta::try_hours(self.amount),
            TimeUnit::Days => TimeDelta::try_days(self.amount),
        };
        Some(window.unwrap_or(TimeDelta::MAX))
    }
}

impl fmt::Display for RateLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unlimited() {
            f.write_str("unlimited")
        } else {
            write!(f, "{}{}", self.amount, self.unit.as_str())
        }
    }
}

/// Tracks when a provider last refreshed and decides whether it may refresh
/// again.
///
/// The check and the timestamp update happen under one lock, so concurrent
/// callers cannot both pass the gate. The timestamp moves forward *before* the
/// fetch runs: a fetch that later fails still uses up the window.
#[derive(Debug)]
pub struct RefreshGovernor {
    limit: RateLimit,
    last_update: Mutex<DateTime<Utc>>,
}

impl RefreshGovernor {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            last_update: Mutex::new(DateTime::UNIX_EPOCH),
        }
    }

    pub fn rate_limit(&self) -> RateLimit {
        self.limit
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        *self.last_update.lock()
    }

    /// Earliest instant the next refresh will be accepted.
    pub fn next_allowed(&self) -> DateTime<Utc> {
        let last = self.last_update();
        match self.limit.window() {
            None => last,
            Some(window) => last.checked_add_signed(window).unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// Returns `true` and records `now` as the last update when the window has
    /// elapsed; returns `false` and changes nothing otherwise.
    pub fn try_acquire(&self, now: DateTime<Utc>) -> bool {
        let mut last = self.last_update.lock();
        if let Some(window) = self.limit.window() {
            let next = last.checked_add_signed(window).unwrap_or(DateTime::<Utc>::MAX_UTC);
            if now < next {
                tracing::debug!(%now, %next, limit = %self.limit, "refresh refused, rate limit window still open");
                return false;
            }
        }
        let previous = *last;
        tracing::debug!(%now, %previous, "refresh allowed");
        *last = now;
        true
    }
}
