//! Range-clamped numeric settings.
//!
//! Settings outside their bounds are not rejected: they fall back to a fixed
//! default. The bounds themselves are constants and cannot be overridden by
//! callers.

use std::time::Duration;

/// A closed `[min, max]` range with a fallback value.
///
/// `default` is assumed to lie inside the range; it is not re-checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeSetting<T> {
    min: T,
    max: T,
    default: T,
}

impl<T> RangeSetting<T>
where
    T: PartialOrd + Copy,
{
    /// Creates a setting accepting values in `[min, max]`.
    pub const fn new(min: T, max: T, default: T) -> Self {
        Self { min, max, default }
    }

    /// Returns `value` when it lies within the bounds, otherwise the default.
    #[must_use]
    pub fn apply(&self, value: T) -> T {
        if value < self.min || value > self.max {
            self.default
        } else {
            value
        }
    }

    /// Lower bound (inclusive).
    pub const fn min(&self) -> T {
        self.min
    }

    /// Upper bound (inclusive).
    pub const fn max(&self) -> T {
        self.max
    }

    /// Fallback value.
    pub const fn default_value(&self) -> T {
        self.default
    }
}

/// Request timeout: 5s..=60s, default 10s.
pub const TIMEOUT: RangeSetting<Duration> =
    RangeSetting::new(Duration::from_secs(5), Duration::from_secs(60), Duration::from_secs(10));

/// Number of retries per request: 0..=5, default 3.
pub const RETRY_COUNT: RangeSetting<u32> = RangeSetting::new(0, 5, 3);

/// Wait between retries: 100ms..=5s, default 1s.
pub const RETRY_WAIT_TIME: RangeSetting<Duration> = RangeSetting::new(
    Duration::from_millis(100),
    Duration::from_secs(5),
    Duration::from_secs(1),
);

/// Upper limit of the wait between retries: 1s..=10s, default 2s.
pub const RETRY_MAX_WAIT_TIME: RangeSetting<Duration> =
    RangeSetting::new(Duration::from_secs(1), Duration::from_secs(10), Duration::from_secs(2));
