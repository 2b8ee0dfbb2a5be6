// Copyright 2025 the Tremor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-interval tick driver.

use std::time::Duration;

use crate::error::ConfigError;

/// Turns elapsed wall time into a whole number of clock ticks at a fixed interval.
///
/// Time that does not add up to a full interval is carried into the next call, so a
/// frame callback with jittery deltas produces the same tick count as a steady timer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickDriver {
    interval: Duration,
    carried: Duration,
}

impl TickDriver {
    /// A driver emitting one tick per `interval`.
    pub fn new(interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::Invalid {
                reason: "tick interval must be positive".to_owned(),
            });
        }
        Ok(Self {
            interval,
            carried: Duration::ZERO,
        })
    }

    /// Configured interval.
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Time accumulated towards the next tick.
    pub const fn carried(&self) -> Duration {
        self.carried
    }

    /// Account for `elapsed` time and return how many ticks are due.
    pub fn advance(&mut self, elapsed: Duration) -> u64 {
        let total = self.carried.saturating_add(elapsed);
        let step = self.interval.as_nanos();
        let ticks = total.as_nanos() / step;
        let rest = total.as_nanos() % step;
        self.carried = Duration::from_nanos(u64::try_from(rest).unwrap_or(u64::MAX));
        u64::try_from(ticks).unwrap_or(u64::MAX)
    }

    /// Drop any partial interval (e.g. after a seek).
    pub fn reset(&mut self) {
        self.carried = Duration::ZERO;
    }
}
