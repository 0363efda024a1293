//! Deltas between consecutive cumulative-counter snapshots.
//!
//! Counters may reset or wrap (reboot, PID reuse), so every delta is signed and
//! the rate helpers fall back to 0 when no time elapsed.

use crate::types::{CpuSnapshot, ProcessSample};

/// Signed per-field difference `curr - prev` of two cpu snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuDelta {
    pub user: i64,
    pub nice: i64,
    pub system: i64,
    pub idle: i64,
    pub iowait: i64,
    pub irq: i64,
    pub softirq: i64,
    pub steal: i64,
}

impl CpuDelta {
    // Sums saturate: a wrapped field is already clamped to i64::MIN/MAX
    pub fn active(&self) -> i64 {
        [self.nice, self.system, self.irq, self.softirq, self.steal]
            .into_iter()
            .fold(self.user, i64::saturating_add)
    }

    pub fn idle_time(&self) -> i64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn total(&self) -> i64 {
        self.active().saturating_add(self.idle_time())
    }

    /// Busy share of the interval in percent; 0 when the total did not advance.
    pub fn busy_percent(&self) -> f64 {
        percent_of(self.active(), self.total())
    }
}

pub fn signed_delta(prev: u64, curr: u64) -> i64 {
    let d = i128::from(curr) - i128::from(prev);
    d.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

pub fn diff(prev: &CpuSnapshot, curr: &CpuSnapshot) -> CpuDelta {
    CpuDelta {
        user: signed_delta(prev.user, curr.user),
        nice: signed_delta(prev.nice, curr.nice),
        system: signed_delta(prev.system, curr.system),
        idle: signed_delta(prev.idle, curr.idle),
        iowait: signed_delta(prev.iowait, curr.iowait),
        irq: signed_delta(prev.irq, curr.irq),
        softirq: signed_delta(prev.softirq, curr.softirq),
        steal: signed_delta(prev.steal, curr.steal),
    }
}

pub fn tick_delta(prev: &ProcessSample, curr: &ProcessSample) -> i64 {
    signed_delta(prev.cpu_ticks, curr.cpu_ticks)
}

/// `part / whole * 100`, or exactly 0 when `whole <= 0`.
pub fn percent_of(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}
