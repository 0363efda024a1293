//! Fixture builders shared by the integration tests.
#![allow(dead_code)]

use chrono::NaiveDate;
use mibtop::types::{CpuSnapshot, ProcessSample, Timestamp};

pub fn t(sec: u32) -> Timestamp {
    NaiveDate::from_ymd_opt(2025, 5, 5)
        .unwrap()
        .and_hms_opt(12, 0, sec)
        .unwrap()
}

pub fn cpu(sec: u32, user: u64, idle: u64) -> CpuSnapshot {
    CpuSnapshot {
        time: t(sec),
        user,
        nice: 0,
        system: 0,
        idle,
        iowait: 0,
        irq: 0,
        softirq: 0,
        steal: 0,
        guest: 0,
        guest_nice: 0,
    }
}

pub fn ps(sec: u32, ticks: u64) -> ProcessSample {
    ProcessSample {
        time: t(sec),
        cpu_ticks: ticks,
    }
}

/// Total CPU at t0, t1, t2 with total-time deltas of 100 then 200 ticks.
pub fn total_three() -> Vec<CpuSnapshot> {
    vec![cpu(0, 100, 900), cpu(1, 150, 950), cpu(2, 250, 1050)]
}

/// A /proc/<pid>/stat line with the given utime/stime.
pub fn stat(pid: u32, comm: &str, utime: u64, stime: u64) -> String {
    format!("{pid} ({comm}) S 1 {pid} {pid} 0 -1 4194560 100 0 0 0 {utime} {stime} 0 0 20 0 1 0 100 0 0")
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
