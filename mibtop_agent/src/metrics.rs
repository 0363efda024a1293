//! /proc sampling for the collector. Linux only; elsewhere a tick comes back empty.

use mibtop::logfmt::{format_block, TIMESTAMP_FORMAT};

use crate::state::AppState;

#[cfg(target_os = "linux")]
use std::{fs, io};
#[cfg(target_os = "linux")]
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate};

/// One sampling tick in raw form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub stamp: String,
    pub cpu_lines: Vec<String>,
    /// (pid, verbatim /proc/<pid>/stat line)
    pub procs: Vec<(u32, String)>,
}

impl Block {
    pub fn render(&self) -> String {
        format_block(&self.stamp, &self.cpu_lines, &self.procs)
    }
}

pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Leading `cpu`/`cpuN` lines of /proc/stat.
#[cfg(target_os = "linux")]
pub fn read_cpu_lines() -> io::Result<Vec<String>> {
    let s = fs::read_to_string("/proc/stat")?;
    Ok(s
        .lines()
        .take_while(|l| l.starts_with("cpu"))
        .map(str::to_string)
        .collect())
}

#[cfg(target_os = "linux")]
pub fn read_proc_stat(pid: u32) -> Option<String> {
    let s = fs::read_to_string(format!("/proc/{pid}/stat")).ok()?;
    Some(s.trim_end().to_string())
}

#[cfg(target_os = "linux")]
pub async fn collect_block(state: &AppState) -> Block {
    let stamp = timestamp_now();
    let cpu_lines = match read_cpu_lines() {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("reading /proc/stat failed: {e}");
            Vec::new()
        }
    };

    // Reuse shared System; only the pid list is needed, counters come from /proc directly.
    let mut pids: Vec<u32> = {
        let mut sys = state.sys.lock().await;
        sys.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        sys.processes().keys().map(|p| p.as_u32()).collect()
    };
    pids.sort_unstable();

    // Processes can exit between listing and reading; those are simply skipped.
    let procs = pids
        .into_iter()
        .filter_map(|pid| read_proc_stat(pid).map(|stat| (pid, stat)))
        .collect();

    Block {
        stamp,
        cpu_lines,
        procs,
    }
}

#[cfg(not(target_os = "linux"))]
pub async fn collect_block(_state: &AppState) -> Block {
    Block {
        stamp: timestamp_now(),
        ..Block::default()
    }
}
