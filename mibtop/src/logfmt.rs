//! Raw collector log: one block per sampling tick.
//!
//! ```text
//! ### Timestamp: Mon May  5 12:00:00 2025
//! cpu  4705 356 584 3699 23 23 0 0 0 0
//! cpu0 1393 280 346 2200 7 14 0 0 0 0
//! Process 1: 1 (init) S 0 1 1 0 -1 4194560 ...
//! Processes scanned: 1
//! ```

use std::fmt::Write as _;

use chrono::NaiveDateTime;
use tracing::warn;

use crate::types::{CpuSnapshot, Dataset, ProcessSample, Timestamp};

pub const TIMESTAMP_PREFIX: &str = "### Timestamp:";
/// ctime-style, as written by the collector (`%e` day is space padded).
pub const TIMESTAMP_FORMAT: &str = "%a %b %e %H:%M:%S %Y";

/// Whitespace runs are collapsed first so both padded and unpadded days parse.
pub fn parse_timestamp(s: &str) -> Option<Timestamp> {
    let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&normalized, "%a %b %d %H:%M:%S %Y").ok()
}

fn parse_cpu_line(line: &str, time: Timestamp) -> Option<(String, CpuSnapshot)> {
    let mut it = line.split_whitespace();
    let label = it.next()?.to_string();
    let mut v = [0u64; 10];
    for (slot, tok) in v.iter_mut().zip(it) {
        *slot = tok.parse().ok()?;
    }
    let snap = CpuSnapshot {
        time,
        user: v[0],
        nice: v[1],
        system: v[2],
        idle: v[3],
        iowait: v[4],
        irq: v[5],
        softirq: v[6],
        steal: v[7],
        guest: v[8],
        guest_nice: v[9],
    };
    Some((label, snap))
}

/// utime + stime from a `/proc/<pid>/stat` line; fields are counted after the `)`
/// closing comm so names with spaces or parentheses are safe.
pub fn stat_ticks(stat: &str) -> Option<u64> {
    let rpar = stat.rfind(')')?;
    let mut it = stat.get(rpar + 1..)?.split_whitespace();
    // utime (14th field) is offset 11 from "state", stime (15th) is next
    let utime = it.nth(11)?.parse::<u64>().ok()?;
    let stime = it.next()?.parse::<u64>().ok()?;
    Some(utime.saturating_add(stime))
}

fn stat_comm(stat: &str) -> Option<&str> {
    let lpar = stat.find('(')?;
    let rpar = stat.rfind(')')?;
    stat.get(lpar + 1..rpar)
}

/// `(key, ticks)` for a `Process <pid>: <stat>` line. Key is `"<comm> (<pid>)"`;
/// a stat line without readable times counts as 0 ticks.
fn parse_process_line(line: &str) -> Option<(String, u64)> {
    let rest = line.strip_prefix("Process ")?;
    let (pid, stat) = rest.split_once(':')?;
    let pid: u32 = pid.trim().parse().ok()?;
    let comm = stat_comm(stat)?;
    let ticks = stat_ticks(stat).unwrap_or(0);
    Some((format!("{comm} ({pid})"), ticks))
}

/// Incremental log reader; the agent feeds it live blocks, the client whole files.
#[derive(Debug, Default)]
pub struct LogParser {
    dataset: Dataset,
    current: Option<Timestamp>,
    skipped: usize,
}

impl LogParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed_line(&mut self, line: &str) {
        let line = line.trim_end();
        if let Some(stamp) = line.strip_prefix(TIMESTAMP_PREFIX) {
            self.current = parse_timestamp(stamp);
            if self.current.is_none() {
                warn!("unparseable timestamp `{}`, skipping block", stamp.trim());
            }
            return;
        }
        let Some(time) = self.current else { return };

        if line.starts_with("cpu") {
            match parse_cpu_line(line, time) {
                Some((label, snap)) if label == "cpu" => self.dataset.cpu_total.push(snap),
                Some((label, snap)) => self.dataset.cpu_cores.push(&label, snap),
                None => self.skip(line),
            }
        } else if line.starts_with("Process ") {
            match parse_process_line(line) {
                Some((key, cpu_ticks)) => self
                    .dataset
                    .cpu_processes
                    .push(&key, ProcessSample { time, cpu_ticks }),
                None => self.skip(line),
            }
        }
    }

    fn skip(&mut self, line: &str) {
        self.skipped += 1;
        warn!("skipping malformed line `{line}`");
    }

    pub fn feed(&mut self, text: &str) {
        for line in text.lines() {
            self.feed_line(line);
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Bound the accumulated dataset, see [`Dataset::keep_last`].
    pub fn keep_last(&mut self, n: usize) {
        self.dataset.keep_last(n);
    }

    pub fn set_host(&mut self, host: Option<String>) {
        self.dataset.host = host;
    }

    /// Lines that looked like data but could not be parsed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }
}

pub fn parse_log(text: &str) -> Dataset {
    let mut parser = LogParser::new();
    parser.feed(text);
    parser.into_dataset()
}

/// Render one block. `stamp` is already formatted with [`TIMESTAMP_FORMAT`];
/// `procs` pairs a pid with its verbatim stat line.
pub fn format_block(stamp: &str, cpu_lines: &[String], procs: &[(u32, String)]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TIMESTAMP_PREFIX} {stamp}");
    for line in cpu_lines {
        let _ = writeln!(out, "{line}");
    }
    for (pid, stat) in procs {
        let _ = writeln!(out, "Process {pid}: {}", stat.trim_end());
    }
    let _ = writeln!(out, "Processes scanned: {}", procs.len());
    out
}
