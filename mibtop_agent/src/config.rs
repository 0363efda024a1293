//! Agent configuration: CLI flags for port and log path, env toggles for the rest.

use once_cell::sync::OnceCell;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_LOG: &str = "mibtop_log.txt";
pub const DEFAULT_MAX_SAMPLES: usize = 3_600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    pub port: u16,
    pub log_path: PathBuf,
    pub interval: Duration,
}

/// `--port/-p/--port=N` and `--log/-l/--log=PATH`; unparseable ports fall back to the default.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> AgentConfig {
    let mut it = args.into_iter();
    let _ = it.next(); // program name
    let mut long: Option<String> = None;
    let mut short: Option<String> = None;
    let mut log: Option<String> = None;
    while let Some(a) = it.next() {
        match a.as_str() {
            "--port" => long = it.next(),
            "-p" => short = it.next(),
            "--log" | "-l" => log = it.next(),
            _ if a.starts_with("--port=") => {
                if let Some((_, v)) = a.split_once('=') {
                    long = Some(v.to_string());
                }
            }
            _ if a.starts_with("--log=") => {
                if let Some((_, v)) = a.split_once('=') {
                    log = Some(v.to_string());
                }
            }
            _ => {}
        }
    }
    let port = long
        .or(short)
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let log_path = log
        .filter(|s| !s.is_empty())
        .or_else(|| std::env::var("MIBTOP_AGENT_LOG").ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG));
    AgentConfig {
        port,
        log_path,
        interval: sample_interval(),
    }
}

// Runtime toggles (read once)
pub fn sample_interval() -> Duration {
    static MS: OnceCell<u64> = OnceCell::new();
    let ms = *MS.get_or_init(|| {
        std::env::var("MIBTOP_AGENT_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&v: &u64| v > 0)
            .unwrap_or(1_000)
    });
    Duration::from_millis(ms)
}

/// Total-CPU samples kept in memory (MIBTOP_AGENT_MAX_SAMPLES, default one hour at 1 Hz).
/// The log file keeps everything.
pub fn max_samples() -> usize {
    static MAX: OnceCell<usize> = OnceCell::new();
    *MAX.get_or_init(|| {
        std::env::var("MIBTOP_AGENT_MAX_SAMPLES")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&v: &usize| v > 0)
            .unwrap_or(DEFAULT_MAX_SAMPLES)
    })
}
