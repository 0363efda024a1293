//! Shared agent state: the recent dataset window and its hot JSON cache.

use std::path::PathBuf;
use std::sync::Arc;

use mibtop::logfmt::LogParser;
use sysinfo::System;
use tokio::sync::{Mutex, RwLock};

use crate::config::max_samples;

pub type SharedSystem = Arc<Mutex<System>>;
pub type SharedCollector = Arc<Mutex<LogParser>>;

#[derive(Clone)]
pub struct AppState {
    // Persistent sysinfo handle (process enumeration)
    pub sys: SharedSystem,

    // Every block sampled so far, parsed through the same reader the client uses
    pub collector: SharedCollector,

    // Last serialized JSON dataset for fast WS responses
    pub last_json: Arc<RwLock<String>>,

    pub log_path: PathBuf,

    // In-memory history bound; older samples live only in the log
    pub max_samples: usize,
}

impl AppState {
    pub fn new(log_path: PathBuf, host: Option<String>) -> Self {
        let mut collector = LogParser::new();
        collector.set_host(host);
        Self {
            sys: Arc::new(Mutex::new(System::new())),
            collector: Arc::new(Mutex::new(collector)),
            last_json: Arc::new(RwLock::new(String::new())),
            log_path,
            max_samples: max_samples(),
        }
    }
}
