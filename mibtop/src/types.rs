//! Types that mirror the collector's JSON dataset.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use chrono::NaiveDateTime;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sample timestamps are naive local time, as written by the collector.
pub type Timestamp = NaiveDateTime;

/// One `/proc/stat` cpu line. All counters are cumulative jiffies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSnapshot {
    pub time: Timestamp,
    #[serde(default)]
    pub user: u64,
    #[serde(default)]
    pub nice: u64,
    #[serde(default)]
    pub system: u64,
    #[serde(default)]
    pub idle: u64,
    #[serde(default)]
    pub iowait: u64,
    #[serde(default)]
    pub irq: u64,
    #[serde(default)]
    pub softirq: u64,
    #[serde(default)]
    pub steal: u64,
    // guest time is already folded into user/nice by the kernel; kept for completeness only
    #[serde(default)]
    pub guest: u64,
    #[serde(default)]
    pub guest_nice: u64,
}

impl CpuSnapshot {
    pub fn active_ticks(&self) -> u64 {
        self.user
            .saturating_add(self.nice)
            .saturating_add(self.system)
            .saturating_add(self.irq)
            .saturating_add(self.softirq)
            .saturating_add(self.steal)
    }

    pub fn idle_ticks(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn total_ticks(&self) -> u64 {
        self.active_ticks().saturating_add(self.idle_ticks())
    }
}

/// Cumulative user+system ticks of one process at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSample {
    pub time: Timestamp,
    #[serde(rename = "usage_sum_utime_stime")]
    pub cpu_ticks: u64,
}

/// Anything carrying a sample timestamp.
pub trait Sampled {
    fn time(&self) -> Timestamp;
}

/// A sample with one monotonically growing counter used for activity ranking.
pub trait Cumulative: Sampled {
    fn counter(&self) -> u64;
}

impl Sampled for CpuSnapshot {
    fn time(&self) -> Timestamp {
        self.time
    }
}

impl Cumulative for CpuSnapshot {
    fn counter(&self) -> u64 {
        self.active_ticks()
    }
}

impl Sampled for ProcessSample {
    fn time(&self) -> Timestamp {
        self.time
    }
}

impl Cumulative for ProcessSample {
    fn counter(&self) -> u64 {
        self.cpu_ticks
    }
}

/// Thing with its own time series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entity {
    TotalCpu,
    Core(String),
    Process(String),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::TotalCpu => f.write_str("Total CPU"),
            Entity::Core(id) => f.write_str(id),
            Entity::Process(name) => f.write_str(name),
        }
    }
}

/// Entity name -> series, keeping the order entities first appeared in.
///
/// Ordering matters: it is the tie order for ranking and the display order for cores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesMap<T> {
    entries: Vec<(String, Vec<T>)>,
    index: HashMap<String, usize>,
}

impl<T> Default for SeriesMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> SeriesMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&[T]> {
        self.index.get(name).map(|&i| self.entries[i].1.as_slice())
    }

    /// Insert or replace a whole series. A replaced entity keeps its original position.
    pub fn insert(&mut self, name: String, series: Vec<T>) {
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = series,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, series));
            }
        }
    }

    /// Append one sample to an entity's series, creating it on first use.
    pub fn push(&mut self, name: &str, sample: T) {
        match self.index.get(name) {
            Some(&i) => self.entries[i].1.push(sample),
            None => {
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push((name.to_string(), vec![sample]));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.entries
            .iter()
            .map(|(name, series)| (name.as_str(), series.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Keep only samples matching `keep`; entities left empty are removed.
    pub fn retain_samples<F: FnMut(&T) -> bool>(&mut self, mut keep: F) {
        for (_, series) in &mut self.entries {
            series.retain(&mut keep);
        }
        self.entries.retain(|(_, series)| !series.is_empty());
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (name, _))| (name.clone(), i))
            .collect();
    }
}

impl<T> FromIterator<(String, Vec<T>)> for SeriesMap<T> {
    fn from_iter<I: IntoIterator<Item = (String, Vec<T>)>>(iter: I) -> Self {
        let mut map = SeriesMap::new();
        for (name, series) in iter {
            map.insert(name, series);
        }
        map
    }
}

impl<T: Serialize> Serialize for SeriesMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, series) in &self.entries {
            map.serialize_entry(name, series)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for SeriesMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SeriesMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for SeriesMapVisitor<T> {
            type Value = SeriesMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of entity name to sample series")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = SeriesMap::new();
                while let Some((name, series)) = access.next_entry::<String, Vec<T>>()? {
                    out.insert(name, series);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(SeriesMapVisitor(PhantomData))
    }
}

/// The full input of one derivation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub cpu_total: Vec<CpuSnapshot>,
    pub cpu_cores: SeriesMap<CpuSnapshot>,
    pub cpu_processes: SeriesMap<ProcessSample>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl Dataset {
    /// Keep the newest `n` total-CPU samples and drop every core or process sample older
    /// than the first one kept. Processes that exited before that point disappear.
    pub fn keep_last(&mut self, n: usize) {
        if self.cpu_total.len() <= n {
            return;
        }
        self.cpu_total.drain(..self.cpu_total.len() - n);
        let Some(cutoff) = self.cpu_total.first().map(|s| s.time) else {
            self.cpu_cores = SeriesMap::new();
            self.cpu_processes = SeriesMap::new();
            return;
        };
        self.cpu_cores.retain_samples(|s| s.time >= cutoff);
        self.cpu_processes.retain_samples(|s| s.time >= cutoff);
    }

    /// Timestamp of the newest total-CPU sample.
    pub fn last_time(&self) -> Option<Timestamp> {
        self.cpu_total.last().map(|s| s.time)
    }
}
