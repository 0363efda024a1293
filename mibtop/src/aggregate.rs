//! Folds per-process utilization into per-group totals.

use serde::Serialize;
use tracing::warn;

use crate::classify::Classifier;
use crate::rate::{process_rates, Pairing};
use crate::types::{CpuSnapshot, ProcessSample, SeriesMap};

/// Group -> sum of the mean utilization of every process classified into it.
///
/// This is an unweighted sum of per-process averages, not a share of system time:
/// values do not add up to 100 and a group of many short-lived processes can outweigh
/// one busy long-lived process. Groups appear in order of first contribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupUsage {
    entries: Vec<(String, f64)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unpaired: Vec<String>,
}

impl GroupUsage {
    fn add(&mut self, group: &str, value: f64) {
        match self.entries.iter_mut().find(|(g, _)| g == group) {
            Some((_, sum)) => *sum += value,
            None => self.entries.push((group.to_string(), value)),
        }
    }

    pub fn get(&self, group: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(g, _)| g == group)
            .map(|&(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(g, v)| (g.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Processes left out because their samples could not be paired with total CPU.
    pub fn unpaired(&self) -> &[String] {
        &self.unpaired
    }
}

/// Processes with fewer than two samples are skipped; unpairable ones are skipped and
/// listed in [`GroupUsage::unpaired`].
pub fn group_usage(
    processes: &SeriesMap<ProcessSample>,
    cpu_total: &[CpuSnapshot],
    classifier: &Classifier,
    pairing: Pairing,
) -> GroupUsage {
    let mut usage = GroupUsage::default();
    for (name, samples) in processes.iter() {
        if samples.len() < 2 {
            continue;
        }
        match process_rates(samples, cpu_total, pairing) {
            Ok(rates) => {
                if let Some(mean) = rates.mean() {
                    usage.add(classifier.classify(name), mean);
                }
            }
            Err(e) => {
                warn!("leaving `{name}` out of group usage: {e}");
                usage.unpaired.push(name.to_string());
            }
        }
    }
    usage
}
