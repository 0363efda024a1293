//! The derivation pass: dataset in, three render-ready views out. Pure and synchronous.

use serde::Serialize;

use crate::aggregate::{group_usage, GroupUsage};
use crate::classify::Classifier;
use crate::rank::{rank_by_growth, top_k, Ranked};
use crate::rate::{cpu_rates, process_rates, Pairing};
use crate::timeline::{align, union_timeline};
use crate::types::{Dataset, Entity, Timestamp};

pub const DEFAULT_TOP_K: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Size of the default process selection.
    pub top_k: usize,
    pub pairing: Pairing,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            pairing: Pairing::Exact,
        }
    }
}

impl PipelineOptions {
    /// Defaults overridden by MIBTOP_TOP_K and MIBTOP_PAIRING (exact|nearest).
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(k) = std::env::var("MIBTOP_TOP_K")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            opts.top_k = k;
        }
        if let Ok(v) = std::env::var("MIBTOP_PAIRING") {
            match v.parse() {
                Ok(p) => opts.pairing = p,
                Err(e) => tracing::warn!("ignoring MIBTOP_PAIRING: {e}"),
            }
        }
        opts
    }
}

/// One plotted line: values on the view's labels, `None` where the entity has no sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledSeries {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

impl LabeledSeries {
    fn new(entity: &Entity, values: Vec<Option<f64>>) -> Self {
        Self {
            label: entity.to_string(),
            values,
        }
    }
}

/// Total CPU followed by each core, on the total-CPU timeline (interval ends).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CpuView {
    pub labels: Vec<Timestamp>,
    pub series: Vec<LabeledSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProcessView {
    /// Union of every process's timestamps.
    pub labels: Vec<Timestamp>,
    /// All rankable processes, most active first.
    pub ranking: Vec<Ranked>,
    pub selected: Vec<String>,
    pub series: Vec<LabeledSeries>,
    /// Selected processes left out because a sample had no total-CPU counterpart.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unpaired: Vec<String>,
}

impl ProcessView {
    /// Swap the selection and re-derive only the selected series.
    pub fn reselect(&mut self, data: &Dataset, names: Vec<String>, pairing: Pairing) {
        let (series, unpaired) = selected_series(data, &self.labels, &names, pairing);
        self.series = series;
        self.unpaired = unpaired;
        self.selected = names;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Views {
    pub cpu: CpuView,
    pub processes: ProcessView,
    pub groups: GroupUsage,
}

pub fn cpu_view(data: &Dataset) -> CpuView {
    let labels: Vec<Timestamp> = data.cpu_total.iter().skip(1).map(|s| s.time).collect();
    let mut series = Vec::with_capacity(data.cpu_cores.len() + 1);
    // total defines the labels, so it maps onto them by position even across repeated stamps
    series.push(LabeledSeries::new(
        &Entity::TotalCpu,
        cpu_rates(&data.cpu_total).values().map(Some).collect(),
    ));
    for (core, snapshots) in data.cpu_cores.iter() {
        series.push(LabeledSeries::new(
            &Entity::Core(core.to_string()),
            align(&cpu_rates(snapshots), &labels),
        ));
    }
    CpuView { labels, series }
}

/// Rate series for the named processes on `labels`, plus the names that could not be
/// paired with total-CPU samples. Unknown names are skipped.
pub fn selected_series(
    data: &Dataset,
    labels: &[Timestamp],
    names: &[String],
    pairing: Pairing,
) -> (Vec<LabeledSeries>, Vec<String>) {
    let mut out = Vec::with_capacity(names.len());
    let mut unpaired = Vec::new();
    for name in names {
        let Some(samples) = data.cpu_processes.get(name) else {
            tracing::warn!("selected process `{name}` not in dataset");
            continue;
        };
        match process_rates(samples, &data.cpu_total, pairing) {
            Ok(rates) => out.push(LabeledSeries::new(
                &Entity::Process(name.clone()),
                align(&rates, labels),
            )),
            Err(e) => {
                tracing::warn!("leaving `{name}` out of the process chart: {e}");
                unpaired.push(name.clone());
            }
        }
    }
    (out, unpaired)
}

pub fn process_view(data: &Dataset, opts: &PipelineOptions) -> ProcessView {
    let labels = union_timeline(&data.cpu_processes);
    let ranking = rank_by_growth(&data.cpu_processes);
    let selected = top_k(&ranking, opts.top_k);
    let (series, unpaired) = selected_series(data, &labels, &selected, opts.pairing);
    ProcessView {
        labels,
        ranking,
        selected,
        series,
        unpaired,
    }
}

/// Unpairable processes are dropped from the process and group views; they never
/// take the CPU view down with them.
pub fn derive(data: &Dataset, classifier: &Classifier, opts: &PipelineOptions) -> Views {
    let cpu = cpu_view(data);
    let processes = process_view(data, opts);
    let groups = group_usage(&data.cpu_processes, &data.cpu_total, classifier, opts.pairing);
    tracing::info!(
        cores = data.cpu_cores.len(),
        ranked = processes.ranking.len(),
        groups = groups.len(),
        "derived views"
    );
    Views {
        cpu,
        processes,
        groups,
    }
}
