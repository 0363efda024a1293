//! Aggregator and the full derivation pass.

mod common;

use common::{approx, cpu, ps, t, total_three};
use mibtop::aggregate::group_usage;
use mibtop::rate::Pairing;
use mibtop::types::{CpuSnapshot, Dataset, ProcessSample, SeriesMap};
use mibtop::views::{cpu_view, derive, process_view, PipelineOptions};
use mibtop::Classifier;

fn processes() -> SeriesMap<ProcessSample> {
    [
        ("system_server (1234)", vec![ps(0, 0), ps(1, 10), ps(2, 30)]),
        ("surfaceflinger (5)", vec![ps(0, 0), ps(1, 20), ps(2, 40)]),
        ("u0_a55", vec![ps(0, 5), ps(1, 5), ps(2, 25)]),
        ("xyz123unmatched", vec![ps(0, 0), ps(1, 50), ps(2, 50)]),
        ("kworker/0:1 (9)", vec![ps(2, 7)]),
    ]
    .into_iter()
    .map(|(n, s)| (n.to_string(), s))
    .collect()
}

fn dataset() -> Dataset {
    let cores: SeriesMap<CpuSnapshot> = [
        (
            "cpu0".to_string(),
            vec![cpu(0, 50, 450), cpu(1, 100, 450), cpu(2, 100, 550)],
        ),
        // cpu1 missed the t1 reading
        ("cpu1".to_string(), vec![cpu(0, 50, 450), cpu(2, 150, 550)]),
    ]
    .into_iter()
    .collect();
    Dataset {
        cpu_total: total_three(),
        cpu_cores: cores,
        cpu_processes: processes(),
        host: Some("pixel".into()),
    }
}

#[test]
fn group_usage_sums_per_process_means() {
    let usage = group_usage(
        &processes(),
        &total_three(),
        &Classifier::builtin(),
        Pairing::Exact,
    );

    // system_server: 10%, 10% -> 10; surfaceflinger: 20%, 10% -> 15
    assert!(approx(usage.get("android_system").unwrap(), 25.0));
    assert!(approx(usage.get("user_apps").unwrap(), 5.0));
    assert!(approx(usage.get("unknown").unwrap(), 25.0));
    // single-sample kworker contributes nothing
    assert_eq!(usage.get("kernel"), None);

    let order: Vec<&str> = usage.iter().map(|(g, _)| g).collect();
    assert_eq!(order, vec!["android_system", "user_apps", "unknown"]);
}

#[test]
fn group_usage_leaves_out_the_unpairable_entity() {
    let mut procs = processes();
    procs.insert("late (77)".into(), vec![ps(1, 0), ps(9, 5)]);
    let usage = group_usage(&procs, &total_three(), &Classifier::builtin(), Pairing::Exact);
    assert_eq!(usage.unpaired(), ["late (77)".to_string()]);
    // everyone else is unaffected
    assert!(approx(usage.get("unknown").unwrap(), 25.0));
    assert!(approx(usage.get("android_system").unwrap(), 25.0));
}

#[test]
fn unpairable_process_never_costs_the_cpu_view() {
    let mut data = dataset();
    data.cpu_processes
        .insert("late (77)".into(), vec![ps(1, 0), ps(9, 500)]);
    let views = derive(&data, &Classifier::builtin(), &PipelineOptions::default());

    assert_eq!(views.cpu.series[0].values, vec![Some(50.0), Some(50.0)]);
    assert_eq!(views.processes.unpaired, vec!["late (77)"]);
    assert!(views.processes.selected.contains(&"late (77)".to_string()));
    assert!(views.processes.series.iter().all(|s| s.label != "late (77)"));
    assert_eq!(views.groups.unpaired(), ["late (77)".to_string()]);
}

#[test]
fn repeated_total_stamp_keeps_every_interval() {
    // two blocks landed in the same second
    let total = vec![cpu(0, 0, 0), cpu(1, 100, 0), cpu(1, 100, 100), cpu(2, 200, 100)];
    let data = Dataset {
        cpu_cores: [("cpu0".to_string(), total.clone())].into_iter().collect(),
        cpu_total: total,
        ..Dataset::default()
    };
    let view = cpu_view(&data);
    assert_eq!(view.labels, vec![t(1), t(1), t(2)]);
    let expected = vec![Some(100.0), Some(0.0), Some(100.0)];
    assert_eq!(view.series[0].values, expected);
    assert_eq!(view.series[1].values, expected);
}

#[test]
fn cpu_view_uses_total_timeline_and_keeps_core_gaps() {
    let view = cpu_view(&dataset());
    assert_eq!(view.labels, vec![t(1), t(2)]);
    let labels: Vec<&str> = view.series.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Total CPU", "cpu0", "cpu1"]);

    assert_eq!(view.series[0].values, vec![Some(50.0), Some(50.0)]);
    assert_eq!(view.series[1].values, vec![Some(100.0), Some(0.0)]);
    assert_eq!(view.series[2].values, vec![None, Some(50.0)]);
}

#[test]
fn process_view_defaults_to_top_k_on_union_timeline() {
    let data = dataset();
    let opts = PipelineOptions {
        top_k: 2,
        pairing: Pairing::Exact,
    };
    let view = process_view(&data, &opts);
    assert_eq!(view.labels, vec![t(0), t(1), t(2)]);
    assert_eq!(view.ranking.len(), 4);
    // growth: xyz 50, surfaceflinger 40, system_server 30, u0_a55 20
    assert_eq!(view.selected, vec!["xyz123unmatched", "surfaceflinger (5)"]);
    assert_eq!(view.series.len(), 2);
    assert_eq!(view.series[0].values[0], None);
    assert_eq!(view.series[0].values[1], Some(50.0));
}

#[test]
fn reselect_recomputes_only_the_new_selection() {
    let data = dataset();
    let mut view = process_view(&data, &PipelineOptions::default());
    assert_eq!(view.selected.len(), 4);

    view.reselect(
        &data,
        vec!["u0_a55".into(), "not running".into()],
        Pairing::Exact,
    );
    assert_eq!(view.selected, vec!["u0_a55", "not running"]);
    // unknown names are skipped, not drawn as zero lines
    assert_eq!(view.series.len(), 1);
    assert_eq!(view.series[0].label, "u0_a55");
    assert_eq!(view.series[0].values, vec![None, Some(0.0), Some(10.0)]);
}

#[test]
fn derive_produces_all_three_views() {
    let views = derive(
        &dataset(),
        &Classifier::builtin(),
        &PipelineOptions::default(),
    );
    assert_eq!(views.cpu.series.len(), 3);
    assert_eq!(views.processes.ranking.len(), 4);
    assert_eq!(views.groups.len(), 3);
}

#[test]
fn empty_dataset_derives_empty_views() {
    let views = derive(
        &Dataset::default(),
        &Classifier::builtin(),
        &PipelineOptions::default(),
    );
    assert!(views.cpu.labels.is_empty());
    assert_eq!(views.cpu.series.len(), 1);
    assert!(views.processes.ranking.is_empty());
    assert!(views.groups.is_empty());
}
