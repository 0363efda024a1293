//! Activity ranker and timeline aligner.

mod common;

use common::{cpu, ps, t};
use mibtop::rank::{rank_by_growth, top_k, Ranked};
use mibtop::rate::cpu_rates;
use mibtop::timeline::{align, union_timeline};
use mibtop::types::{ProcessSample, SeriesMap};

fn procs() -> SeriesMap<ProcessSample> {
    [
        ("x (1)".to_string(), vec![ps(0, 0), ps(1, 10)]),
        ("y (2)".to_string(), vec![ps(1, 5), ps(3, 15)]),
        ("z (3)".to_string(), vec![ps(0, 0), ps(2, 40), ps(3, 100)]),
        ("w (4)".to_string(), vec![ps(2, 1_000)]),
        ("v (5)".to_string(), vec![]),
    ]
    .into_iter()
    .collect()
}

#[test]
fn ranks_by_net_growth_descending_with_stable_ties() {
    let ranked = rank_by_growth(&procs());
    let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["z (3)", "x (1)", "y (2)"]);
    assert_eq!(ranked[0].growth, 100);
    assert_eq!(ranked[1].growth, ranked[2].growth);
}

#[test]
fn short_series_are_never_ranked() {
    let ranked = rank_by_growth(&procs());
    assert!(ranked.iter().all(|r| r.name != "w (4)" && r.name != "v (5)"));
}

#[test]
fn recycled_pid_can_rank_negative() {
    let map: SeriesMap<ProcessSample> = [
        ("restarted (9)".to_string(), vec![ps(0, 500), ps(1, 20)]),
        ("idle (8)".to_string(), vec![ps(0, 0), ps(1, 0)]),
    ]
    .into_iter()
    .collect();
    let ranked = rank_by_growth(&map);
    assert_eq!(
        ranked,
        vec![
            Ranked {
                name: "idle (8)".into(),
                growth: 0
            },
            Ranked {
                name: "restarted (9)".into(),
                growth: -480
            },
        ]
    );
}

#[test]
fn top_k_takes_a_prefix() {
    let ranked = rank_by_growth(&procs());
    assert_eq!(top_k(&ranked, 2), vec!["z (3)", "x (1)"]);
    assert_eq!(top_k(&ranked, 10).len(), 3);
    assert!(top_k(&ranked, 0).is_empty());
}

#[test]
fn union_timeline_is_sorted_unique_and_covers_every_entity() {
    let map = procs();
    let labels = union_timeline(&map);
    assert_eq!(labels, vec![t(0), t(1), t(2), t(3)]);
    assert!(labels.windows(2).all(|w| w[0] < w[1]));
    let longest = map.iter().map(|(_, s)| s.len()).max().unwrap();
    assert!(labels.len() >= longest);
}

#[test]
fn union_of_nothing_is_empty() {
    assert!(union_timeline(&SeriesMap::<ProcessSample>::new()).is_empty());
}

#[test]
fn align_leaves_gaps_instead_of_zeros() {
    let rates = cpu_rates(&[cpu(0, 0, 0), cpu(2, 50, 50)]);
    let labels = vec![t(0), t(1), t(2), t(3)];
    assert_eq!(align(&rates, &labels), vec![None, None, Some(50.0), None]);
}

#[test]
fn align_uses_each_point_once_on_repeated_labels() {
    let rates = cpu_rates(&[cpu(0, 0, 0), cpu(1, 100, 0), cpu(1, 100, 100)]);
    let labels = vec![t(1), t(1), t(1)];
    assert_eq!(
        align(&rates, &labels),
        vec![Some(100.0), Some(0.0), None]
    );
}
