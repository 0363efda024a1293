//! Orders entities by how much counter they accumulated over their observed window.

use serde::Serialize;

use crate::counters::signed_delta;
use crate::types::{Cumulative, SeriesMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranked {
    pub name: String,
    /// Last counter value minus first. Not rate-normalized, so short-lived entities
    /// score lower than long-lived ones with the same load.
    pub growth: i64,
}

/// Entities with at least two samples, by growth descending. Ties keep input order.
pub fn rank_by_growth<T: Cumulative>(series: &SeriesMap<T>) -> Vec<Ranked> {
    let mut ranked: Vec<Ranked> = series
        .iter()
        .filter_map(|(name, s)| match s {
            [first, .., last] => Some(Ranked {
                name: name.to_string(),
                growth: signed_delta(first.counter(), last.counter()),
            }),
            _ => None,
        })
        .collect();
    // sort_by is stable
    ranked.sort_by(|a, b| b.growth.cmp(&a.growth));
    ranked
}

pub fn top_k(ranked: &[Ranked], k: usize) -> Vec<String> {
    ranked.iter().take(k).map(|r| r.name.clone()).collect()
}
