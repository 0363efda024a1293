//! Shared label axis for entities sampled on different schedules.

use std::collections::BTreeSet;

use crate::rate::RateSeries;
use crate::types::{Sampled, SeriesMap, Timestamp};

/// Sorted union of every timestamp seen in any series, without duplicates.
pub fn union_timeline<T: Sampled>(series: &SeriesMap<T>) -> Vec<Timestamp> {
    series
        .iter()
        .flat_map(|(_, s)| s.iter().map(Sampled::time))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Place a rate series on `labels` (sorted ascending). Labels the series has no
/// point for stay `None`: a gap, never a zero. Each point fills at most one label, so
/// repeated stamps pair up in order.
pub fn align(rates: &RateSeries, labels: &[Timestamp]) -> Vec<Option<f64>> {
    let points = rates.points();
    let mut j = 0;
    labels
        .iter()
        .map(|label| {
            while j < points.len() && points[j].time < *label {
                j += 1;
            }
            match points.get(j) {
                Some(p) if p.time == *label => {
                    j += 1;
                    Some(p.percent)
                }
                _ => None,
            }
        })
        .collect()
}
