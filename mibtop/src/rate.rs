//! Turns snapshot series into percentage series, one value per adjacent pair.

use std::str::FromStr;

use serde::Serialize;

use crate::counters::{diff, percent_of, tick_delta};
use crate::error::PairingError;
use crate::types::{CpuSnapshot, ProcessSample, Timestamp};

/// One interval's utilization, stamped with the interval's end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatePoint {
    pub time: Timestamp,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RateSeries {
    points: Vec<RatePoint>,
}

impl RateSeries {
    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.percent)
    }

    /// Arithmetic mean, `None` for an empty series.
    pub fn mean(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        Some(self.values().sum::<f64>() / self.points.len() as f64)
    }
}

impl FromIterator<RatePoint> for RateSeries {
    fn from_iter<I: IntoIterator<Item = RatePoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Busy percentage of a total or per-core series. Length is `series.len() - 1`.
pub fn cpu_rates(series: &[CpuSnapshot]) -> RateSeries {
    series
        .windows(2)
        .map(|w| RatePoint {
            time: w[1].time,
            percent: diff(&w[0], &w[1]).busy_percent(),
        })
        .collect()
}

/// How a process sample finds the total-CPU sample covering the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pairing {
    /// Timestamps must match exactly; anything else is rejected.
    #[default]
    Exact,
    /// Closest total-CPU sample wins; ties go to the earlier one.
    Nearest,
}

impl FromStr for Pairing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Pairing::Exact),
            "nearest" => Ok(Pairing::Nearest),
            other => Err(format!("unknown pairing `{other}` (expected exact|nearest)")),
        }
    }
}

fn pair_total<'a>(
    time: Timestamp,
    total: &'a [CpuSnapshot],
    pairing: Pairing,
) -> Result<&'a CpuSnapshot, PairingError> {
    if total.is_empty() {
        return Err(PairingError::NoTotalSamples);
    }
    match total.binary_search_by(|s| s.time.cmp(&time)) {
        Ok(i) => Ok(&total[i]),
        Err(_) if pairing == Pairing::Exact => Err(PairingError::Unmatched { time }),
        Err(i) => {
            if i == 0 {
                return Ok(&total[0]);
            }
            if i == total.len() {
                return Ok(&total[i - 1]);
            }
            let before = &total[i - 1];
            let after = &total[i];
            if after.time - time < time - before.time {
                Ok(after)
            } else {
                Ok(before)
            }
        }
    }
}

/// A process's share of whole-system time per interval.
///
/// Numerator is the process tick growth, denominator the system total-time growth
/// between the total-CPU samples paired with the interval's two ends. `total` must be
/// sorted by time.
pub fn process_rates(
    samples: &[ProcessSample],
    total: &[CpuSnapshot],
    pairing: Pairing,
) -> Result<RateSeries, PairingError> {
    if samples.len() < 2 {
        return Ok(RateSeries::default());
    }
    let paired = samples
        .iter()
        .map(|s| pair_total(s.time, total, pairing))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(samples
        .windows(2)
        .zip(paired.windows(2))
        .map(|(p, t)| RatePoint {
            time: p[1].time,
            percent: percent_of(tick_delta(&p[0], &p[1]), diff(t[0], t[1]).total()),
        })
        .collect())
}
