//! Library entry for mibtop: CPU utilization views derived from cumulative /proc counters.
//!
//! Flow: [`source`] fetches a [`types::Dataset`]; [`views::derive`] runs the pure pipeline
//! ([`rate`], [`timeline`], [`rank`], [`classify`], [`aggregate`]) and returns the three views
//! a renderer consumes.

pub mod aggregate;
pub mod classify;
pub mod counters;
pub mod error;
pub mod logfmt;
pub mod rank;
pub mod rate;
pub mod rules;
pub mod source;
pub mod timeline;
pub mod types;
pub mod views;

pub use classify::Classifier;
pub use error::{PairingError, RuleError, SourceError};
pub use rate::Pairing;
pub use source::Source;
pub use types::Dataset;
pub use views::{derive, PipelineOptions, Views};
