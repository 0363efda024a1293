//! Error types for pairing, rule loading and data sources.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::Timestamp;

/// A process sample could not be matched to a total-CPU sample.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PairingError {
    #[error("no total-CPU samples to pair against")]
    NoTotalSamples,
    #[error("no total-CPU sample at {time}")]
    Unmatched { time: Timestamp },
}

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("group `{group}`: invalid pattern `{pattern}`: {source}")]
    Pattern {
        group: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("rule table has a group with an empty name")]
    EmptyGroupName,
    #[error("rule table has an empty default group")]
    EmptyDefault,
    #[error("reading rules from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing rules in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Data retrieval failure. Always fatal for the pass.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid source url `{url}`: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("websocket: {0}")]
    Ws(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("websocket closed before a dataset arrived")]
    Closed,
    #[error("decompressing dataset: {0}")]
    Gzip(#[source] std::io::Error),
    #[error("decoding dataset: {0}")]
    Json(#[from] serde_json::Error),
    #[error("collector log is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
