//! Data retrieval: the one await point before any derivation starts.

use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::info;
use url::Url;

use crate::error::SourceError;
use crate::logfmt::parse_log;
use crate::types::Dataset;

/// Request understood by the agent; the `_gz` variant asks for a gzip binary reply.
pub const GET_DATASET: &str = "get_dataset";
pub const GET_DATASET_GZ: &str = "get_dataset_gz";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// `.json`, `.json.gz`, or a raw collector log (`.log` / `.txt`, optionally `.gz`).
    File(PathBuf),
    /// Agent WebSocket endpoint, e.g. `ws://127.0.0.1:3000/ws` or `wss://` behind a TLS proxy.
    Ws(String),
}

impl Source {
    pub fn parse(arg: &str) -> Self {
        if arg.starts_with("ws://") || arg.starts_with("wss://") {
            Source::Ws(arg.to_string())
        } else {
            Source::File(PathBuf::from(arg))
        }
    }

    pub async fn fetch(&self) -> Result<Dataset, SourceError> {
        let data = match self {
            Source::File(path) => load_file(path).await?,
            Source::Ws(url) => request_dataset(url).await?,
        };
        info!(
            total = data.cpu_total.len(),
            cores = data.cpu_cores.len(),
            processes = data.cpu_processes.len(),
            "dataset loaded"
        );
        Ok(data)
    }
}

pub fn gunzip(bytes: &[u8]) -> Result<Vec<u8>, SourceError> {
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(SourceError::Gzip)?;
    Ok(out)
}

/// Decode file contents; `name` selects the format by extension.
pub fn decode(name: &str, bytes: Vec<u8>) -> Result<Dataset, SourceError> {
    let (name, bytes) = match name.strip_suffix(".gz") {
        Some(inner) => (inner, gunzip(&bytes)?),
        None => (name, bytes),
    };
    if name.ends_with(".log") || name.ends_with(".txt") {
        Ok(parse_log(&String::from_utf8(bytes)?))
    } else {
        Ok(serde_json::from_slice(&bytes)?)
    }
}

pub async fn load_file(path: &Path) -> Result<Dataset, SourceError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    decode(&name, bytes)
}

// Send a "get_dataset" request and await a single reply (JSON text or gzip binary)
pub async fn request_dataset(url: &str) -> Result<Dataset, SourceError> {
    let parsed = Url::parse(url).map_err(|source| SourceError::Url {
        url: url.to_string(),
        source,
    })?;
    if parsed.scheme() == "wss" {
        // rustls needs a process-wide provider; a second install is a no-op error
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    }
    let (mut ws, _) = connect_async(parsed.as_str()).await?;
    ws.send(Message::Text(GET_DATASET.into())).await?;
    while let Some(msg) = ws.next().await {
        match msg? {
            Message::Text(json) => {
                let _ = ws.close(None).await;
                return Ok(serde_json::from_str(&json)?);
            }
            Message::Binary(gz) => {
                let _ = ws.close(None).await;
                return Ok(serde_json::from_slice(&gunzip(&gz)?)?);
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
    Err(SourceError::Closed)
}
