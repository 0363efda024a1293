//! WebSocket upgrade and per-connection handler. Serves the cached dataset JSON.

use std::io::Write;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use flate2::{write::GzEncoder, Compression};
use futures_util::stream::StreamExt;
use mibtop::source::{GET_DATASET, GET_DATASET_GZ};
use tracing::warn;

use crate::state::AppState;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: AppState) {
    while let Some(Ok(msg)) = socket.next().await {
        match msg {
            Message::Text(text) if text == GET_DATASET => {
                if let Some(js) = dataset_json(&state).await {
                    let _ = socket.send(Message::Text(js)).await;
                }
            }
            Message::Text(text) if text == GET_DATASET_GZ => {
                if let Some(js) = dataset_json(&state).await {
                    match gzip(js.as_bytes()) {
                        Ok(bytes) => {
                            let _ = socket.send(Message::Binary(bytes)).await;
                        }
                        Err(e) => warn!("gzip dataset failed: {e}"),
                    }
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }
}

/// Cached JSON, or serialize once on a cold cache.
pub async fn dataset_json(state: &AppState) -> Option<String> {
    {
        let cached = state.last_json.read().await;
        if !cached.is_empty() {
            return Some(cached.clone());
        }
    }
    let collector = state.collector.lock().await;
    match serde_json::to_string(collector.dataset()) {
        Ok(js) => {
            *state.last_json.write().await = js.clone();
            Some(js)
        }
        Err(e) => {
            warn!("serializing dataset failed: {e}");
            None
        }
    }
}

fn gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::fast());
    enc.write_all(bytes)?;
    enc.finish()
}
