//! Background sampler: one block per tick, appended to the log and folded into the dataset.

use std::path::Path;

use mibtop::logfmt::parse_timestamp;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, warn};

use crate::metrics::{collect_block, Block};
use crate::state::AppState;

pub fn spawn_sampler(state: AppState, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut warned = false;
        loop {
            ticker.tick().await;
            let block = collect_block(&state).await;
            if block.cpu_lines.is_empty() {
                if !warned {
                    warn!("no /proc/stat cpu lines on this host; serving an empty dataset");
                    warned = true;
                }
                continue;
            }
            if let Err(e) = record_block(&state, &block).await {
                warn!("appending to {} failed: {e}", state.log_path.display());
            }
        }
    })
}

/// Fold the block into the served dataset, then append it to the log. A log write
/// failure is reported but the sample stays in memory.
///
/// Stamps have one-second resolution; a tick landing in an already recorded second is
/// dropped and `Ok(false)` returned.
pub async fn record_block(state: &AppState, block: &Block) -> std::io::Result<bool> {
    let text = block.render();
    {
        let mut collector = state.collector.lock().await;
        let stamp = parse_timestamp(&block.stamp);
        if stamp.is_some() && stamp == collector.dataset().last_time() {
            debug!("second {} already recorded, skipping tick", block.stamp);
            return Ok(false);
        }
        collector.feed(&text);
        collector.keep_last(state.max_samples);
        // invalidate under the collector lock so a concurrent reader cannot cache stale JSON
        state.last_json.write().await.clear();
    }
    append_log(&state.log_path, &text).await?;
    Ok(true)
}

async fn append_log(path: &Path, text: &str) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(text.as_bytes()).await?;
    file.flush().await
}
