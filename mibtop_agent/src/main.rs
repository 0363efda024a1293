//! Entry point for mibtop_agent: start the sampler and serve /ws.

use std::net::SocketAddr;

use axum::{routing::get, Router};
use mibtop_agent::config::parse_args;
use mibtop_agent::sampler::spawn_sampler;
use mibtop_agent::state::AppState;
use mibtop_agent::ws::ws_handler;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = parse_args(std::env::args());
    let host = hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().into_owned());
    let state = AppState::new(cfg.log_path.clone(), host);

    let _sampler = spawn_sampler(state.clone(), cfg.interval);

    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(
        "mibtop agent at ws://{}/ws, sampling every {:?} into {}",
        listener.local_addr()?,
        cfg.interval,
        cfg.log_path.display()
    );
    axum::serve(listener, app).await?;
    Ok(())
}
