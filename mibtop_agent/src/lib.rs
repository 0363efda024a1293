//! mibtop_agent: samples /proc CPU counters into a collector log and serves the
//! accumulated dataset over WebSocket.

pub mod config;
pub mod metrics;
pub mod sampler;
pub mod state;
pub mod ws;
