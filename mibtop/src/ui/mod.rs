//! UI module root: exposes drawing functions for individual panels.

pub mod chart;
pub mod cpu;
pub mod groups;
pub mod header;
pub mod processes;
pub mod theme;
pub mod util;
