//! Strategy orchestrator: configuration, lifecycle, and the run loop.

mod config;
mod runner;

pub use config::{EngineConfig, Handoff};
pub use runner::{Engine, Phase, RunReport};
