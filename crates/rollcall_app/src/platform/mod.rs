//! Process-level glue: configuration, logging and the CLI adapters over the engine.
mod app;
mod cli;
mod config;
mod logging;

pub use app::run_app;
