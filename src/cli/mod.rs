//! CLI module
//!
//! Command-line interface for the fee monitor.
//!
//! # Commands
//!
//! - `run` - Track and report on a schedule until interrupted
//! - `track` / `report` - Run one scheduled job now
//! - `events` - Drain the event feed of a block
//! - `block-number`, `price`, `gas`, `trigger` - One-off node and quote calls

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
