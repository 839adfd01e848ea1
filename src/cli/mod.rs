//! CLI module
//!
//! Command-line interface for printing histories.
//!
//! # Commands
//!
//! - `wishes` - Wish history of one banner or all banners merged
//! - `transactions` - Transactions of one log or all logs merged

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
