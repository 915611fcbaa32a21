//! CLI module
//!
//! Command-line interface for archiving one query from one server.
//!
//! ```text
//! forum-archive [OPTIONS] <SERVER> <QUERY>
//! ```

mod commands;
mod runner;

pub use commands::Cli;
pub use runner::Runner;
