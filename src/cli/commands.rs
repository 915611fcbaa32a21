//! CLI arguments

use clap::Parser;
use std::path::PathBuf;

/// Archive a forum's posts and comments as raw JSON pages
#[derive(Parser, Debug)]
#[command(name = "forum-archive")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server short name (e.g. "ea", "lw")
    pub server: String,

    /// Query to archive: posts, comments or post_comments
    pub query: String,

    /// Configuration file (YAML)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Root directory for saved pages
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Records requested per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Lower bound of the initial window (RFC 3339)
    #[arg(long)]
    pub start: Option<String>,

    /// Upper bound of the initial window (RFC 3339)
    #[arg(long)]
    pub end: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
