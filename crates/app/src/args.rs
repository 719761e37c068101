pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(about = "Reference-counted record store for files and directories")]
pub struct Args {
    /// Path to the arbor config directory (defaults to ~/.arbor)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Log level (defaults to the configured level, then info)
    #[arg(long, global = true)]
    pub log_level: Option<tracing::Level>,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: crate::Command,
}
