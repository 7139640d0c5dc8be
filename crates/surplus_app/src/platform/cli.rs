use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "surplus_watch")]
#[command(version, about = "Watches a surplus-food marketplace and alerts on new offers")]
pub struct Cli {
    /// Config file to use instead of the per-user default
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file (defaults to surplus_watch.log next to the config file)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Debug logging, mirrored to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Run a single poll, print the matching offers and exit
    #[arg(long)]
    pub once: bool,
}
