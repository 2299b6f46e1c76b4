//! CLI argument parsing with clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

#[derive(Parser)]
#[command(name = "uhttpd-listen")]
#[command(author, version, about = "Bind uhttpd to the current LAN zone addresses")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Defaults to `apply`, which is what the hotplug hook runs
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite uhttpd listen addresses from the LAN zone and restart it
    Apply {
        /// Compute and print the listen lists without changing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the zone, collected addresses and resulting listen lists
    Show,

    /// Install the hotplug hook (and a default config if missing)
    Install {
        /// Binary the hook should run (default: this executable)
        #[arg(long)]
        binary: Option<PathBuf>,
    },

    /// Remove the hotplug hook, keep the config
    Uninstall,

    /// Show version
    Version,
}
