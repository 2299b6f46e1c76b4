//! uhttpd-listen - bind uhttpd to the current LAN zone addresses.

use anyhow::Result;
use std::io::IsTerminal;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use uhttpd_listen::cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_ansi(std::io::stdout().is_terminal())
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        None => uhttpd_listen::commands::apply::run(false, &cli.config).await,
        Some(Commands::Apply { dry_run }) => {
            uhttpd_listen::commands::apply::run(dry_run, &cli.config).await
        }
        Some(Commands::Show) => uhttpd_listen::commands::show::run(&cli.config).await,
        Some(Commands::Install { binary }) => {
            uhttpd_listen::commands::install::run(binary, &cli.config).await
        }
        Some(Commands::Uninstall) => uhttpd_listen::commands::uninstall::run().await,
        Some(Commands::Version) => {
            println!("uhttpd-listen {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
