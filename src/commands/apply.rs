//! Apply command implementation (the hotplug hook entry point).

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use super::SystemBackends;
use crate::config::Config;
use crate::hook::{self, ReconcileOutcome};
use crate::lock::LockGuard;
use crate::utils::check_root;

/// Run the apply command
pub async fn run(dry_run: bool, config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;

    if dry_run {
        let backends = SystemBackends::new();
        let outcome = hook::run(&backends.as_backends(), &config, true)?;
        println!("{}", super::show::format_report(&config, &outcome));
        return Ok(());
    }

    check_root()?;
    let _lock = LockGuard::acquire(&config.lock_file)?;

    let backends = SystemBackends::new();
    let outcome = hook::run(&backends.as_backends(), &config, false)
        .context("Failed to reconcile listen addresses")?;

    if let ReconcileOutcome::Applied(_, _, plan) = &outcome {
        info!(
            "{} now listens on {} address(es)",
            config.daemon.service,
            plan.addresses.len()
        );
    }

    Ok(())
}
