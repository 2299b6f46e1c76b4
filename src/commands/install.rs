//! Install command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::fs_abstraction::real_fs;
use crate::installer::{install, HOTPLUG_HOOK};
use crate::utils::check_root;

/// Run the install command
pub async fn run(binary: Option<PathBuf>, config_path: &Path) -> Result<()> {
    check_root()?;

    let binary = match binary {
        Some(path) => path,
        None => std::env::current_exe().context("Failed to locate the running executable")?,
    };

    let report = install(real_fs(), Path::new(HOTPLUG_HOOK), &binary, config_path)?;

    println!("[OK] Hotplug hook installed at {}", report.hook.display());
    if let Some(config) = report.config {
        println!("     Default config written to {}", config.display());
    }
    println!("     Listen addresses are updated on every ifup/ifupdate event.");
    Ok(())
}
