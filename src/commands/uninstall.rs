//! Uninstall command implementation.

use anyhow::Result;
use std::path::Path;

use crate::fs_abstraction::real_fs;
use crate::installer::{uninstall, HOTPLUG_HOOK};
use crate::utils::check_root;

/// Run the uninstall command
pub async fn run() -> Result<()> {
    check_root()?;

    if uninstall(real_fs(), Path::new(HOTPLUG_HOOK))? {
        println!("[OK] Hotplug hook removed ({})", HOTPLUG_HOOK);
        println!("     uhttpd keeps its current listen addresses.");
    } else {
        println!("Hotplug hook not installed, nothing to remove.");
    }
    Ok(())
}
