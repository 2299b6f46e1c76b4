//! Installation of the hotplug hook that triggers a run on interface events.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::Config;
use crate::fs_abstraction::FileSystem;

pub const HOTPLUG_HOOK: &str = "/etc/hotplug.d/iface/95-uhttpd-listen";

/// syslog tag of the hook's output.
pub const SYSLOG_TAG: &str = "uhttpd-listen";

/// Files touched by [`install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub hook: PathBuf,
    /// Set when a default config file was written.
    pub config: Option<PathBuf>,
}

/// Reject paths that cannot be embedded in a single-quoted shell word.
fn validate_shell_path(what: &str, path: &Path) -> Result<String> {
    let s = path
        .to_str()
        .with_context(|| format!("{} path is not valid UTF-8: {:?}", what, path))?;
    if s.is_empty() || s.contains(['\'', '\n', '\r']) {
        anyhow::bail!("{} path cannot be used in a shell script: {:?}", what, path);
    }
    Ok(s.to_string())
}

/// Hotplug script running the binary on `ifup`/`ifupdate`.
///
/// hotplug-call discards the output of its scripts, so everything the
/// binary prints is piped into `logger`.
pub fn generate_hotplug_script(binary: &Path, config: &Path) -> Result<String> {
    let binary = validate_shell_path("Binary", binary)?;
    let config = validate_shell_path("Config", config)?;

    Ok(format!(
        r#"#!/bin/sh
# Installed by uhttpd-listen. Rebinds uhttpd to the current LAN addresses.

[ "$ACTION" = "ifup" ] || [ "$ACTION" = "ifupdate" ] || exit 0

'{}' --config '{}' apply 2>&1 | logger -t {}
"#,
        binary, config, SYSLOG_TAG
    ))
}

/// Write the hotplug hook, and a default config if none exists.
///
/// Refuses to overwrite an existing hook.
pub fn install<F: FileSystem + ?Sized>(
    fs: &F,
    hook: &Path,
    binary: &Path,
    config_path: &Path,
) -> Result<InstallReport> {
    if fs.exists(hook) {
        anyhow::bail!(
            "Hotplug hook already exists at {:?}.\n\
             Run 'uhttpd-listen uninstall' first if you want to reinstall.",
            hook
        );
    }

    let script = generate_hotplug_script(binary, config_path)?;

    if let Some(dir) = hook.parent() {
        fs.create_dir_all(dir)
            .with_context(|| format!("Failed to create {:?}", dir))?;
    }
    info!("Creating {:?}...", hook);
    fs.write(hook, script.as_bytes())
        .with_context(|| format!("Failed to write {:?}", hook))?;
    fs.set_permissions_mode(hook, 0o755)
        .context("Failed to make hotplug hook executable")?;

    let mut written_config = None;
    if !fs.exists(config_path) {
        if let Some(dir) = config_path.parent() {
            fs.create_dir_all(dir)
                .with_context(|| format!("Failed to create {:?}", dir))?;
        }
        info!("Creating {:?}...", config_path);
        fs.write(config_path, Config::generate_default_yaml().as_bytes())
            .context("Failed to write config file")?;
        fs.set_permissions_mode(config_path, 0o644)
            .context("Failed to set config permissions")?;
        written_config = Some(config_path.to_path_buf());
    }

    Ok(InstallReport {
        hook: hook.to_path_buf(),
        config: written_config,
    })
}

/// Remove the hotplug hook. Returns whether a hook was present.
///
/// The config file is left in place.
pub fn uninstall<F: FileSystem + ?Sized>(fs: &F, hook: &Path) -> Result<bool> {
    if !fs.exists(hook) {
        return Ok(false);
    }
    info!("Removing {:?}...", hook);
    fs.remove_file(hook)
        .with_context(|| format!("Failed to remove {:?}", hook))?;
    Ok(true)
}
