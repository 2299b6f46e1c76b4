//! Validation of names that end up on `uci` and init-script command lines.

use anyhow::{bail, Result};

/// Validate a UCI package, section or option name.
///
/// UCI only accepts `[A-Za-z0-9_]` in identifiers.
///
/// # Examples
/// ```
/// use uhttpd_listen::validation::validate_uci_name;
/// assert!(validate_uci_name("section", "main").is_ok());
/// assert!(validate_uci_name("section", "main.listen").is_err());
/// ```
pub fn validate_uci_name(field: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("{} cannot be empty", field);
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        bail!(
            "Invalid {} '{}'. Only letters, digits and '_' are allowed",
            field,
            name
        );
    }
    Ok(())
}

/// Validate an init script name under /etc/init.d.
///
/// # Examples
/// ```
/// use uhttpd_listen::validation::validate_service_name;
/// assert!(validate_service_name("uhttpd").is_ok());
/// assert!(validate_service_name("../sbin/reboot").is_err());
/// ```
pub fn validate_service_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("daemon.service cannot be empty");
    }
    if name.starts_with('.')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        bail!("Invalid daemon.service '{}'", name);
    }
    Ok(())
}

/// Validate a TCP port (0 is not bindable as a fixed listen port).
pub fn validate_port(field: &str, port: u16) -> Result<()> {
    if port == 0 {
        bail!("{} must be between 1 and 65535", field);
    }
    Ok(())
}
