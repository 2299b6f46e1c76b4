//! Small helpers shared by the command implementations.

use anyhow::Result;

use crate::error::ListenError;

/// Check if running as root (effective UID == 0)
///
/// Writing UCI configuration and restarting services needs root on
/// OpenWrt.
pub fn check_root() -> Result<()> {
    // SAFETY: geteuid() has no preconditions and never fails.
    let euid = unsafe { libc::geteuid() };

    if euid != 0 {
        return Err(ListenError::Permission(
            "this operation requires root privileges".to_string(),
        )
        .into());
    }
    Ok(())
}

/// Render a list for display, `(none)` when empty.
///
/// # Examples
/// ```
/// use uhttpd_listen::utils::format_list;
/// assert_eq!(format_list(&["a".to_string(), "b".to_string()]), "a b");
/// assert_eq!(format_list(&[]), "(none)");
/// ```
pub fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(" ")
    }
}
