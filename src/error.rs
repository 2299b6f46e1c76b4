//! Error types for uhttpd-listen.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListenError {
    #[error("UCI query failed for '{path}': {reason}")]
    Uci { path: String, reason: String },

    #[error("UCI commit of package '{package}' failed: {reason}")]
    Commit { package: String, reason: String },

    #[error("Service '{service}' {action} failed: {reason}")]
    Service {
        service: String,
        action: String,
        reason: String,
    },

    #[error("Network status error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    Permission(String),
}
