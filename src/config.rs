//! Configuration management for uhttpd-listen.
//!
//! The hook runs fine without a config file: every value has a default
//! matching a stock OpenWrt install.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ListenError;
use crate::validation::{validate_port, validate_service_name, validate_uci_name};

pub const DEFAULT_CONFIG_PATH: &str = "/etc/uhttpd-listen/config.yaml";
const DEFAULT_LOCK_FILE: &str = "/var/run/uhttpd-listen.lock";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which firewall zone supplies the listen addresses
    pub zone: ZoneConfig,

    /// Web daemon whose listen lists are rewritten
    pub daemon: DaemonConfig,

    /// Lock file serialising concurrent runs
    pub lock_file: PathBuf,
}

/// Firewall zone selection
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// UCI package holding the zones
    pub package: String,
    /// Zone name to look up
    pub name: String,
}

/// Target daemon settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// UCI package of the daemon
    pub package: String,
    /// Section holding `listen_http`/`listen_https`
    pub section: String,
    /// Init script name
    pub service: String,
    pub http_port: u16,
    pub https_port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zone: ZoneConfig::default(),
            daemon: DaemonConfig::default(),
            lock_file: PathBuf::from(DEFAULT_LOCK_FILE),
        }
    }
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            package: "firewall".to_string(),
            name: "lan".to_string(),
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            package: "uhttpd".to_string(),
            section: "main".to_string(),
            service: "uhttpd".to_string(),
            http_port: 80,
            https_port: 443,
        }
    }
}

impl Config {
    /// Load configuration from YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;

        config
            .validate()
            .map_err(|e| ListenError::Config(format!("{:#}", e)))?;

        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        validate_uci_name("zone.package", &self.zone.package)?;
        if self.zone.name.trim().is_empty() {
            anyhow::bail!("zone.name cannot be empty");
        }
        validate_uci_name("daemon.package", &self.daemon.package)?;
        validate_uci_name("daemon.section", &self.daemon.section)?;
        validate_service_name(&self.daemon.service)?;
        validate_port("daemon.http_port", self.daemon.http_port)?;
        validate_port("daemon.https_port", self.daemon.https_port)?;

        if self.daemon.http_port == self.daemon.https_port {
            anyhow::bail!(
                "daemon.http_port and daemon.https_port must differ (both {})",
                self.daemon.http_port
            );
        }

        if self.lock_file.as_os_str().is_empty() {
            anyhow::bail!("lock_file cannot be empty");
        }

        Ok(())
    }

    /// Commented default configuration written by `install`
    pub fn generate_default_yaml() -> String {
        r#"# uhttpd-listen configuration
#
# The hook binds the web interface to the addresses of one firewall zone.
# IPv4 addresses are always used; IPv6 addresses only if they are
# unique-local (fc00::/7).

zone:
  # UCI package containing the firewall zones
  package: firewall
  # Zone whose interfaces provide the listen addresses
  name: lan

daemon:
  package: uhttpd
  section: main
  service: uhttpd
  http_port: 80
  https_port: 443

lock_file: /var/run/uhttpd-listen.lock
"#
        .to_string()
    }
}
