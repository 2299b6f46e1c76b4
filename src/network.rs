//! Live interface address queries.
//!
//! netifd publishes the state of every logical interface over ubus.
//! [`UbusNetwork`] reads one `network.interface dump` per run and memoises
//! it until [`NetworkStatus::flush_cache`] is called, the same way the
//! shell helpers in `/lib/functions/network.sh` do.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

use crate::cmd_abstraction::{args_to_strings, CommandExecutor};
use crate::error::ListenError;

const UBUS_PATH: &str = "/bin/ubus";

/// Source of current interface addresses.
pub trait NetworkStatus: Send + Sync {
    /// Drop any memoised interface state so the next query is fresh.
    fn flush_cache(&self);

    /// IPv4 addresses of a logical interface, without prefix length.
    fn ipv4_addresses(&self, interface: &str) -> Result<Vec<String>, ListenError>;

    /// IPv6 addresses of a logical interface, without prefix length.
    fn ipv6_addresses(&self, interface: &str) -> Result<Vec<String>, ListenError>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressEntry {
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrefixAssignment {
    #[serde(rename = "local-address", default)]
    pub local_address: Option<AddressEntry>,
}

/// Subset of netifd's per-interface status object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InterfaceStatus {
    #[serde(default)]
    pub interface: String,
    #[serde(rename = "ipv4-address", default)]
    pub ipv4_address: Vec<AddressEntry>,
    #[serde(rename = "ipv6-address", default)]
    pub ipv6_address: Vec<AddressEntry>,
    #[serde(rename = "ipv6-prefix-assignment", default)]
    pub ipv6_prefix_assignment: Vec<PrefixAssignment>,
}

impl InterfaceStatus {
    pub fn ipv4(&self) -> Vec<String> {
        self.ipv4_address.iter().map(|a| a.address.clone()).collect()
    }

    /// Own IPv6 addresses followed by the router's address inside each
    /// delegated prefix.
    pub fn ipv6(&self) -> Vec<String> {
        self.ipv6_address
            .iter()
            .map(|a| a.address.clone())
            .chain(
                self.ipv6_prefix_assignment
                    .iter()
                    .filter_map(|p| p.local_address.as_ref())
                    .map(|a| a.address.clone()),
            )
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct InterfaceDump {
    #[serde(default)]
    interface: Vec<InterfaceStatus>,
}

/// Parse the output of `ubus call network.interface dump`.
pub fn parse_dump(json: &str) -> Result<HashMap<String, InterfaceStatus>, ListenError> {
    let dump: InterfaceDump = serde_json::from_str(json)
        .map_err(|e| ListenError::Network(format!("Invalid interface dump: {}", e)))?;
    Ok(dump
        .interface
        .into_iter()
        .map(|status| (status.interface.clone(), status))
        .collect())
}

/// [`NetworkStatus`] backed by netifd over ubus.
pub struct UbusNetwork<E: CommandExecutor> {
    executor: E,
    cache: Mutex<Option<HashMap<String, InterfaceStatus>>>,
}

impl<E: CommandExecutor> UbusNetwork<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            cache: Mutex::new(None),
        }
    }

    fn fetch_dump(&self) -> Result<HashMap<String, InterfaceStatus>, ListenError> {
        let args = args_to_strings(&["call", "network.interface", "dump"]);
        let output = self
            .executor
            .execute(UBUS_PATH, &args)
            .map_err(|e| ListenError::Network(e.to_string()))?;
        if !output.success {
            return Err(ListenError::Network(format!(
                "ubus call network.interface dump failed: {}",
                output.failure_reason()
            )));
        }
        parse_dump(&output.stdout)
    }

    fn with_status<T>(
        &self,
        interface: &str,
        f: impl FnOnce(&InterfaceStatus) -> T,
    ) -> Result<T, ListenError> {
        let mut cache = self
            .cache
            .lock()
            .map_err(|_| ListenError::Network("interface cache poisoned".to_string()))?;
        if cache.is_none() {
            debug!("Loading interface dump from netifd");
            *cache = Some(self.fetch_dump()?);
        }
        cache
            .as_ref()
            .and_then(|dump| dump.get(interface))
            .map(f)
            .ok_or_else(|| ListenError::Network(format!("Interface '{}' not found", interface)))
    }
}

impl<E: CommandExecutor> NetworkStatus for UbusNetwork<E> {
    fn flush_cache(&self) {
        if let Ok(mut cache) = self.cache.lock() {
            *cache = None;
        }
    }

    fn ipv4_addresses(&self, interface: &str) -> Result<Vec<String>, ListenError> {
        self.with_status(interface, InterfaceStatus::ipv4)
    }

    fn ipv6_addresses(&self, interface: &str) -> Result<Vec<String>, ListenError> {
        self.with_status(interface, InterfaceStatus::ipv6)
    }
}
