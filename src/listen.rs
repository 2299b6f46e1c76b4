//! Listen address planning and reconciliation for the web daemon.
//!
//! The reconciler always replaces the daemon's `listen_http` and
//! `listen_https` lists as a whole, so repeated runs with the same input
//! converge on the same configuration.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

use crate::collector::CollectedAddresses;
use crate::config::DaemonConfig;
use crate::error::ListenError;
use crate::service::ServiceManager;
use crate::uci::{named_option, ConfigStore};

/// Tracing target for the per-address log lines.
pub const LOG_TARGET: &str = "uhttpd_listen";

pub const LISTEN_HTTP: &str = "listen_http";
pub const LISTEN_HTTPS: &str = "listen_https";
pub const REDIRECT_HTTPS: &str = "redirect_https";

/// First group `fcXX:` or `fdXX:`, i.e. fc00::/7 written out in full.
static ULA_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[fF][cCdD][0-9a-fA-F]{2}:").expect("ULA prefix pattern is valid")
});

/// Whether an IPv6 literal is eligible as a listen address.
///
/// This is a lexical match on the first group, not a CIDR test: link-local
/// `fe80::` and global addresses are rejected.
pub fn is_ula_candidate(address: &str) -> bool {
    ULA_PREFIX.is_match(address)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
}

/// One address the daemon should bind to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenAddress {
    pub address: String,
    pub family: Family,
}

impl ListenAddress {
    /// `host:port`, with IPv6 hosts in brackets.
    pub fn authority(&self, port: u16) -> String {
        match self.family {
            Family::V4 => format!("{}:{}", self.address, port),
            Family::V6 => format!("[{}]:{}", self.address, port),
        }
    }
}

/// The complete listen configuration derived from collected addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenPlan {
    /// Accepted addresses: all IPv4 first, then filtered IPv6, input order.
    pub addresses: Vec<ListenAddress>,
    /// IPv6 addresses rejected by the ULA filter.
    pub skipped_ipv6: Vec<String>,
    pub http_port: u16,
    pub https_port: u16,
}

impl ListenPlan {
    pub fn build(collected: &CollectedAddresses, http_port: u16, https_port: u16) -> Self {
        let mut addresses: Vec<ListenAddress> = collected
            .ipv4
            .iter()
            .map(|a| ListenAddress {
                address: a.clone(),
                family: Family::V4,
            })
            .collect();

        let mut skipped_ipv6 = Vec::new();
        for addr in &collected.ipv6 {
            if is_ula_candidate(addr) {
                addresses.push(ListenAddress {
                    address: addr.clone(),
                    family: Family::V6,
                });
            } else {
                debug!("Skipping IPv6 address {} (not ULA)", addr);
                skipped_ipv6.push(addr.clone());
            }
        }

        Self {
            addresses,
            skipped_ipv6,
            http_port,
            https_port,
        }
    }

    pub fn http(&self) -> Vec<String> {
        self.addresses.iter().map(|a| a.authority(self.http_port)).collect()
    }

    pub fn https(&self) -> Vec<String> {
        self.addresses.iter().map(|a| a.authority(self.https_port)).collect()
    }
}

/// Write `plan` into the daemon's configuration, commit it, then restart
/// and enable the daemon.
///
/// Nothing after a failed step runs; in particular the daemon is never
/// restarted unless the commit succeeded. If staging or the commit fails,
/// the package's pending changes are reverted before the error is returned.
pub fn reconcile<S, M>(
    store: &S,
    services: &M,
    daemon: &DaemonConfig,
    plan: &ListenPlan,
) -> Result<(), ListenError>
where
    S: ConfigStore + ?Sized,
    M: ServiceManager + ?Sized,
{
    if let Err(e) = stage_and_commit(store, daemon, plan) {
        if let Err(revert_err) = store.revert(&daemon.package) {
            warn!(
                "Failed to revert pending {} changes: {}",
                daemon.package, revert_err
            );
        }
        return Err(e);
    }

    services.restart(&daemon.service)?;
    services.enable(&daemon.service)?;

    Ok(())
}

fn stage_and_commit<S>(
    store: &S,
    daemon: &DaemonConfig,
    plan: &ListenPlan,
) -> Result<(), ListenError>
where
    S: ConfigStore + ?Sized,
{
    let http_path = named_option(&daemon.package, &daemon.section, LISTEN_HTTP);
    let https_path = named_option(&daemon.package, &daemon.section, LISTEN_HTTPS);

    store.delete(&http_path)?;
    store.delete(&https_path)?;

    for addr in &plan.addresses {
        match addr.family {
            Family::V4 => info!(
                target: LOG_TARGET,
                "Adding IPv4 address {} to {} listen list", addr.address, daemon.service
            ),
            Family::V6 => info!(
                target: LOG_TARGET,
                "Adding link local/ULA IPv6 address {} to {} listen list",
                addr.address,
                daemon.service
            ),
        }
        store.add_list(&http_path, &addr.authority(plan.http_port))?;
        store.add_list(&https_path, &addr.authority(plan.https_port))?;
    }

    store.set(
        &named_option(&daemon.package, &daemon.section, REDIRECT_HTTPS),
        "1",
    )?;

    store.commit(&daemon.package)
}
