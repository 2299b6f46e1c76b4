//! Firewall zone lookup.

use tracing::debug;

use crate::error::ListenError;
use crate::uci::{indexed_option, ConfigStore, UciLookup};

const SECTION_TYPE: &str = "zone";

/// A firewall zone found by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneMatch {
    /// Index of the anonymous `zone` section.
    pub index: usize,
    /// Logical interfaces covered by the zone, in configuration order.
    pub networks: Vec<String>,
}

/// Find the first zone in `package` whose `name` equals `zone_name`.
///
/// The scan is bounded by the number of zone sections in the store and
/// stops early at the first index whose name cannot be found. Transient
/// store failures are returned as errors.
pub fn find_zone<S: ConfigStore + ?Sized>(
    store: &S,
    package: &str,
    zone_name: &str,
) -> Result<Option<usize>, ListenError> {
    let count = store.section_count(package, SECTION_TYPE)?;
    debug!("{} has {} zone sections", package, count);

    for index in 0..count {
        match store.get(&indexed_option(package, SECTION_TYPE, index, "name"))? {
            UciLookup::Found(name) if name == zone_name => return Ok(Some(index)),
            UciLookup::Found(_) => continue,
            UciLookup::NotFound => {
                debug!("Zone index {} not found, stopping scan", index);
                break;
            }
        }
    }

    Ok(None)
}

/// Logical interfaces listed in the `network` option of zone `index`.
pub fn zone_networks<S: ConfigStore + ?Sized>(
    store: &S,
    package: &str,
    index: usize,
) -> Result<Vec<String>, ListenError> {
    let networks = store
        .get(&indexed_option(package, SECTION_TYPE, index, "network"))?
        .found()
        .map(|value| value.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    Ok(networks)
}

/// Resolve a zone by name together with its interfaces.
pub fn resolve<S: ConfigStore + ?Sized>(
    store: &S,
    package: &str,
    zone_name: &str,
) -> Result<Option<ZoneMatch>, ListenError> {
    let Some(index) = find_zone(store, package, zone_name)? else {
        return Ok(None);
    };
    let networks = zone_networks(store, package, index)?;
    Ok(Some(ZoneMatch { index, networks }))
}
