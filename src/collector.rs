//! Address collection for the interfaces of a zone.

use tracing::debug;

use crate::network::NetworkStatus;

/// Addresses gathered from a zone's interfaces, in interface order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedAddresses {
    pub ipv4: Vec<String>,
    pub ipv6: Vec<String>,
}

impl CollectedAddresses {
    pub fn is_empty(&self) -> bool {
        self.ipv4.is_empty() && self.ipv6.is_empty()
    }
}

/// Query every interface for its IPv4 and IPv6 addresses.
///
/// The network cache is flushed once up front. A failed lookup for one
/// address family of one interface contributes nothing and does not affect
/// the others.
pub fn collect<N, I, S>(network: &N, interfaces: I) -> CollectedAddresses
where
    N: NetworkStatus + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    network.flush_cache();

    let mut collected = CollectedAddresses::default();
    for interface in interfaces {
        let interface = interface.as_ref();

        match network.ipv4_addresses(interface) {
            Ok(addrs) => collected.ipv4.extend(addrs),
            Err(e) => debug!("No IPv4 addresses for {}: {}", interface, e),
        }

        match network.ipv6_addresses(interface) {
            Ok(addrs) => collected.ipv6.extend(addrs),
            Err(e) => debug!("No IPv6 addresses for {}: {}", interface, e),
        }
    }

    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::mock::StaticNetwork;

    #[test]
    fn test_collect_in_interface_order() {
        let network = StaticNetwork::new()
            .with_ipv4("lan", &["192.168.1.1"])
            .with_ipv6("lan", &["fd00::1"])
            .with_ipv4("iot", &["10.0.0.1", "10.0.1.1"])
            .with_ipv6("iot", &[]);

        let collected = collect(&network, ["lan", "iot"]);
        assert_eq!(collected.ipv4, vec!["192.168.1.1", "10.0.0.1", "10.0.1.1"]);
        assert_eq!(collected.ipv6, vec!["fd00::1"]);
        assert_eq!(network.flush_count(), 1);
    }

    #[test]
    fn test_collect_absorbs_partial_failures() {
        // lan6 has no IPv4 status at all, lan has no IPv6 status
        let network = StaticNetwork::new()
            .with_ipv4("lan", &["192.168.1.1"])
            .with_ipv6("lan6", &["fd00::1"]);

        let collected = collect(&network, ["lan", "lan6", "missing"]);
        assert_eq!(collected.ipv4, vec!["192.168.1.1"]);
        assert_eq!(collected.ipv6, vec!["fd00::1"]);
    }

    #[test]
    fn test_collect_duplicate_interfaces() {
        let network = StaticNetwork::new().with_ipv4("lan", &["192.168.1.1"]);

        let collected = collect(&network, ["lan", "lan"]);
        assert_eq!(collected.ipv4, vec!["192.168.1.1", "192.168.1.1"]);
    }

    #[test]
    fn test_collect_no_interfaces() {
        let network = StaticNetwork::new();

        let collected = collect(&network, Vec::<String>::new());
        assert!(collected.is_empty());
        assert_eq!(network.flush_count(), 1);
    }
}
