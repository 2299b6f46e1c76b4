//! The full run: zone lookup, address collection, reconciliation.

use tracing::{debug, info};

use crate::collector::{collect, CollectedAddresses};
use crate::config::Config;
use crate::error::ListenError;
use crate::listen::{reconcile, ListenPlan};
use crate::network::NetworkStatus;
use crate::service::ServiceManager;
use crate::uci::ConfigStore;
use crate::zone::{resolve, ZoneMatch};

/// How a run ended. Only `Applied` has side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The configured zone does not exist.
    NoZone,
    /// The zone's interfaces have no addresses of either family.
    NoAddresses(ZoneMatch),
    /// The plan was computed but not written.
    DryRun(ZoneMatch, CollectedAddresses, ListenPlan),
    /// The daemon configuration was committed and the daemon restarted.
    Applied(ZoneMatch, CollectedAddresses, ListenPlan),
}

/// External collaborators of a run.
pub struct Backends<'a> {
    pub store: &'a dyn ConfigStore,
    pub network: &'a dyn NetworkStatus,
    pub services: &'a dyn ServiceManager,
}

/// Run the hook once.
///
/// With `dry_run` nothing is written and no service is touched.
pub fn run(
    backends: &Backends<'_>,
    config: &Config,
    dry_run: bool,
) -> Result<ReconcileOutcome, ListenError> {
    let Some(zone) = resolve(backends.store, &config.zone.package, &config.zone.name)? else {
        info!("No '{}' zone in {}, nothing to do", config.zone.name, config.zone.package);
        return Ok(ReconcileOutcome::NoZone);
    };
    debug!(
        "Zone '{}' is section {} with networks {:?}",
        config.zone.name, zone.index, zone.networks
    );

    let collected = collect(backends.network, &zone.networks);
    if collected.is_empty() {
        info!("Zone '{}' has no addresses, nothing to do", config.zone.name);
        return Ok(ReconcileOutcome::NoAddresses(zone));
    }

    let plan = ListenPlan::build(&collected, config.daemon.http_port, config.daemon.https_port);
    if dry_run {
        return Ok(ReconcileOutcome::DryRun(zone, collected, plan));
    }

    reconcile(backends.store, backends.services, &config.daemon, &plan)?;
    Ok(ReconcileOutcome::Applied(zone, collected, plan))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::mock::StaticNetwork;
    use crate::service::mock::RecordingServices;
    use crate::uci::mock::MemoryStore;

    fn lan_network() -> StaticNetwork {
        StaticNetwork::new()
            .with_ipv4("lan", &["192.0.2.1", "192.0.2.2"])
            .with_ipv6("lan", &["fe80::1", "fd00::1", "2001:db8::1", "fc12:3456::9"])
    }

    fn run_with(
        store: &MemoryStore,
        network: &StaticNetwork,
        services: &RecordingServices,
        dry_run: bool,
    ) -> ReconcileOutcome {
        let backends = Backends {
            store,
            network,
            services,
        };
        run(&backends, &Config::default(), dry_run).unwrap()
    }

    #[test]
    fn test_no_lan_zone_has_no_side_effects() {
        let store = MemoryStore::new().with_zone(Some("wan"), Some("wan"));
        let network = lan_network();
        let services = RecordingServices::new();

        let outcome = run_with(&store, &network, &services, false);

        assert_eq!(outcome, ReconcileOutcome::NoZone);
        assert!(store.ops().is_empty());
        assert!(services.calls().is_empty());
        assert_eq!(network.flush_count(), 0);
    }

    #[test]
    fn test_no_addresses_has_no_side_effects() {
        let store = MemoryStore::new().with_zone(Some("lan"), Some("lan lan6"));
        let network = StaticNetwork::new().with_ipv4("lan", &[]);
        let services = RecordingServices::new();

        let outcome = run_with(&store, &network, &services, false);

        assert!(matches!(outcome, ReconcileOutcome::NoAddresses(_)));
        assert!(store.ops().is_empty());
        assert!(services.calls().is_empty());
    }

    #[test]
    fn test_full_run() {
        let store = MemoryStore::new()
            .with_zone(Some("wan"), Some("wan"))
            .with_zone(Some("lan"), Some("lan"));
        let network = lan_network();
        let services = RecordingServices::new();

        let outcome = run_with(&store, &network, &services, false);

        let ReconcileOutcome::Applied(zone, collected, plan) = outcome else {
            panic!("expected Applied, got {:?}", outcome);
        };
        assert_eq!(zone.index, 1);
        assert_eq!(collected.ipv6.len(), 4);
        assert_eq!(plan.skipped_ipv6, vec!["fe80::1", "2001:db8::1"]);
        assert_eq!(
            store.committed_list("uhttpd.main.listen_http"),
            vec![
                "192.0.2.1:80",
                "192.0.2.2:80",
                "[fd00::1]:80",
                "[fc12:3456::9]:80"
            ]
        );
        assert_eq!(store.committed_list("uhttpd.main.redirect_https"), vec!["1"]);
        assert_eq!(services.calls(), vec!["restart uhttpd", "enable uhttpd"]);
        assert_eq!(network.flush_count(), 1);
    }

    #[test]
    fn test_repeated_runs_converge() {
        let store = MemoryStore::new().with_zone(Some("lan"), Some("lan"));
        let network = lan_network();
        let services = RecordingServices::new();

        run_with(&store, &network, &services, false);
        let first = store.committed.lock().unwrap().clone();
        run_with(&store, &network, &services, false);
        let second = store.committed.lock().unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(store.committed_list("uhttpd.main.listen_https").len(), 4);
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let store = MemoryStore::new().with_zone(Some("lan"), Some("lan"));
        let network = lan_network();
        let services = RecordingServices::new();

        let outcome = run_with(&store, &network, &services, true);

        let ReconcileOutcome::DryRun(_, _, plan) = outcome else {
            panic!("expected DryRun, got {:?}", outcome);
        };
        assert_eq!(plan.http().len(), 4);
        assert!(store.ops().is_empty());
        assert!(services.calls().is_empty());
    }

    #[test]
    fn test_commit_failure_is_reported_without_restart() {
        let store = MemoryStore::new()
            .with_zone(Some("lan"), Some("lan"))
            .failing_commit();
        let network = lan_network();
        let services = RecordingServices::new();
        let backends = Backends {
            store: &store,
            network: &network,
            services: &services,
        };

        let result = run(&backends, &Config::default(), false);

        assert!(matches!(result, Err(ListenError::Commit { .. })));
        assert!(services.calls().is_empty());
        assert_eq!(store.ops().last().unwrap(), "revert uhttpd");
    }

    #[test]
    fn test_restart_failure_fails_the_run() {
        let store = MemoryStore::new().with_zone(Some("lan"), Some("lan"));
        let network = lan_network();
        let services = RecordingServices::new().failing_restart();
        let backends = Backends {
            store: &store,
            network: &network,
            services: &services,
        };

        let result = run(&backends, &Config::default(), false);

        assert!(matches!(result, Err(ListenError::Service { .. })));
        assert_eq!(services.calls(), vec!["restart uhttpd"]);
    }
}
