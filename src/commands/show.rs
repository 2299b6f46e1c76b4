//! Show command implementation.

use anyhow::Result;
use std::path::Path;

use super::SystemBackends;
use crate::config::Config;
use crate::hook::{self, ReconcileOutcome};
use crate::utils::format_list;

/// Run the show command
pub async fn run(config_path: &Path) -> Result<()> {
    let config = Config::load_or_default(config_path)?;
    let backends = SystemBackends::new();

    let outcome = hook::run(&backends.as_backends(), &config, true)?;
    println!("{}", format_report(&config, &outcome));
    Ok(())
}

/// Human-readable summary of a run.
pub fn format_report(config: &Config, outcome: &ReconcileOutcome) -> String {
    let mut output = String::new();

    let (zone, collected, plan, applied) = match outcome {
        ReconcileOutcome::NoZone => {
            output.push_str(&format!(
                "Zone '{}' not found in {}: nothing to do.\n",
                config.zone.name, config.zone.package
            ));
            return output;
        }
        ReconcileOutcome::NoAddresses(zone) => {
            output.push_str(&format!(
                "Zone '{}' (networks: {}) has no addresses: nothing to do.\n",
                config.zone.name,
                format_list(&zone.networks)
            ));
            return output;
        }
        ReconcileOutcome::DryRun(zone, collected, plan) => (zone, collected, plan, false),
        ReconcileOutcome::Applied(zone, collected, plan) => (zone, collected, plan, true),
    };

    output.push_str(&format!(
        "Zone:          {} (section {})\n",
        config.zone.name, zone.index
    ));
    output.push_str(&format!("Networks:      {}\n", format_list(&zone.networks)));
    output.push_str(&format!("IPv4:          {}\n", format_list(&collected.ipv4)));
    output.push_str(&format!("IPv6:          {}\n", format_list(&collected.ipv6)));
    if !plan.skipped_ipv6.is_empty() {
        output.push_str(&format!("Skipped IPv6:  {}\n", format_list(&plan.skipped_ipv6)));
    }
    output.push('\n');
    output.push_str(&format!("listen_http:   {}\n", format_list(&plan.http())));
    output.push_str(&format!("listen_https:  {}\n", format_list(&plan.https())));
    output.push_str("redirect_https: 1\n");
    output.push('\n');

    if applied {
        output.push_str(&format!(
            "[OK] {} committed, {} restarted\n",
            config.daemon.package, config.daemon.service
        ));
    } else {
        output.push_str("(dry run, nothing changed)\n");
    }

    output
}
