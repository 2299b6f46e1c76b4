//! CLI command implementations.

pub mod apply;
pub mod install;
pub mod show;
pub mod uninstall;

use crate::cmd_abstraction::RealCommandExecutor;
use crate::network::UbusNetwork;
use crate::service::InitScripts;
use crate::uci::UciCli;

/// Production backends talking to the router's tools.
pub(crate) struct SystemBackends {
    pub store: UciCli<RealCommandExecutor>,
    pub network: UbusNetwork<RealCommandExecutor>,
    pub services: InitScripts<RealCommandExecutor>,
}

impl SystemBackends {
    pub fn new() -> Self {
        Self {
            store: UciCli::new(RealCommandExecutor::new()),
            network: UbusNetwork::new(RealCommandExecutor::new()),
            services: InitScripts::new(RealCommandExecutor::new()),
        }
    }

    pub fn as_backends(&self) -> crate::hook::Backends<'_> {
        crate::hook::Backends {
            store: &self.store,
            network: &self.network,
            services: &self.services,
        }
    }
}
