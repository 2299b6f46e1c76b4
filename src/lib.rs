//! # uhttpd-listen - LAN listen addresses for the OpenWrt web interface
//!
//! Keeps uhttpd bound to the router's own addresses in the `lan` firewall
//! zone instead of the wildcard address. Runs as a hotplug hook on every
//! interface event.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      uhttpd-listen                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── Commands: apply (default), show, install, uninstall  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Zone (ConfigStore)                                         │
//! │    └── first firewall zone named "lan" and its networks     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Collector (NetworkStatus)                                  │
//! │    └── IPv4 + IPv6 addresses per network via ubus/netifd    │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Listen (ConfigStore + ServiceManager)                      │
//! │    ├── fc00::/7 filter, host:port / [host]:port entries     │
//! │    └── clear, append, redirect_https, commit, restart       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! A missing zone, or a zone without addresses, ends the run successfully
//! without touching anything. A failed commit never restarts the daemon.
//!
//! ## Example Usage
//!
//! ```no_run
//! use uhttpd_listen::cmd_abstraction::RealCommandExecutor;
//! use uhttpd_listen::config::Config;
//! use uhttpd_listen::hook::{self, Backends};
//! use uhttpd_listen::network::UbusNetwork;
//! use uhttpd_listen::service::InitScripts;
//! use uhttpd_listen::uci::UciCli;
//!
//! fn main() -> anyhow::Result<()> {
//!     let store = UciCli::new(RealCommandExecutor::new());
//!     let network = UbusNetwork::new(RealCommandExecutor::new());
//!     let services = InitScripts::new(RealCommandExecutor::new());
//!     let backends = Backends { store: &store, network: &network, services: &services };
//!
//!     let outcome = hook::run(&backends, &Config::default(), false)?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`cmd_abstraction`] - Mockable command execution
//! - [`collector`] - Address collection per zone network
//! - [`commands`] - CLI command implementations
//! - [`config`] - YAML configuration
//! - [`hook`] - One full run
//! - [`installer`] - Hotplug hook installation
//! - [`listen`] - Listen plan and reconciliation
//! - [`lock`] - Run serialisation
//! - [`network`] - netifd interface status
//! - [`service`] - Init script control
//! - [`uci`] - UCI configuration store
//! - [`zone`] - Firewall zone lookup

pub mod cli;
pub mod cmd_abstraction;
pub mod collector;
pub mod commands;
pub mod config;
pub mod error;
pub mod fs_abstraction;
pub mod hook;
pub mod installer;
pub mod listen;
pub mod lock;
pub mod network;
pub mod service;
pub mod uci;
pub mod utils;
pub mod validation;
pub mod zone;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use error::ListenError;
