//! Service lifecycle through procd init scripts.

use tracing::info;

use crate::cmd_abstraction::{args_to_strings, CommandExecutor};
use crate::error::ListenError;

const INIT_DIR: &str = "/etc/init.d";

/// Start/stop control over system services.
pub trait ServiceManager: Send + Sync {
    fn restart(&self, service: &str) -> Result<(), ListenError>;
    fn enable(&self, service: &str) -> Result<(), ListenError>;
}

/// [`ServiceManager`] that runs `/etc/init.d/<service> <action>`.
pub struct InitScripts<E: CommandExecutor> {
    executor: E,
    init_dir: String,
}

impl<E: CommandExecutor> InitScripts<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor,
            init_dir: INIT_DIR.to_string(),
        }
    }

    fn script_path(&self, service: &str) -> String {
        format!("{}/{}", self.init_dir.trim_end_matches('/'), service)
    }

    fn run(&self, service: &str, action: &str) -> Result<(), ListenError> {
        let err = |reason: String| ListenError::Service {
            service: service.to_string(),
            action: action.to_string(),
            reason,
        };

        // A service name is a single path component under the init dir
        if service.is_empty() || service.contains('/') || service.starts_with('.') {
            return Err(err("invalid service name".to_string()));
        }

        info!("{} {}", action, service);
        let output = self
            .executor
            .execute(&self.script_path(service), &args_to_strings(&[action]))
            .map_err(|e| err(e.to_string()))?;
        if output.success {
            Ok(())
        } else {
            Err(err(output.failure_reason()))
        }
    }
}

impl<E: CommandExecutor> ServiceManager for InitScripts<E> {
    fn restart(&self, service: &str) -> Result<(), ListenError> {
        self.run(service, "restart")
    }

    fn enable(&self, service: &str) -> Result<(), ListenError> {
        self.run(service, "enable")
    }
}
