//! UCI configuration store access.
//!
//! [`ConfigStore`] is the seam between the reconciliation logic and the
//! router's persistent configuration. [`UciCli`] implements it on top of the
//! `uci` command line tool.

use tracing::debug;

use crate::cmd_abstraction::{args_to_strings, CommandExecutor, CommandOutput};
use crate::error::ListenError;

const UCI_PATH: &str = "/sbin/uci";

/// Message `uci` prints when a package, section or option does not exist.
const ENTRY_NOT_FOUND: &str = "Entry not found";

/// Result of reading a single UCI value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciLookup {
    /// The entry exists. List options are returned space-joined.
    Found(String),
    /// The entry does not exist (out-of-range index, missing option).
    NotFound,
}

impl UciLookup {
    pub fn found(self) -> Option<String> {
        match self {
            UciLookup::Found(v) => Some(v),
            UciLookup::NotFound => None,
        }
    }
}

/// Read/write access to a UCI-style configuration store.
///
/// Paths use UCI's extended syntax, e.g. `firewall.@zone[0].name` or
/// `uhttpd.main.listen_http`. Mutations are staged until [`commit`] is
/// called for the package.
///
/// [`commit`]: ConfigStore::commit
pub trait ConfigStore: Send + Sync {
    /// Read one option or section type.
    ///
    /// Absence is `Ok(UciLookup::NotFound)`; any other failure is an error.
    fn get(&self, path: &str) -> Result<UciLookup, ListenError>;

    /// Number of sections of `section_type` in `package`.
    fn section_count(&self, package: &str, section_type: &str) -> Result<usize, ListenError>;

    /// Delete an option. Deleting an absent option succeeds.
    fn delete(&self, path: &str) -> Result<(), ListenError>;

    /// Append `value` to a list option.
    fn add_list(&self, path: &str, value: &str) -> Result<(), ListenError>;

    /// Set an option to `value`.
    fn set(&self, path: &str, value: &str) -> Result<(), ListenError>;

    /// Persist all staged changes of `package`.
    fn commit(&self, package: &str) -> Result<(), ListenError>;

    /// Drop all staged changes of `package`.
    fn revert(&self, package: &str) -> Result<(), ListenError>;
}

/// Path of an option inside the `index`-th anonymous section of a type.
pub fn indexed_option(package: &str, section_type: &str, index: usize, option: &str) -> String {
    format!("{}.@{}[{}].{}", package, section_type, index, option)
}

/// Path of an option inside a named section.
pub fn named_option(package: &str, section: &str, option: &str) -> String {
    format!("{}.{}.{}", package, section, option)
}

/// Count `pkg.section=type` lines in `uci show` output.
///
/// Option lines (`pkg.section.option=value`) have a second dot in the key
/// and are skipped.
pub fn count_sections(show_output: &str, package: &str, section_type: &str) -> usize {
    let prefix = format!("{}.", package);
    show_output
        .lines()
        .filter_map(|line| line.split_once('='))
        .filter(|(key, value)| {
            key.strip_prefix(&prefix)
                .is_some_and(|section| !section.is_empty() && !section.contains('.'))
                && value.trim() == section_type
        })
        .count()
}

/// [`ConfigStore`] backed by the `uci` binary.
pub struct UciCli<E: CommandExecutor> {
    executor: E,
}

impl<E: CommandExecutor> UciCli<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    fn run(&self, args: &[&str], path: &str) -> Result<CommandOutput, ListenError> {
        debug!("{} {}", UCI_PATH, args.join(" "));
        self.executor
            .execute(UCI_PATH, &args_to_strings(args))
            .map_err(|e| ListenError::Uci {
                path: path.to_string(),
                reason: e.to_string(),
            })
    }

    fn run_mutation(&self, args: &[&str], path: &str) -> Result<(), ListenError> {
        let output = self.run(args, path)?;
        if output.success {
            Ok(())
        } else {
            Err(ListenError::Uci {
                path: path.to_string(),
                reason: output.failure_reason(),
            })
        }
    }
}

fn is_not_found(output: &CommandOutput) -> bool {
    !output.success && output.stderr.contains(ENTRY_NOT_FOUND)
}

impl<E: CommandExecutor> ConfigStore for UciCli<E> {
    fn get(&self, path: &str) -> Result<UciLookup, ListenError> {
        let output = self.run(&["get", path], path)?;
        if output.success {
            Ok(UciLookup::Found(output.stdout_trimmed().to_string()))
        } else if is_not_found(&output) {
            Ok(UciLookup::NotFound)
        } else {
            Err(ListenError::Uci {
                path: path.to_string(),
                reason: output.failure_reason(),
            })
        }
    }

    fn section_count(&self, package: &str, section_type: &str) -> Result<usize, ListenError> {
        let output = self.run(&["show", package], package)?;
        if output.success {
            Ok(count_sections(&output.stdout, package, section_type))
        } else if is_not_found(&output) {
            Ok(0)
        } else {
            Err(ListenError::Uci {
                path: package.to_string(),
                reason: output.failure_reason(),
            })
        }
    }

    fn delete(&self, path: &str) -> Result<(), ListenError> {
        let output = self.run(&["delete", path], path)?;
        if output.success || is_not_found(&output) {
            Ok(())
        } else {
            Err(ListenError::Uci {
                path: path.to_string(),
                reason: output.failure_reason(),
            })
        }
    }

    fn add_list(&self, path: &str, value: &str) -> Result<(), ListenError> {
        let assignment = format!("{}={}", path, value);
        self.run_mutation(&["add_list", &assignment], path)
    }

    fn set(&self, path: &str, value: &str) -> Result<(), ListenError> {
        let assignment = format!("{}={}", path, value);
        self.run_mutation(&["set", &assignment], path)
    }

    fn commit(&self, package: &str) -> Result<(), ListenError> {
        let output = self
            .executor
            .execute(UCI_PATH, &args_to_strings(&["commit", package]))
            .map_err(|e| ListenError::Commit {
                package: package.to_string(),
                reason: e.to_string(),
            })?;
        if output.success {
            Ok(())
        } else {
            Err(ListenError::Commit {
                package: package.to_string(),
                reason: output.failure_reason(),
            })
        }
    }

    fn revert(&self, package: &str) -> Result<(), ListenError> {
        self.run_mutation(&["revert", package], package)
    }
}

#[cfg(test)]
pub mod mock {
    //! In-memory store used by pipeline tests.

    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Staged and committed values keyed by full UCI path.
    #[derive(Default)]
    pub struct MemoryStore {
        pub staged: Mutex<BTreeMap<String, Vec<String>>>,
        pub committed: Mutex<BTreeMap<String, Vec<String>>>,
        pub sections: Mutex<BTreeMap<(String, String), usize>>,
        /// Every mutating call in order, e.g. `add_list uhttpd.main.listen_http=1.2.3.4:80`.
        pub ops: Mutex<Vec<String>>,
        pub fail_commit: bool,
        /// Mutations whose recorded op starts with this prefix fail,
        /// e.g. `add_list uhttpd.main.listen_https`.
        pub fail_on: Option<String>,
        /// Paths whose `get` returns a transient error.
        pub broken_paths: Vec<String>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Append a firewall zone with `name` and `network`.
        pub fn with_zone(self, name: Option<&str>, network: Option<&str>) -> Self {
            {
                let mut sections = self.sections.lock().unwrap();
                let count = sections
                    .entry(("firewall".to_string(), "zone".to_string()))
                    .or_insert(0);
                let index = *count;
                *count += 1;

                let mut staged = self.staged.lock().unwrap();
                if let Some(name) = name {
                    staged.insert(
                        indexed_option("firewall", "zone", index, "name"),
                        vec![name.to_string()],
                    );
                }
                if let Some(network) = network {
                    staged.insert(
                        indexed_option("firewall", "zone", index, "network"),
                        network.split_whitespace().map(str::to_string).collect(),
                    );
                }
            }
            self
        }

        pub fn failing_commit(mut self) -> Self {
            self.fail_commit = true;
            self
        }

        pub fn failing_on(mut self, op_prefix: &str) -> Self {
            self.fail_on = Some(op_prefix.to_string());
            self
        }

        pub fn staged_list(&self, path: &str) -> Vec<String> {
            self.staged
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .unwrap_or_default()
        }

        pub fn committed_list(&self, path: &str) -> Vec<String> {
            self.committed
                .lock()
                .unwrap()
                .get(path)
                .cloned()
                .unwrap_or_default()
        }

        pub fn ops(&self) -> Vec<String> {
            self.ops.lock().unwrap().clone()
        }

        /// Record `op`, failing it if it matches `fail_on`.
        fn record(&self, op: String, path: &str) -> Result<(), ListenError> {
            let fail = self
                .fail_on
                .as_deref()
                .is_some_and(|prefix| op.starts_with(prefix));
            self.ops.lock().unwrap().push(op);
            if fail {
                return Err(ListenError::Uci {
                    path: path.to_string(),
                    reason: "out of memory".to_string(),
                });
            }
            Ok(())
        }
    }

    impl ConfigStore for MemoryStore {
        fn get(&self, path: &str) -> Result<UciLookup, ListenError> {
            if self.broken_paths.iter().any(|p| p == path) {
                return Err(ListenError::Uci {
                    path: path.to_string(),
                    reason: "I/O error".to_string(),
                });
            }
            Ok(match self.staged.lock().unwrap().get(path) {
                Some(values) => UciLookup::Found(values.join(" ")),
                None => UciLookup::NotFound,
            })
        }

        fn section_count(&self, package: &str, section_type: &str) -> Result<usize, ListenError> {
            let key = (package.to_string(), section_type.to_string());
            Ok(self.sections.lock().unwrap().get(&key).copied().unwrap_or(0))
        }

        fn delete(&self, path: &str) -> Result<(), ListenError> {
            self.record(format!("delete {}", path), path)?;
            self.staged.lock().unwrap().remove(path);
            Ok(())
        }

        fn add_list(&self, path: &str, value: &str) -> Result<(), ListenError> {
            self.record(format!("add_list {}={}", path, value), path)?;
            self.staged
                .lock()
                .unwrap()
                .entry(path.to_string())
                .or_default()
                .push(value.to_string());
            Ok(())
        }

        fn set(&self, path: &str, value: &str) -> Result<(), ListenError> {
            self.record(format!("set {}={}", path, value), path)?;
            self.staged
                .lock()
                .unwrap()
                .insert(path.to_string(), vec![value.to_string()]);
            Ok(())
        }

        fn commit(&self, package: &str) -> Result<(), ListenError> {
            self.record(format!("commit {}", package), package)?;
            if self.fail_commit {
                return Err(ListenError::Commit {
                    package: package.to_string(),
                    reason: "read-only file system".to_string(),
                });
            }
            let prefix = format!("{}.", package);
            let staged = self.staged.lock().unwrap();
            let mut committed = self.committed.lock().unwrap();
            committed.retain(|k, _| !k.starts_with(&prefix));
            for (k, v) in staged.iter().filter(|(k, _)| k.starts_with(&prefix)) {
                committed.insert(k.clone(), v.clone());
            }
            Ok(())
        }

        fn revert(&self, package: &str) -> Result<(), ListenError> {
            self.record(format!("revert {}", package), package)?;
            let prefix = format!("{}.", package);
            let committed = self.committed.lock().unwrap();
            let mut staged = self.staged.lock().unwrap();
            staged.retain(|k, _| !k.starts_with(&prefix));
            for (k, v) in committed.iter().filter(|(k, _)| k.starts_with(&prefix)) {
                staged.insert(k.clone(), v.clone());
            }
            Ok(())
        }
    }
}
