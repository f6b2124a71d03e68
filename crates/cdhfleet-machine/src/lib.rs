//! Boundary with provisioned machines.
//!
//! Everything the node-management core needs from a machine is behind
//! [`RemoteMachine`]: copy a remote file to local disk and execute a remote
//! command. Provisioning itself ([`Provisioner`]) happens once per node at
//! creation time and is driven from outside the core.

pub mod error;
pub mod local;
pub mod provision;

use std::path::Path;

use async_trait::async_trait;

pub use error::{MachineError, MachineResult};
pub use local::LocalMachine;
pub use provision::{MachineSpec, Provisioner, REQUIRED_OPEN_PORTS};

/// Options for a single remote-to-local file copy.
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Number of transfer attempts before giving up.
    pub attempts: u32,

    /// Per-copy deadline. `None` leaves the transport's own limits in place.
    pub timeout: Option<std::time::Duration>,
}

impl CopyOptions {
    /// One attempt, no explicit deadline. The policy used for best-effort
    /// diagnostics fetches.
    pub fn single_attempt() -> Self {
        Self {
            attempts: 1,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self::single_attempt()
    }
}

/// A machine the fleet can copy files from and run commands on.
#[async_trait]
pub trait RemoteMachine: Send + Sync {
    /// Address or label identifying the machine, for logs.
    fn address(&self) -> &str;

    /// Copy `remote_path` on the machine to `local_path` on this host.
    async fn copy_from(
        &self,
        remote_path: &Path,
        local_path: &Path,
        opts: &CopyOptions,
    ) -> MachineResult<()>;

    /// Run a command on the machine, returning its exit code.
    async fn execute(&self, command: &str) -> MachineResult<i32>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_options_default_is_single_attempt() {
        let opts = CopyOptions::default();
        assert_eq!(opts.attempts, 1);
        assert!(opts.timeout.is_none());
    }

    #[test]
    fn test_copy_options_with_timeout() {
        let opts = CopyOptions::single_attempt().with_timeout(std::time::Duration::from_secs(5));
        assert_eq!(opts.timeout, Some(std::time::Duration::from_secs(5)));
    }
}
