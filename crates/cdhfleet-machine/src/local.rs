//! A [`RemoteMachine`] backed by the local filesystem.
//!
//! "Remote" paths are resolved under an optional root directory, which lets
//! tests and single-host demos stand in for a fleet without any transport.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{MachineError, MachineResult};
use crate::{CopyOptions, RemoteMachine};

pub struct LocalMachine {
    address: String,
    root: Option<PathBuf>,
}

impl LocalMachine {
    /// A machine whose "remote" paths are plain local paths.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            root: None,
        }
    }

    /// A machine whose "remote" paths are resolved under `root`, so
    /// `/tmp/x.out` reads `<root>/tmp/x.out`.
    pub fn rooted(address: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            address: address.into(),
            root: Some(root.into()),
        }
    }

    fn resolve(&self, remote_path: &Path) -> PathBuf {
        match &self.root {
            Some(root) => {
                let rel = remote_path.strip_prefix("/").unwrap_or(remote_path);
                root.join(rel)
            }
            None => remote_path.to_path_buf(),
        }
    }
}

#[async_trait]
impl RemoteMachine for LocalMachine {
    fn address(&self) -> &str {
        &self.address
    }

    async fn copy_from(
        &self,
        remote_path: &Path,
        local_path: &Path,
        opts: &CopyOptions,
    ) -> MachineResult<()> {
        let source = self.resolve(remote_path);
        let mut last_err = None;
        for attempt in 1..=opts.attempts.max(1) {
            match tokio::fs::copy(&source, local_path).await {
                Ok(bytes) => {
                    debug!(
                        machine = %self.address,
                        source = %source.display(),
                        dest = %local_path.display(),
                        bytes,
                        "copied file"
                    );
                    return Ok(());
                }
                Err(e) => {
                    debug!(
                        machine = %self.address,
                        source = %source.display(),
                        attempt,
                        error = %e,
                        "copy attempt failed"
                    );
                    last_err = Some(match e.kind() {
                        ErrorKind::NotFound => MachineError::NotFound(remote_path.to_path_buf()),
                        ErrorKind::PermissionDenied => {
                            MachineError::PermissionDenied(remote_path.to_path_buf())
                        }
                        _ => MachineError::Io(e),
                    });
                }
            }
        }
        Err(last_err.expect("at least one attempt"))
    }

    async fn execute(&self, command: &str) -> MachineResult<i32> {
        let output = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(command)
            .output()
            .await
            .map_err(|e| MachineError::Exec {
                command: command.to_string(),
                message: e.to_string(),
            })?;
        Ok(output.status.code().unwrap_or(-1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_root(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cdhfleet-test-local-machine-{}", tag));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_copy_from_rooted() {
        let root = temp_root("rooted");
        std::fs::create_dir_all(root.join("tmp")).unwrap();
        std::fs::write(root.join("tmp/datanode-metrics.out"), b"m1\n").unwrap();

        let machine = LocalMachine::rooted("node-1", &root);
        let dest = root.join("fetched.out");
        machine
            .copy_from(
                Path::new("/tmp/datanode-metrics.out"),
                &dest,
                &CopyOptions::single_attempt(),
            )
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "m1\n");
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_copy_from_missing_file() {
        let root = temp_root("missing");
        let machine = LocalMachine::rooted("node-1", &root);
        let dest = root.join("fetched.out");

        let err = machine
            .copy_from(
                Path::new("/tmp/namenode-metrics.out"),
                &dest,
                &CopyOptions::single_attempt(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, MachineError::NotFound(_)));
        assert!(!dest.exists());
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_execute_exit_code() {
        let machine = LocalMachine::new("localhost");
        assert_eq!(machine.execute("true").await.unwrap(), 0);
        assert_ne!(machine.execute("false").await.unwrap(), 0);
    }
}
