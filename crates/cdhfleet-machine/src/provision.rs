//! Provisioning surface.
//!
//! A node is provisioned exactly once, before it joins the composition
//! tree; the core never re-provisions. [`MachineSpec`] captures the
//! template the external orchestrator fills in.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MachineResult;
use crate::RemoteMachine;

/// Ports that must be reachable on every cluster node: ssh, ZooKeeper, the
/// manager console and agent channel, and the HDFS/MapReduce/HBase web and
/// data ports.
pub const REQUIRED_OPEN_PORTS: [u16; 13] = [
    22, 2181, 7180, 7182, 8088, 8888, 50030, 50060, 50070, 50090, 60010, 60020, 60030,
];

/// Template for provisioning one cluster machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineSpec {
    #[serde(default = "default_os_family")]
    pub os_family: String,

    /// Version match expression understood by the provisioning backend.
    #[serde(default = "default_os_version")]
    pub os_version_matches: String,

    #[serde(default = "default_min_ram_mb")]
    pub min_ram_mb: u32,

    #[serde(default = "default_true")]
    pub os_64bit: bool,

    #[serde(default = "default_security_groups")]
    pub security_groups: Vec<String>,

    #[serde(default = "default_open_ports")]
    pub open_ports: Vec<u16>,
}

fn default_os_family() -> String {
    "ubuntu".into()
}

fn default_os_version() -> String {
    "12.04".into()
}

fn default_min_ram_mb() -> u32 {
    2560
}

fn default_true() -> bool {
    true
}

fn default_security_groups() -> Vec<String> {
    vec!["universal".into()]
}

fn default_open_ports() -> Vec<u16> {
    REQUIRED_OPEN_PORTS.to_vec()
}

impl Default for MachineSpec {
    fn default() -> Self {
        Self {
            os_family: default_os_family(),
            os_version_matches: default_os_version(),
            min_ram_mb: default_min_ram_mb(),
            os_64bit: default_true(),
            security_groups: default_security_groups(),
            open_ports: default_open_ports(),
        }
    }
}

/// Backend that can turn a [`MachineSpec`] into a live machine.
#[async_trait]
pub trait Provisioner: Send + Sync {
    async fn provision(&self, spec: &MachineSpec) -> MachineResult<Arc<dyn RemoteMachine>>;
}
