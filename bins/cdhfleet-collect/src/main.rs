use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};

use cdhfleet_collector::{CollectorConfig, MetricsCollector};
use cdhfleet_logging::LogConfig;
use cdhfleet_machine::{LocalMachine, RemoteMachine};
use cdhfleet_mgmtd::CdhManager;
use cdhfleet_node::{ClusterNode, LivenessPoller, PollerConfig};
use cdhfleet_topology::{Entity, Group};

/// CDH Fleet Metrics Collection Tool
#[derive(Parser, Debug)]
#[command(name = "cdhfleet-collect", version, about)]
struct Args {
    /// Path to the fleet configuration file
    #[arg(short, long, default_value = "fleet.toml")]
    config: String,

    /// Dump the default configuration and exit
    #[arg(long)]
    dump_default_config: bool,

    /// Keep liveness polling running after the collection until Ctrl+C
    #[arg(long)]
    watch: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FleetFile {
    #[serde(default)]
    log: LogConfig,

    #[serde(default)]
    manager: ManagerSection,

    #[serde(default)]
    nodes: Vec<NodeSection>,

    #[serde(default)]
    poller: PollerConfig,

    #[serde(default)]
    collector: CollectorConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct ManagerSection {
    #[serde(default = "default_manager_name")]
    name: String,

    #[serde(default)]
    managed_hosts: Vec<String>,
}

fn default_manager_name() -> String {
    "cloudera-manager".into()
}

impl Default for ManagerSection {
    fn default() -> Self {
        Self {
            name: default_manager_name(),
            managed_hosts: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeSection {
    name: String,
    hostname: String,

    #[serde(default)]
    private_hostname: String,

    /// Resolve the node's "remote" paths under this local directory.
    machine_root: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.dump_default_config {
        println!("{}", toml::to_string_pretty(&FleetFile::default())?);
        return Ok(());
    }

    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading {}", args.config))?;
    let fleet: FleetFile =
        toml::from_str(&raw).with_context(|| format!("parsing {}", args.config))?;

    let _log_guard = cdhfleet_logging::init_logging(&fleet.log);
    tracing::info!(
        config = %args.config,
        nodes = fleet.nodes.len(),
        "starting fleet collection"
    );

    let manager = CdhManager::new(fleet.manager.name.clone());
    manager.set_managed_hosts(fleet.manager.managed_hosts.clone());

    let root = Group::new("fleet");
    let mut nodes = Vec::new();
    for section in &fleet.nodes {
        let machine: Arc<dyn RemoteMachine> = match &section.machine_root {
            Some(dir) => Arc::new(LocalMachine::rooted(section.hostname.clone(), dir)),
            None => Arc::new(LocalMachine::new(section.hostname.clone())),
        };
        let node = ClusterNode::new(
            section.name.clone(),
            section.hostname.clone(),
            section.private_hostname.clone(),
            machine,
            Some(manager.clone()),
        );
        root.add_child(node.clone());
        nodes.push(node);
    }

    // Prime identities so the first run names its directories from fresh
    // resolutions, then keep them fresh in the background.
    for node in &nodes {
        node.refresh_identity();
    }
    let mut poller = LivenessPoller::new(fleet.poller.clone());
    for node in &nodes {
        poller.watch(node.clone());
    }

    let collector = MetricsCollector::new(fleet.collector.clone());
    let root: Arc<dyn Entity> = root;
    let report = collector.collect_fleet(&root).await?;

    let report_path = report.archive_path.join("report.json");
    std::fs::write(&report_path, serde_json::to_string_pretty(&report)?)
        .with_context(|| format!("writing {}", report_path.display()))?;

    tracing::info!(
        archive = %report.archive_path.display(),
        nodes = report.node_count(),
        fetched = report.total_fetched(),
        failed = report.total_failed(),
        "collection complete"
    );
    println!("{}", report.archive_path.display());

    if args.watch {
        tracing::info!("watching fleet liveness — press Ctrl+C to stop");
        tokio::signal::ctrl_c().await?;
    }
    poller.shutdown().await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_file_defaults() {
        let fleet: FleetFile = toml::from_str("").unwrap();
        assert_eq!(fleet.manager.name, "cloudera-manager");
        assert!(fleet.nodes.is_empty());
        assert_eq!(fleet.poller.period_secs, 30);
    }

    #[test]
    fn test_fleet_file_parses_nodes() {
        let fleet: FleetFile = toml::from_str(
            r#"
            [manager]
            managed_hosts = ["ip-10-1-1-1.ec2.internal"]

            [[nodes]]
            name = "n1"
            hostname = "ip-10-1-1-1-public"
            private_hostname = "ip-10-1-1-1"
            machine_root = "/srv/fake-nodes/n1"

            [collector]
            base_dir = "/tmp/archive"
            "#,
        )
        .unwrap();

        assert_eq!(fleet.manager.managed_hosts.len(), 1);
        assert_eq!(fleet.nodes.len(), 1);
        assert_eq!(fleet.nodes[0].private_hostname, "ip-10-1-1-1");
        assert_eq!(
            fleet.nodes[0].machine_root,
            Some(PathBuf::from("/srv/fake-nodes/n1"))
        );
        assert_eq!(fleet.collector.base_dir, PathBuf::from("/tmp/archive"));
    }

    #[test]
    fn test_default_config_dump_roundtrips() {
        let dumped = toml::to_string_pretty(&FleetFile::default()).unwrap();
        let parsed: FleetFile = toml::from_str(&dumped).unwrap();
        assert_eq!(parsed.manager.name, "cloudera-manager");
    }
}
