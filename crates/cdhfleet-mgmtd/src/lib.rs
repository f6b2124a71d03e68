//! Manager-side view of the fleet.
//!
//! The manager is the authority on which hosts are currently registered
//! with the cluster. Nodes resolve their own identity against the manager's
//! roster; everything else about the manager's internal state machine lives
//! outside this workspace and reaches us only through roster updates.

pub mod manager;

use cdhfleet_types::Result;

/// Read access to the manager's roster of registered host identifiers.
///
/// The roster is an ordered sequence; order is significant for prefix-based
/// identity resolution. Implementations backed by a remote manager may fail
/// the read; callers treat a failed read as an empty roster for that
/// observation.
pub trait ManagedHostRoster: Send + Sync {
    fn managed_hosts(&self) -> Result<Vec<String>>;
}

pub use manager::CdhManager;
