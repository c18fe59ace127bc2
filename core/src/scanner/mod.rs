//! Platform-specific discovery of listening sockets and owning processes.
//!
//! A probe yields two raw facts: which local ports are bound and by which
//! pid, and which pid maps to which command line. Discovery is best-effort
//! telemetry; a failed enumeration produces an empty snapshot and a failed
//! per-pid lookup degrades that one record, never the whole scan.

#[cfg(unix)]
mod unix;

#[cfg(windows)]
mod windows;

mod utils;

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::path::PathBuf;

use tokio::task::JoinSet;
use tracing::warn;

use crate::error::Result;
use crate::models::{FriendlyRules, Protocol};
use crate::snapshot::{normalize, Snapshot};

#[cfg(unix)]
type PlatformProbe = unix::UnixProbe;

#[cfg(windows)]
type PlatformProbe = windows::WindowsProbe;

/// One observed socket-to-process binding from OS-level enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub pid: u32,
    pub port: u16,
    pub protocol: Protocol,
    /// Bound local address, or "*" for a wildcard bind.
    pub address: String,
    /// Process name when the enumeration tool reports one (lsof does,
    /// netstat does not).
    pub process_name: Option<String>,
}

/// Best-effort per-process metadata from the secondary lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessDetail {
    pub process_name: Option<String>,
    pub command: Option<String>,
    pub working_path: Option<PathBuf>,
}

/// Trait for platform-specific discovery implementations.
pub trait Probe: Send + Sync {
    /// Enumerate bound/listening sockets and their owning pids.
    fn discover_bindings(&self) -> impl Future<Output = Result<Vec<Binding>>> + Send;

    /// Resolve command line and related metadata for one pid.
    ///
    /// Lookup failures are absorbed into an empty detail; the process may
    /// have exited between enumeration and this call.
    fn discover_detail(pid: u32) -> impl Future<Output = ProcessDetail> + Send + 'static;
}

/// The main port scanner that uses a platform-specific probe, selected once
/// at construction.
pub struct PortScanner {
    inner: PlatformProbe,
}

impl PortScanner {
    /// Create a new port scanner for the current platform.
    pub fn new() -> Self {
        Self {
            inner: PlatformProbe::new(),
        }
    }

    /// Produce one normalized snapshot of the current inventory.
    ///
    /// A failed enumeration yields an empty snapshot rather than an error;
    /// discovery is not a critical path.
    pub async fn snapshot(&self, rules: &FriendlyRules) -> Snapshot {
        let bindings = match self.inner.discover_bindings().await {
            Ok(bindings) => bindings,
            Err(e) => {
                warn!(error = %e, "port enumeration failed");
                Vec::new()
            }
        };

        let details = Self::resolve_details(&bindings).await;
        normalize(bindings, details, rules)
    }

    /// Resolve per-pid detail concurrently.
    ///
    /// Each lookup costs one process spawn; issuing them on a `JoinSet`
    /// bounds the dominant latency of a scan. No ordering is guaranteed
    /// across lookups.
    async fn resolve_details(bindings: &[Binding]) -> HashMap<u32, ProcessDetail> {
        let pids: HashSet<u32> = bindings.iter().map(|b| b.pid).collect();

        let mut lookups = JoinSet::new();
        for pid in pids {
            lookups.spawn(async move { (pid, PlatformProbe::discover_detail(pid).await) });
        }

        let mut details = HashMap::new();
        while let Some(joined) = lookups.join_next().await {
            if let Ok((pid, detail)) = joined {
                details.insert(pid, detail);
            }
        }
        details
    }
}

impl Default for PortScanner {
    fn default() -> Self {
        Self::new()
    }
}
