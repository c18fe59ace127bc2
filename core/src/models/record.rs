//! Process record data structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Transport protocol of a bound socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Udp => write!(f, "UDP"),
        }
    }
}

/// Operational state of a record, recomputed on every scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PortStatus {
    /// Process is listening and nothing unusual was detected.
    #[default]
    Active,
    /// The process's originating directory no longer exists on disk.
    Zombie,
    /// Another process in the same snapshot is bound to the same port.
    Conflict,
}

impl std::fmt::Display for PortStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortStatus::Active => write!(f, "active"),
            PortStatus::Zombie => write!(f, "zombie"),
            PortStatus::Conflict => write!(f, "conflict"),
        }
    }
}

/// One observed (pid, port) pairing with its process metadata.
///
/// Records are rebuilt from scratch on every scan; the pid is not guaranteed
/// stable across snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRecord {
    /// Process ID of the owning process.
    pub pid: u32,

    /// The bound port number (e.g., 3000, 8080).
    pub port: u16,

    /// Transport protocol of the binding.
    pub protocol: Protocol,

    /// Local address the port is bound to (e.g., "*", "127.0.0.1", "[::1]").
    pub address: String,

    /// Raw executable/image name as reported by the OS.
    pub process_name: String,

    /// Human label substituted when the command line matches a known
    /// development-tool signature. Purely cosmetic; never used for
    /// classification.
    pub friendly_name: String,

    /// Best-effort full command line; equals `process_name` when the
    /// secondary lookup failed.
    pub command: String,

    /// Filesystem path associated with the process, when one could be
    /// derived from the command line or executable path.
    pub working_path: Option<PathBuf>,

    /// Computed operational state.
    pub status: PortStatus,
}

impl ProcessRecord {
    /// Create a record in the active state.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pid: u32,
        port: u16,
        protocol: Protocol,
        address: impl Into<String>,
        process_name: impl Into<String>,
        friendly_name: impl Into<String>,
        command: impl Into<String>,
        working_path: Option<PathBuf>,
    ) -> Self {
        Self {
            pid,
            port,
            protocol,
            address: address.into(),
            process_name: process_name.into(),
            friendly_name: friendly_name.into(),
            command: command.into(),
            working_path,
            status: PortStatus::Active,
        }
    }
}

impl std::fmt::Display for ProcessRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{} (PID: {}, Process: {})",
            self.address, self.port, self.pid, self.process_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(port: u16, pid: u32) -> ProcessRecord {
        ProcessRecord::new(
            pid,
            port,
            Protocol::Tcp,
            "127.0.0.1",
            "node",
            "node",
            "node server.js",
            None,
        )
    }

    #[test]
    fn test_new_record_is_active() {
        let r = record(3000, 1234);
        assert_eq!(r.status, PortStatus::Active);
        assert_eq!(r.port, 3000);
        assert_eq!(r.pid, 1234);
    }

    #[test]
    fn test_display() {
        let r = record(3000, 1234);
        assert_eq!(r.to_string(), "127.0.0.1:3000 (PID: 1234, Process: node)");
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PortStatus::Conflict).unwrap(),
            "\"conflict\""
        );
        assert_eq!(
            serde_json::to_string(&Protocol::Udp).unwrap(),
            "\"UDP\""
        );
    }
}
