//! Windows probe implementation using netstat, tasklist, and wmic.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::OnceLock;

use regex::Regex;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Protocol;

use super::utils::parse_endpoint;
use super::{Binding, Probe, ProcessDetail};

/// Windows probe backed by `netstat` for enumeration, `tasklist` for the
/// display name, and `wmic` for the full command line.
pub struct WindowsProbe;

impl WindowsProbe {
    pub fn new() -> Self {
        Self
    }

    /// Parse one netstat line into a binding.
    ///
    /// Expected netstat -ano output formats:
    /// ```text
    ///   TCP    0.0.0.0:3000     0.0.0.0:0      LISTENING     1234
    ///   UDP    0.0.0.0:5353     *:*                          5678
    /// ```
    /// TCP rows are kept only in the LISTENING state; UDP is connectionless
    /// and has no listening state, so every UDP row is kept.
    fn parse_netstat_line(line: &str) -> Option<Binding> {
        let components: Vec<&str> = line.split_whitespace().collect();

        let protocol = match *components.first()? {
            "TCP" => Protocol::Tcp,
            "UDP" => Protocol::Udp,
            _ => return None,
        };

        let (address, port) = parse_endpoint(components.get(1)?)?;

        let pid: u32 = match protocol {
            Protocol::Tcp => {
                if *components.get(3)? != "LISTENING" {
                    return None;
                }
                components.get(4)?.parse().ok()?
            }
            Protocol::Udp => components.get(3)?.parse().ok()?,
        };

        Some(Binding {
            pid,
            port,
            protocol,
            address,
            process_name: None,
        })
    }

    /// Parse full netstat output, keeping the first observed binding per
    /// pid.
    fn parse_netstat_output(output: &str) -> Vec<Binding> {
        let mut seen_pids: HashSet<u32> = HashSet::new();
        output
            .lines()
            .filter_map(Self::parse_netstat_line)
            .filter(|b| seen_pids.insert(b.pid))
            .collect()
    }

    /// Resolve the display name of a process via tasklist CSV output.
    ///
    /// Executes: `tasklist /FI "PID eq <pid>" /FO CSV /NH`
    async fn display_name(pid: u32) -> Option<String> {
        let output = Command::new("tasklist")
            .args(["/FI", &format!("PID eq {}", pid), "/FO", "CSV", "/NH"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .ok()?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        // First quoted CSV field is the image name
        static FIRST_FIELD: OnceLock<Regex> = OnceLock::new();
        let re = FIRST_FIELD.get_or_init(|| Regex::new(r#""([^"]+)""#).expect("valid regex"));
        re.captures(&stdout).map(|caps| caps[1].to_string())
    }

    /// Best-effort resolution of the full command line and executable path.
    ///
    /// Executes: `wmic process where processid=<pid> get
    /// commandline,executablepath /format:csv`
    ///
    /// This secondary query may legitimately fail (insufficient privilege,
    /// process exited); callers fall back to the display name.
    async fn command_line(pid: u32) -> Option<(String, Option<PathBuf>)> {
        let output = Command::new("wmic")
            .args([
                "process",
                "where",
                &format!("processid={}", pid),
                "get",
                "commandline,executablepath",
                "/format:csv",
            ])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .ok()?;

        if !output.status.success() {
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);

        // CSV rows are Node,CommandLine,ExecutablePath; skip the header
        for line in stdout.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("Node") {
                continue;
            }

            let parts: Vec<&str> = line.split(',').collect();
            if parts.len() < 2 {
                continue;
            }

            let command = parts[1].trim();
            if command.is_empty() {
                continue;
            }

            let path = parts
                .get(2)
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .map(PathBuf::from);

            return Some((command.to_string(), path));
        }

        None
    }
}

impl Default for WindowsProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for WindowsProbe {
    /// Enumerate all TCP/UDP endpoint-to-pid mappings.
    ///
    /// Executes: `netstat -ano`
    async fn discover_bindings(&self) -> Result<Vec<Binding>> {
        let output = Command::new("netstat")
            .args(["-ano"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run netstat: {}", e)))?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in netstat output: {}", e)))?;

        Ok(Self::parse_netstat_output(&stdout))
    }

    /// Resolve display name, then best-effort command line and path.
    ///
    /// The fallback is deliberately opaque: a wmic failure is not
    /// distinguished between permission-denied and process-exited, matching
    /// the behavior consumers already rely on. The failure is logged for
    /// diagnostics.
    async fn discover_detail(pid: u32) -> ProcessDetail {
        let name = Self::display_name(pid).await;

        match Self::command_line(pid).await {
            Some((command, working_path)) => ProcessDetail {
                process_name: name,
                command: Some(command),
                working_path,
            },
            None => {
                debug!(pid, "wmic lookup failed, falling back to display name");
                ProcessDetail {
                    process_name: name.clone(),
                    command: name,
                    working_path: None,
                }
            }
        }
    }
}
