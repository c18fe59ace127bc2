//! POSIX probe implementation using lsof and ps.

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

/// POSIX probe backed by `lsof` for enumeration and `ps` for per-pid
/// command lines.
pub struct UnixProbe;

impl UnixProbe {
    pub fn new() -> Self {
        Self
    }

    /// Parse one lsof line into a binding. Malformed lines yield `None` and
    /// are skipped by the caller.
    ///
    /// Expected lsof output format:
    /// ```text
    /// COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
    /// node     34805  code   19u  IPv6 0x3d8015e195af1f3f      0t0  TCP [::1]:3000 (LISTEN)
    /// ```
    fn parse_lsof_line(line: &str) -> Option<Binding> {
        let components: Vec<&str> = line.split_whitespace().collect();
        if components.len() < 9 {
            return None;
        }

        // lsof escapes spaces and slashes in command names
        let process_name = components[0].replace("\\x20", " ").replace("\\x2f", "/");

        let pid: u32 = components[1].parse().ok()?;

        // The NAME column holds address:port. Search backwards for a
        // component with ":" that isn't a device or offset field.
        let endpoint = components[8..]
            .iter()
            .rev()
            .find(|c| c.contains(':') && !c.starts_with("0x") && !c.starts_with("0t"))?;

        let (address, port) = parse_endpoint(endpoint)?;

        Some(Binding {
            pid,
            port,
            protocol: Protocol::Tcp,
            address,
            process_name: Some(process_name),
        })
    }

    /// Parse full lsof output, skipping the header and deduplicating by
    /// (port, pid).
    fn parse_lsof_output(output: &str) -> Vec<Binding> {
        let mut seen: HashSet<(u16, u32)> = HashSet::new();
        output
            .lines()
            .skip(1)
            .filter_map(Self::parse_lsof_line)
            .filter(|b| seen.insert((b.port, b.pid)))
            .collect()
    }

    /// Extract the first absolute-path token from a command line. This is
    /// typically the executable path and anchors zombie detection.
    fn extract_working_path(command: &str) -> Option<PathBuf> {
        static ABS_PATH: OnceLock<Regex> = OnceLock::new();
        let re = ABS_PATH.get_or_init(|| Regex::new(r"(?:^|\s)(/\S+)").expect("valid regex"));
        re.captures(command).map(|caps| PathBuf::from(&caps[1]))
    }
}

impl Default for UnixProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Probe for UnixProbe {
    /// Enumerate listening TCP sockets.
    ///
    /// Executes: `lsof -iTCP -sTCP:LISTEN -P -n +c 0`
    ///
    /// Flags explained:
    /// - -iTCP: Show only TCP connections
    /// - -sTCP:LISTEN: Show only listening sockets
    /// - -P: Show port numbers (don't resolve to service names)
    /// - -n: Show IP addresses (don't resolve to hostnames)
    /// - +c 0: Show full command name (unlimited length)
    async fn discover_bindings(&self) -> Result<Vec<Binding>> {
        let output = Command::new("lsof")
            .args(["-iTCP", "-sTCP:LISTEN", "-P", "-n", "+c", "0"])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::CommandFailed(format!("Failed to run lsof: {}", e)))?;

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| Error::ParseError(format!("Invalid UTF-8 in lsof output: {}", e)))?;

        Ok(Self::parse_lsof_output(&stdout))
    }

    /// Resolve the full command line for one pid.
    ///
    /// Executes: `ps -p <pid> -o command=`
    async fn discover_detail(pid: u32) -> ProcessDetail {
        let output = match Command::new("ps")
            .args(["-p", &pid.to_string(), "-o", "command="])
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                debug!(pid, error = %e, "ps lookup failed");
                return ProcessDetail::default();
            }
        };

        let command = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if command.is_empty() {
            // Process exited between enumeration and this lookup
            debug!(pid, "ps returned no command line");
            return ProcessDetail::default();
        }

        let working_path = Self::extract_working_path(&command);

        ProcessDetail {
            process_name: None,
            command: Some(command),
            working_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lsof_output() {
        let output = r#"COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
node     34805  code   19u  IPv6 0x3d8015e195af1f3f      0t0  TCP [::1]:3000 (LISTEN)
nginx        1  root    6u  IPv4 0x1234567890abcdef      0t0  TCP *:80 (LISTEN)
"#;

        let bindings = UnixProbe::parse_lsof_output(output);
        assert_eq!(bindings.len(), 2);

        assert_eq!(bindings[0].pid, 34805);
        assert_eq!(bindings[0].port, 3000);
        assert_eq!(bindings[0].address, "[::1]");
        assert_eq!(bindings[0].protocol, Protocol::Tcp);
        assert_eq!(bindings[0].process_name.as_deref(), Some("node"));

        assert_eq!(bindings[1].port, 80);
        assert_eq!(bindings[1].address, "*");
    }

    #[test]
    fn test_unescape_process_name() {
        let output = r#"COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
Code\x20Helper  1234  user   10u  IPv4 0x1234567890abcdef      0t0  TCP *:3000 (LISTEN)
"#;

        let bindings = UnixProbe::parse_lsof_output(output);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].process_name.as_deref(), Some("Code Helper"));
    }

    #[test]
    fn test_deduplication() {
        // Same port and PID over IPv4 and IPv6 collapses to one binding
        let output = r#"COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
node     1234  code   19u  IPv4 0x1234567890abcdef      0t0  TCP 127.0.0.1:3000 (LISTEN)
node     1234  code   20u  IPv6 0xfedcba0987654321      0t0  TCP [::1]:3000 (LISTEN)
"#;

        let bindings = UnixProbe::parse_lsof_output(output);
        assert_eq!(bindings.len(), 1);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let output = r#"COMMAND    PID  USER   FD   TYPE             DEVICE SIZE/OFF NODE NAME
too few fields
node  notapid  code   19u  IPv4 0x1 0t0  TCP 127.0.0.1:3000 (LISTEN)
node     1234  code   19u  IPv4 0x1234567890abcdef      0t0  TCP 127.0.0.1:5173 (LISTEN)
"#;

        let bindings = UnixProbe::parse_lsof_output(output);
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].port, 5173);
    }

    #[test]
    fn test_extract_working_path() {
        assert_eq!(
            UnixProbe::extract_working_path("/usr/local/bin/node server.js"),
            Some(PathBuf::from("/usr/local/bin/node"))
        );
        assert_eq!(
            UnixProbe::extract_working_path("node /home/dev/app/server.js"),
            Some(PathBuf::from("/home/dev/app/server.js"))
        );
        assert_eq!(UnixProbe::extract_working_path("node server.js"), None);
    }

    #[tokio::test]
    async fn test_detail_for_missing_pid_is_empty() {
        // High pid that should not exist; ps exits non-zero with no output
        let detail = UnixProbe::discover_detail(999_999_999).await;
        assert_eq!(detail, ProcessDetail::default());
    }
}
