//! Forceful process termination via the platform-native mechanism.

use tracing::{debug, warn};

/// Sends unconditional termination requests.
///
/// Termination is not transactional with respect to any earlier scan: the
/// process may have exited or been replaced since the snapshot was taken.
/// A `false` result means nothing changed; callers re-scan to confirm.
pub struct ProcessKiller;

impl ProcessKiller {
    pub fn new() -> Self {
        Self
    }

    /// Send SIGKILL to one process. Returns `false` on any failure
    /// (process already gone, permission denied, invalid pid).
    #[cfg(unix)]
    pub async fn kill(&self, pid: u32) -> bool {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;

        // pid 0 would signal the caller's whole process group
        if pid == 0 {
            return false;
        }
        let Ok(raw) = i32::try_from(pid) else {
            return false;
        };

        match kill(Pid::from_raw(raw), Signal::SIGKILL) {
            Ok(()) => {
                debug!(pid, "SIGKILL sent");
                true
            }
            Err(errno) => {
                warn!(pid, error = %errno, "kill failed");
                false
            }
        }
    }

    /// Forcefully terminate one process via `taskkill /F /PID`. Returns
    /// `false` on any failure.
    #[cfg(windows)]
    pub async fn kill(&self, pid: u32) -> bool {
        use tokio::process::Command;

        if pid == 0 {
            return false;
        }

        match Command::new("taskkill")
            .args(["/F", "/PID", &pid.to_string()])
            .output()
            .await
        {
            Ok(output) if output.status.success() => {
                debug!(pid, "taskkill succeeded");
                true
            }
            Ok(output) => {
                warn!(pid, code = ?output.status.code(), "taskkill failed");
                false
            }
            Err(e) => {
                warn!(pid, error = %e, "failed to spawn taskkill");
                false
            }
        }
    }
}

impl Default for ProcessKiller {
    fn default() -> Self {
        Self::new()
    }
}
