//! Workspace manifest sniffing for the `start` command.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// The subset of package.json the start command cares about.
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    scripts: HashMap<String, String>,
}

/// Package manager detected from lock files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
}

impl PackageManager {
    /// Detect the package manager from the workspace's lock files,
    /// defaulting to npm.
    pub fn detect(root: &Path) -> Self {
        if root.join("pnpm-lock.yaml").exists() {
            PackageManager::Pnpm
        } else if root.join("yarn.lock").exists() {
            PackageManager::Yarn
        } else {
            PackageManager::Npm
        }
    }

    pub fn command(self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
        }
    }
}

/// Pick the runnable script from package.json: `dev` when present, else
/// `start`. Missing manifest or script is a precondition failure reported
/// before any work happens.
pub fn runnable_script(root: &Path) -> Result<String> {
    let manifest_path = root.join("package.json");
    if !manifest_path.exists() {
        bail!("no package.json found in {}", root.display());
    }

    let raw = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    let manifest: Manifest =
        serde_json::from_str(&raw).with_context(|| format!("invalid {}", manifest_path.display()))?;

    for name in ["dev", "start"] {
        if manifest.scripts.contains_key(name) {
            return Ok(name.to_string());
        }
    }
    bail!("no \"dev\" or \"start\" script in package.json");
}
