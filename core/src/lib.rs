//! Portscope Core Library
//!
//! Cross-platform port-to-process inventory engine. Provides functionality
//! to:
//! - Discover listening sockets and their owning processes
//! - Normalize heterogeneous OS tool output into uniform records
//! - Classify records as active, zombie, or port-conflicted
//! - Terminate processes and prune build-cache directories
//!
//! # Architecture
//! - `scanner`: platform probes (discovery), selected once per platform
//! - `snapshot`: record normalization and the snapshot container
//! - `classify`: conflict and zombie annotation passes
//! - `killer` / `cache`: destructive actions
//! - `engine`: facade exposing the request modes collaborators consume
//!
//! # Platform Support
//! - POSIX (macOS, Linux): uses `lsof` and `ps`
//! - Windows: uses `netstat`, `tasklist`, and `wmic`

pub mod cache;
pub mod classify;
pub mod engine;
pub mod error;
pub mod killer;
pub mod models;
pub mod scanner;
pub mod snapshot;

// Re-export commonly used types
pub use cache::CacheCleaner;
pub use engine::PortScopeEngine;
pub use error::{Error, Result};
pub use killer::ProcessKiller;
pub use models::{FriendlyRule, FriendlyRules, PortStatus, ProcessRecord, Protocol};
pub use scanner::{Binding, PortScanner, Probe, ProcessDetail};
pub use snapshot::Snapshot;
