//! Snapshot construction: merging raw bindings with per-process detail.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{FriendlyRules, PortStatus, ProcessRecord};
use crate::scanner::{Binding, ProcessDetail};

/// An immutable collection of normalized records from one scan instant.
///
/// A snapshot owns its records exclusively and is rebuilt from scratch on
/// every request; no identity is tracked across snapshots and no long-lived
/// resources are held. Classification annotates records in place before the
/// snapshot is handed out for read-only consumption.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Snapshot {
    records: Vec<ProcessRecord>,
}

impl Snapshot {
    /// Build a snapshot directly from records, e.g. in tests.
    pub fn from_records(records: Vec<ProcessRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ProcessRecord] {
        &self.records
    }

    /// Mutable access for the classification passes.
    pub(crate) fn records_mut(&mut self) -> &mut [ProcessRecord] {
        &mut self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcessRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ProcessRecord> {
        self.records
    }
}

/// Merge each binding with its pid's detail into one record.
///
/// The process name prefers what the enumeration tool reported, then the
/// detail lookup, then "Unknown"; the command falls back to the process
/// name when the lookup failed. All records start out active. Records are
/// sorted by port for stable presentation.
pub fn normalize(
    bindings: Vec<Binding>,
    details: HashMap<u32, ProcessDetail>,
    rules: &FriendlyRules,
) -> Snapshot {
    let mut records: Vec<ProcessRecord> = bindings
        .into_iter()
        .map(|binding| {
            let detail = details.get(&binding.pid).cloned().unwrap_or_default();

            let process_name = binding
                .process_name
                .or(detail.process_name)
                .unwrap_or_else(|| "Unknown".to_string());

            let command = detail
                .command
                .unwrap_or_else(|| process_name.clone());

            let friendly_name = rules.resolve(&process_name, &command);

            ProcessRecord {
                pid: binding.pid,
                port: binding.port,
                protocol: binding.protocol,
                address: binding.address,
                process_name,
                friendly_name,
                command,
                working_path: detail.working_path,
                status: PortStatus::Active,
            }
        })
        .collect();

    records.sort_by_key(|r| r.port);
    Snapshot { records }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Protocol;
    use std::path::Path;

    fn binding(pid: u32, port: u16, name: Option<&str>) -> Binding {
        Binding {
            pid,
            port,
            protocol: Protocol::Tcp,
            address: "127.0.0.1".to_string(),
            process_name: name.map(String::from),
        }
    }

    #[test]
    fn test_normalize_merges_detail() {
        let bindings = vec![binding(100, 3000, Some("node"))];
        let mut details = HashMap::new();
        details.insert(
            100,
            ProcessDetail {
                process_name: None,
                command: Some("next dev --port 3000".to_string()),
                working_path: Some("/home/dev/app/node".into()),
            },
        );

        let snapshot = normalize(bindings, details, &FriendlyRules::builtin());
        assert_eq!(snapshot.len(), 1);

        let record = &snapshot.records()[0];
        assert_eq!(record.process_name, "node");
        assert_eq!(record.command, "next dev --port 3000");
        assert_eq!(record.friendly_name, "\u{26a1} Next.js Dev");
        assert_eq!(
            record.working_path.as_deref(),
            Some(Path::new("/home/dev/app/node"))
        );
        assert_eq!(record.status, PortStatus::Active);
    }

    #[test]
    fn test_missing_detail_falls_back_to_name() {
        let bindings = vec![binding(100, 3000, Some("node"))];

        let snapshot = normalize(bindings, HashMap::new(), &FriendlyRules::builtin());
        let record = &snapshot.records()[0];
        assert_eq!(record.command, "node");
        assert_eq!(record.friendly_name, "node");
        assert!(record.working_path.is_none());
    }

    #[test]
    fn test_nameless_binding_uses_detail_then_unknown() {
        let bindings = vec![binding(100, 3000, None), binding(200, 4000, None)];
        let mut details = HashMap::new();
        details.insert(
            100,
            ProcessDetail {
                process_name: Some("app.exe".to_string()),
                command: Some("app.exe --serve".to_string()),
                working_path: None,
            },
        );

        let snapshot = normalize(bindings, details, &FriendlyRules::builtin());
        assert_eq!(snapshot.records()[0].process_name, "app.exe");
        assert_eq!(snapshot.records()[1].process_name, "Unknown");
        assert_eq!(snapshot.records()[1].command, "Unknown");
    }

    #[test]
    fn test_records_sorted_by_port() {
        let bindings = vec![
            binding(1, 8080, Some("b")),
            binding(2, 80, Some("a")),
            binding(3, 3000, Some("c")),
        ];

        let snapshot = normalize(bindings, HashMap::new(), &FriendlyRules::builtin());
        let ports: Vec<u16> = snapshot.iter().map(|r| r.port).collect();
        assert_eq!(ports, vec![80, 3000, 8080]);
    }
}
