// Copyright 2026 Bastion Systems. All rights reserved.
// Bastion Mesh Defense Simulator - Event Log Sink

use std::collections::VecDeque;

use crate::types::{LogEntry, LogOrigin, Severity};

/// Most recent entries retained; the oldest are dropped first.
pub const LOG_CAPACITY: usize = 50;

/// Append-only structured log with a fixed retention window. The external
/// log panel renders this verbatim; the core never reads it back for
/// decisions.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    next_id: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(
        &mut self,
        timestamp_ms: f64,
        origin: LogOrigin,
        severity: Severity,
        message: impl Into<String>,
    ) {
        self.entries.push_back(LogEntry {
            id: self.next_id,
            timestamp_ms,
            origin,
            severity,
            message: message.into(),
        });
        self.next_id += 1;
        while self.entries.len() > LOG_CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Retained window, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total entries ever appended, including dropped ones.
    pub fn appended_total(&self) -> u64 {
        self.next_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(log: &mut EventLog, n: usize) {
        for i in 0..n {
            log.append(i as f64, LogOrigin::System, Severity::Info, format!("entry {}", i));
        }
    }

    #[test]
    fn test_retention_caps_at_50_oldest_first() {
        let mut log = EventLog::new();
        fill(&mut log, 80);
        assert_eq!(log.len(), LOG_CAPACITY);
        let entries = log.to_vec();
        assert_eq!(entries.first().unwrap().message, "entry 30");
        assert_eq!(entries.last().unwrap().message, "entry 79");
        assert_eq!(log.appended_total(), 80);
    }

    #[test]
    fn test_ids_monotone_across_eviction() {
        let mut log = EventLog::new();
        fill(&mut log, 60);
        let ids: Vec<u64> = log.entries().map(|e| e.id).collect();
        for pair in ids.windows(2) {
            assert_eq!(pair[1], pair[0] + 1);
        }
        assert_eq!(*ids.first().unwrap(), 10);
    }

    #[test]
    fn test_entry_serde_shape() {
        let mut log = EventLog::new();
        log.append(1250.0, LogOrigin::AttackSim, Severity::Error, "Injecting MITM attack traffic");
        let json = serde_json::to_string(&log.to_vec()[0]).unwrap();
        assert!(json.contains("\"ATTACK_SIM\""));
        assert!(json.contains("\"error\""));
    }
}
