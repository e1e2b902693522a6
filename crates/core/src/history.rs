//! Per-kind tallies of a player's action log.

use std::collections::HashMap;

use txpanel_api::{ActionHistoryEntry, ActionKind};

/// Display severity of a counter badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Neutral,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterBadge {
    pub kind: ActionKind,
    pub count: usize,
    pub label: String,
    pub severity: Severity,
}

/// Counts of history entries by kind. Built fresh from each snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionTally {
    counts: HashMap<ActionKind, usize>,
}

impl ActionTally {
    pub fn from_history(entries: &[ActionHistoryEntry]) -> Self {
        let mut counts = HashMap::new();
        for entry in entries {
            *counts.entry(entry.kind.clone()).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, kind: &ActionKind) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }

    pub fn badge(&self, kind: ActionKind) -> CounterBadge {
        let count = self.count(&kind);
        CounterBadge {
            label: counter_label(kind.label(), count),
            severity: severity(&kind, count),
            kind,
            count,
        }
    }

    /// Ban and warn badges, in that order.
    pub fn log_badges(&self) -> [CounterBadge; 2] {
        [self.badge(ActionKind::Ban), self.badge(ActionKind::Warn)]
    }
}

/// `1 Warn`, otherwise `<n> <Kind>s` (zero included).
pub fn counter_label(kind: &str, count: usize) -> String {
    if count == 1 {
        format!("{count} {kind}")
    } else {
        format!("{count} {kind}s")
    }
}

/// History listing order: newest first, ties kept in log order.
pub fn newest_first(entries: &[ActionHistoryEntry]) -> Vec<&ActionHistoryEntry> {
    let mut rows: Vec<_> = entries.iter().collect();
    rows.sort_by(|a, b| b.ts.cmp(&a.ts));
    rows
}

fn severity(kind: &ActionKind, count: usize) -> Severity {
    match (kind, count) {
        (_, 0) => Severity::Neutral,
        (ActionKind::Ban, _) => Severity::High,
        (ActionKind::Warn, _) => Severity::Medium,
        (ActionKind::Other(_), _) => Severity::Neutral,
    }
}
