//! Transition history tracking.
//!
//! The machine appends a record for every fully successful operation while
//! its lock is held, so the history is an exact serial log of committed
//! state changes (self-transitions included, with `from == to`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single executed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the transition that ran.
    pub transition: String,
    /// Name of the state the machine left.
    pub from: String,
    /// Name of the state the machine arrived at.
    pub to: String,
    /// When the operation completed.
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of the transitions a machine has executed.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MachineHistory {
    records: Vec<TransitionRecord>,
}

impl MachineHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, record: TransitionRecord) {
        self.records.push(record);
    }

    /// All records in execution order.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// The path of state names traversed: the first record's origin, then
    /// each record's destination. Empty when nothing has run yet.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.first() {
            path.push(first.from.as_str());
        }
        for record in &self.records {
            path.push(record.to.as_str());
        }
        path
    }

    /// Elapsed time between the first and last record, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => last
                .timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok(),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
