//! The optimistic log and the read-side merge.
//!
//! # Invariants
//! - Entries are ordered most-recently-created first.
//! - Every entry carries the [`PendingToken`] of the `create` call that
//!   inserted it; confirmation and rollback address entries by token only, so
//!   two in-flight creates with identical payloads never steal each other's
//!   entry.
//! - A confirmed entry is never removed.

use crate::model::{Record, RecordKey};
use std::collections::{HashSet, VecDeque};
use std::fmt::{self, Display};

/// Correlates an optimistic entry with the `create` call that inserted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingToken(u64);

impl Display for PendingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pending_{}", self.0)
    }
}

/// Whether the server has confirmed an entry yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Pending,
    Confirmed,
}

/// One record created through this resource.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimisticEntry {
    pub token: PendingToken,
    pub state: EntryState,
    pub record: Record,
}

#[derive(Debug, Default)]
pub(crate) struct OptimisticLog {
    entries: VecDeque<OptimisticEntry>,
    next_token: u64,
}

impl OptimisticLog {
    /// Inserts `record` at the front as a pending entry.
    pub(crate) fn begin(&mut self, record: Record) -> PendingToken {
        self.next_token += 1;
        let token = PendingToken(self.next_token);
        self.entries.push_front(OptimisticEntry {
            token,
            state: EntryState::Pending,
            record,
        });
        token
    }

    /// Removes the entry for `token`. Returns false if it was already gone.
    pub(crate) fn rollback(&mut self, token: PendingToken) -> bool {
        match self.position(token) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replaces the entry for `token` in place with the confirmed record, or
    /// inserts it at the front if the entry is gone.
    pub(crate) fn confirm(&mut self, token: PendingToken, record: Record) {
        match self.position(token) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.state = EntryState::Confirmed;
                entry.record = record;
            }
            None => self.entries.push_front(OptimisticEntry {
                token,
                state: EntryState::Confirmed,
                record,
            }),
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<OptimisticEntry> {
        self.entries.iter().cloned().collect()
    }

    pub(crate) fn records(&self) -> Vec<Record> {
        self.entries.iter().map(|entry| entry.record.clone()).collect()
    }

    fn position(&self, token: PendingToken) -> Option<usize> {
        self.entries.iter().position(|entry| entry.token == token)
    }
}

/// Builds the merge set for a read.
///
/// Optimistic records come first, in log order, skipping any whose key the
/// server already returned or an earlier optimistic record already claimed.
/// Records without a key are always kept. Server records follow untouched.
pub(crate) fn merge(optimistic: Vec<Record>, server: Vec<Record>, key_field: &str) -> Vec<Record> {
    let mut seen: HashSet<RecordKey> = server
        .iter()
        .filter_map(|record| RecordKey::of(record, key_field))
        .collect();

    let mut merged: Vec<Record> = optimistic
        .into_iter()
        .filter(|record| match RecordKey::of(record, key_field) {
            Some(key) => seen.insert(key),
            None => true,
        })
        .collect();
    merged.extend(server);
    merged
}
