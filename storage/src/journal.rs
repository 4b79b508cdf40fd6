//! Transfer Journal
//!
//! Append-only record of operations the engine committed. Entries are never
//! rewritten or removed; a failed call is simply not journaled.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use levy_core::Address;
use levy_token::TransferReceipt;

use crate::{write_replacing, Result, StorageError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub sequence: u64,
    /// Wall-clock time the entry was written
    pub recorded_at: DateTime<Utc>,
    /// Timestamp the call executed at
    pub timestamp: u64,
    pub caller: Address,
    pub operation: String,
    /// Present when the operation was a token transfer
    pub receipt: Option<TransferReceipt>,
}

impl JournalEntry {
    /// Whether `account` called the operation or sent/received in it
    pub fn involves(&self, account: &Address) -> bool {
        if self.caller == *account {
            return true;
        }
        self.receipt
            .as_ref()
            .is_some_and(|r| r.from == *account || r.to == *account)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferJournal {
    entries: Vec<JournalEntry>,
}

impl TransferJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its sequence number
    pub fn record(
        &mut self,
        caller: Address,
        timestamp: u64,
        operation: impl Into<String>,
        receipt: Option<TransferReceipt>,
    ) -> u64 {
        let sequence = self.entries.len() as u64;
        self.entries.push(JournalEntry {
            sequence,
            recorded_at: Utc::now(),
            timestamp,
            caller,
            operation: operation.into(),
            receipt,
        });
        sequence
    }

    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn for_account<'a>(&'a self, account: &'a Address) -> impl Iterator<Item = &'a JournalEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.involves(account))
    }

    /// The `limit` most recent entries, oldest first
    pub fn recent(&self, limit: usize) -> &[JournalEntry] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;
        write_replacing(path.as_ref(), json.as_bytes())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| StorageError::SerializationError(e.to_string()))
    }

    /// Load from disk, or start empty if no journal exists yet
    pub fn load_or_new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            log::info!("📂 No existing journal, starting fresh");
            return Ok(Self::new());
        }
        let journal = Self::load(path)?;
        log::debug!("📂 Loaded {} journal entries", journal.len());
        Ok(journal)
    }
}
