//! Persistent memory of confirmed source-to-target mappings.
//!
//! The memory is the only engine state that outlives a run. Entries are
//! keyed by canonical source token so a mapping learned on one form applies
//! to any form spelling the field the same way. Lifecycle: load (or create
//! empty) at startup, read/confirm during resolution, flush at shutdown.
//!
//! # Storage Format
//!
//! A pretty-printed JSON array of entries:
//! `[{"token": ..., "target_field": ..., "confirmations": ..., "last_confirmed": ...}]`

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One learned mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    /// Canonical source token.
    pub token: String,
    /// Target field the token was confirmed against.
    pub target_field: String,
    /// How many times this mapping has been confirmed.
    pub confirmations: u64,
    /// When it was last confirmed.
    pub last_confirmed: DateTime<Utc>,
}

/// Result of a confirmation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// First confirmation for this token.
    Learned,
    /// Token was already mapped to the same target; counter incremented.
    Reinforced { confirmations: u64 },
    /// Token is already mapped to a different target. The stored mapping is
    /// untouched; the caller must resolve the conflict explicitly.
    Conflict { existing: String },
}

/// Cross-run store of confirmed mappings.
///
/// Confirmations are serialized through an exclusive lock so parallel export
/// jobs cannot race the counter or slip a conflicting mapping in. Lookups
/// take the same lock briefly to clone the entry out.
#[derive(Debug, Default)]
pub struct MappingMemory {
    entries: Mutex<BTreeMap<String, MemoryEntry>>,
}

impl MappingMemory {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from disk.
    ///
    /// A missing file is an empty store; any other failure is an error so
    /// the caller can decide whether to degrade.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read mapping memory from {}", path.display()))?;
        let entries: Vec<MemoryEntry> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse mapping memory from {}", path.display()))?;
        let map = entries
            .into_iter()
            .map(|entry| (entry.token.clone(), entry))
            .collect();
        Ok(Self {
            entries: Mutex::new(map),
        })
    }

    /// Load a store, degrading to an empty one with a warning when the file
    /// is unreadable. Resolution then proceeds memory-less rather than
    /// failing the run.
    pub fn load_or_degraded(path: &Path) -> Self {
        match Self::load(path) {
            Ok(memory) => memory,
            Err(error) => {
                warn!(
                    path = %path.display(),
                    %error,
                    "mapping memory unreadable, continuing without learned mappings"
                );
                Self::new()
            }
        }
    }

    /// Write the store to disk.
    pub fn flush(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create memory directory: {}", parent.display())
            })?;
        }
        let entries = self.entries_snapshot();
        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize mapping memory")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write mapping memory to {}", path.display()))?;
        Ok(())
    }

    /// Target field previously confirmed for a canonical token, if any.
    pub fn lookup(&self, token: &str) -> Option<String> {
        self.lock()
            .get(token)
            .map(|entry| entry.target_field.clone())
    }

    /// Full entry for a canonical token, if any.
    pub fn entry(&self, token: &str) -> Option<MemoryEntry> {
        self.lock().get(token).cloned()
    }

    /// Confirm a token-to-target mapping.
    ///
    /// A conflicting confirmation never overwrites the stored target; it is
    /// surfaced as [`ConfirmOutcome::Conflict`] for the caller to resolve.
    pub fn confirm(&self, token: &str, target_field: &str) -> ConfirmOutcome {
        let mut entries = self.lock();
        match entries.get_mut(token) {
            Some(entry) if entry.target_field == target_field => {
                entry.confirmations += 1;
                entry.last_confirmed = Utc::now();
                ConfirmOutcome::Reinforced {
                    confirmations: entry.confirmations,
                }
            }
            Some(entry) => ConfirmOutcome::Conflict {
                existing: entry.target_field.clone(),
            },
            None => {
                entries.insert(
                    token.to_string(),
                    MemoryEntry {
                        token: token.to_string(),
                        target_field: target_field.to_string(),
                        confirmations: 1,
                        last_confirmed: Utc::now(),
                    },
                );
                ConfirmOutcome::Learned
            }
        }
    }

    /// Replace a conflicting mapping after explicit caller resolution.
    pub fn overwrite(&self, token: &str, target_field: &str) {
        self.lock().insert(
            token.to_string(),
            MemoryEntry {
                token: token.to_string(),
                target_field: target_field.to_string(),
                confirmations: 1,
                last_confirmed: Utc::now(),
            },
        );
    }

    /// Snapshot of all entries, ordered by token.
    pub fn entries_snapshot(&self) -> Vec<MemoryEntry> {
        self.lock().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, MemoryEntry>> {
        // A poisoned lock means a panic mid-update; the map itself is still
        // structurally sound, so recover the guard.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
