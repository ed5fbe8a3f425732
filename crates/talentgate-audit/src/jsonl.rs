//! File-backed implementation of `AuditSink`.
//!
//! `JsonlLedger` writes one JSON object per line to an append-only file, so
//! every line is independently parseable even if the process dies mid-run.
//! An in-memory mirror serves queries without touching the disk. `replay()`
//! rebuilds the entry sequence from a file written by a previous run.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use talentgate_contracts::audit::{AuditEntry, AuditFilter};
use talentgate_contracts::error::{PipelineError, PipelineResult};
use talentgate_core::sink::AuditSink;

struct JsonlState {
    writer: BufWriter<File>,
    mirror: Vec<AuditEntry>,
}

/// An append-only NDJSON audit ledger.
pub struct JsonlLedger {
    path: PathBuf,
    state: Mutex<JsonlState>,
}

impl JsonlLedger {
    /// Open (or create) the ledger file at `path` for appending.
    ///
    /// Parent directories are created as needed. An existing file is kept
    /// and appended to; its prior entries are not loaded into the mirror —
    /// use `replay()` to read them back.
    pub fn open(path: impl Into<PathBuf>) -> PipelineResult<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| PipelineError::AuditWriteFailed {
                    reason: format!("cannot create ledger directory {}: {e}", parent.display()),
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| PipelineError::AuditWriteFailed {
                reason: format!("cannot open ledger file {}: {e}", path.display()),
            })?;

        info!(path = %path.display(), "jsonl ledger opened");

        Ok(Self {
            path,
            state: Mutex::new(JsonlState {
                writer: BufWriter::new(file),
                mirror: Vec::new(),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rebuild the entry sequence from a ledger file.
    ///
    /// Blank lines are skipped; a malformed line is an error, since a
    /// compliance record with unreadable rows cannot be trusted.
    pub fn replay(path: impl AsRef<Path>) -> PipelineResult<Vec<AuditEntry>> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| PipelineError::AuditWriteFailed {
            reason: format!("cannot read ledger file {}: {e}", path.display()),
        })?;

        let mut entries = Vec::new();
        for (lineno, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry: AuditEntry =
                serde_json::from_str(line).map_err(|e| PipelineError::AuditWriteFailed {
                    reason: format!("malformed ledger line {}: {e}", lineno + 1),
                })?;
            entries.push(entry);
        }

        debug!(path = %path.display(), count = entries.len(), "ledger replayed");
        Ok(entries)
    }
}

impl AuditSink for JsonlLedger {
    fn append(&self, entry: AuditEntry) -> PipelineResult<()> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| PipelineError::AuditWriteFailed {
                reason: format!("ledger lock poisoned: {e}"),
            })?;

        let line = serde_json::to_string(&entry).map_err(|e| PipelineError::AuditWriteFailed {
            reason: format!("entry not serializable: {e}"),
        })?;

        writeln!(state.writer, "{line}").map_err(|e| PipelineError::AuditWriteFailed {
            reason: format!("write to {} failed: {e}", self.path.display()),
        })?;
        // Flush per entry so a crash loses at most the entry being written.
        state.writer.flush().map_err(|e| PipelineError::AuditWriteFailed {
            reason: format!("flush of {} failed: {e}", self.path.display()),
        })?;

        state.mirror.push(entry);
        Ok(())
    }

    fn entries(&self, filter: &AuditFilter) -> Vec<AuditEntry> {
        match self.state.lock() {
            Ok(state) => state
                .mirror
                .iter()
                .filter(|e| filter.matches(e))
                .cloned()
                .collect(),
            Err(_) => vec![],
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
