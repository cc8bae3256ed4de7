//! What one invocation does with its record once the mode is known: which
//! pass to run, whether the file is written back, and the exit status.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::engine::RepairEngine;
use crate::error::Error;
use crate::repair::StorageFilename;
use crate::resume::ResumeRecord;

/// Nothing was written.
pub const EXIT_UNTOUCHED: u8 = 0;
/// The resume file was rewritten with repairs.
pub const EXIT_REPAIRED: u8 = 2;
/// Missing field, missing content, malformed name, I/O or format error.
pub const EXIT_FAILURE: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Untouched,
    Repaired,
}

impl RunStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Untouched => EXIT_UNTOUCHED,
            RunStatus::Repaired => EXIT_REPAIRED,
        }
    }
}

pub fn exit_code_for<E>(result: &Result<RunStatus, E>) -> u8 {
    match result {
        Ok(status) => status.exit_code(),
        Err(_) => EXIT_FAILURE,
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Mode<'a> {
    Repair { storage: &'a StorageFilename },
    Rewrite { old: &'a [u8], new: &'a [u8] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub repaired_count: u32,
    pub flagged_count: u32,
    pub write_back: bool,
}

/// Run the selected pass over the in-memory record. Write-back needs at
/// least one repair and `make_changes`.
pub fn run_mode(
    engine: &RepairEngine,
    record: &mut ResumeRecord,
    mode: Mode<'_>,
    make_changes: bool,
) -> Result<RunSummary, Error> {
    match mode {
        Mode::Rewrite { old, new } => {
            let outcome = engine.rewrite(record, old, new)?;
            let repaired_count = u32::from(outcome.rewritten());
            Ok(RunSummary {
                repaired_count,
                flagged_count: 0,
                write_back: repaired_count > 0 && make_changes,
            })
        }
        Mode::Repair { storage } => {
            let outcome = engine.repair(record, storage, make_changes)?;
            Ok(RunSummary {
                repaired_count: outcome.repaired_count,
                flagged_count: outcome.flagged_count,
                write_back: outcome.write_back(),
            })
        }
    }
}

/// `<path>.bak`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut backup = path.as_os_str().to_os_string();
    backup.push(".bak");
    PathBuf::from(backup)
}

/// Persist the record when the summary allows it, copying the current file
/// to `<path>.bak` first if asked.
pub fn commit(
    record: &ResumeRecord,
    path: &Path,
    summary: &RunSummary,
    backup: bool,
) -> Result<RunStatus, Error> {
    if !summary.write_back {
        return Ok(RunStatus::Untouched);
    }
    if backup {
        let backup = backup_path(path);
        fs::copy(path, &backup)?;
        debug!("Backup written to {}", backup.display());
    }
    record.save(path)?;
    Ok(RunStatus::Repaired)
}
