use std::path::{Path, PathBuf};

use tracing::debug;

/// Where a repair session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStage {
    Start,
    PathResolved,
    NameChecked,
    ExistenceConfirmed,
    DatesChecked,
    PeersInvalidated,
    Decided(Decision),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    WriteBack,
    NoChange,
}

/// Mutable state threaded through one repair run. Never persisted.
#[derive(Debug)]
pub struct RepairSession {
    repaired_count: u32,
    flagged_count: u32,
    force_date_update: bool,
    resolved_path: Option<PathBuf>,
    stage: RepairStage,
}

impl Default for RepairSession {
    fn default() -> Self {
        Self::new()
    }
}

impl RepairSession {
    pub fn new() -> Self {
        Self {
            repaired_count: 0,
            flagged_count: 0,
            force_date_update: false,
            resolved_path: None,
            stage: RepairStage::Start,
        }
    }

    pub fn repaired_count(&self) -> u32 {
        self.repaired_count
    }

    /// Inconsistencies seen but left in place because writing was not allowed.
    pub fn flagged_count(&self) -> u32 {
        self.flagged_count
    }

    pub fn force_date_update(&self) -> bool {
        self.force_date_update
    }

    pub fn resolved_path(&self) -> Option<&Path> {
        self.resolved_path.as_deref()
    }

    pub fn stage(&self) -> RepairStage {
        self.stage
    }

    pub(crate) fn record_repair(&mut self) {
        self.repaired_count += 1;
    }

    pub(crate) fn record_flag(&mut self) {
        self.flagged_count += 1;
    }

    pub(crate) fn force_dates(&mut self) {
        self.force_date_update = true;
    }

    pub(crate) fn set_resolved_path(&mut self, path: PathBuf) {
        self.resolved_path = Some(path);
    }

    pub(crate) fn advance(&mut self, next: RepairStage) {
        debug!("Repair stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }
}

/// What a finished repair run reports to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    pub repaired_count: u32,
    pub flagged_count: u32,
    pub content_path: PathBuf,
    pub total_bytes: u64,
    pub decision: Decision,
}

impl RepairOutcome {
    pub fn write_back(&self) -> bool {
        self.decision == Decision::WriteBack
    }
}
