use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::Error;
use crate::probe;
use crate::repair::dates::{self, DatePolicy};
use crate::repair::name::{self, NameCheck, StorageFilename};
use crate::repair::path::resolve_content_path;
use crate::repair::peers::invalidate_peers;
use crate::repair::rewrite::{self, RewriteOutcome};
use crate::repair::session::{Decision, RepairOutcome, RepairSession, RepairStage};
use crate::resume::ResumeRecord;

/// Runs one repair (or rewrite) over one in-memory record. Persisting the
/// result is left to the caller.
pub struct RepairEngine {
    policy: Box<dyn DatePolicy>,
}

impl RepairEngine {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            policy: Box::new(config.date_policy()),
        }
    }

    pub fn with_policy(policy: impl DatePolicy + 'static) -> Self {
        Self {
            policy: Box::new(policy),
        }
    }

    /// Full consistency pass:
    /// 1. Resolve `destination/name`
    /// 2. Check `name` against the storage filename, re-resolving on repair
    /// 3. Confirm the content exists and size it
    /// 4. Normalize the dates against the content mtime
    /// 5. Clear peer caches and decide on write-back
    ///
    /// Any error aborts the run; the record may then hold partial edits and
    /// must not be saved.
    pub fn repair(
        &self,
        record: &mut ResumeRecord,
        storage: &StorageFilename,
        allow_write: bool,
    ) -> Result<RepairOutcome, Error> {
        let mut session = RepairSession::new();

        let mut content_path = resolve_content_path(record)?;
        info!("Full path: {}", content_path.display());
        session.set_resolved_path(content_path.clone());
        session.advance(RepairStage::PathResolved);

        let check = name::verify_name(record, storage, &mut session)?;
        session.advance(RepairStage::NameChecked);
        if let NameCheck::Inferred(_) = check {
            content_path = resolve_content_path(record)?;
            info!("REPAIR: New full path: {}", content_path.display());
            session.set_resolved_path(content_path.clone());
            session.advance(RepairStage::PathResolved);
        }

        let entity = probe::probe(&content_path)?;
        info!("{:?} found, total bytes: {}", entity.kind, entity.total_bytes);
        session.advance(RepairStage::ExistenceConfirmed);

        let checks = dates::check_dates(
            record,
            entity.modified,
            allow_write,
            self.policy.as_ref(),
            &mut session,
        );
        debug!("Date checks: {:?}", checks);
        session.advance(RepairStage::DatesChecked);

        let decision = if session.repaired_count() > 0 && allow_write {
            invalidate_peers(record);
            session.advance(RepairStage::PeersInvalidated);
            Decision::WriteBack
        } else {
            Decision::NoChange
        };
        session.advance(RepairStage::Decided(decision));

        Ok(RepairOutcome {
            repaired_count: session.repaired_count(),
            flagged_count: session.flagged_count(),
            content_path,
            total_bytes: entity.total_bytes,
            decision,
        })
    }

    /// Standalone `destination` edit; never touches names, dates or peers.
    pub fn rewrite(
        &self,
        record: &mut ResumeRecord,
        old: &[u8],
        new: &[u8],
    ) -> Result<RewriteOutcome, Error> {
        rewrite::rewrite_destination(record, old, new)
    }
}

impl Default for RepairEngine {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}
