use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use super::session::RepairSession;
use crate::resume::{keys, ResumeRecord};

/// Decides whether a stored timestamp was never correctly recorded.
pub trait DatePolicy {
    fn is_erroneous(&self, timestamp: i64) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentinelZone {
    Local,
    Utc,
}

/// Flags timestamps whose calendar year in `zone` is `year`.
/// Timestamps with no calendar representation are flagged too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentinelYear {
    pub year: i32,
    pub zone: SentinelZone,
}

impl Default for SentinelYear {
    fn default() -> Self {
        Self {
            year: 1970,
            zone: SentinelZone::Local,
        }
    }
}

impl SentinelYear {
    fn year_of(&self, timestamp: i64) -> Option<i32> {
        match self.zone {
            SentinelZone::Local => Local
                .timestamp_opt(timestamp, 0)
                .earliest()
                .map(|dt| dt.year()),
            SentinelZone::Utc => Utc
                .timestamp_opt(timestamp, 0)
                .single()
                .map(|dt| dt.year()),
        }
    }
}

impl DatePolicy for SentinelYear {
    fn is_erroneous(&self, timestamp: i64) -> bool {
        self.year_of(timestamp).map_or(true, |year| year == self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStatus {
    Unchanged,
    Flagged,
    Repaired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateChecks {
    pub added: Option<DateStatus>,
    pub done: Option<DateStatus>,
}

/// Check one date field. Absent fields are skipped and report `None`.
pub fn normalize_date(
    record: &mut ResumeRecord,
    field: &'static str,
    reference_time: i64,
    force: bool,
    allow_write: bool,
    policy: &dyn DatePolicy,
    session: &mut RepairSession,
) -> Option<DateStatus> {
    let current = record.get_int(field)?;

    if !(force || policy.is_erroneous(current)) {
        return Some(DateStatus::Unchanged);
    }

    if !allow_write {
        warn!("Erroneous {} detected: {}", field, current);
        session.record_flag();
        return Some(DateStatus::Flagged);
    }

    record.set_int(field, reference_time);
    session.record_repair();
    info!(
        "REPAIR: Erroneous {}: updated to modification date {}",
        field,
        format_timestamp(reference_time)
    );
    Some(DateStatus::Repaired)
}

/// Both date fields are evaluated; one erroneous field never skips the other.
pub fn check_dates(
    record: &mut ResumeRecord,
    reference_time: i64,
    allow_write: bool,
    policy: &dyn DatePolicy,
    session: &mut RepairSession,
) -> DateChecks {
    let force = session.force_date_update();
    let added = normalize_date(
        record,
        keys::ADDED_DATE,
        reference_time,
        force,
        allow_write,
        policy,
        session,
    );
    let done = normalize_date(
        record,
        keys::DONE_DATE,
        reference_time,
        force,
        allow_write,
        policy,
        session,
    );
    DateChecks { added, done }
}

/// Human readable local time, or the raw value if it has no calendar form.
pub fn format_timestamp(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%a %b %e %H:%M:%S %Y")
            .to_string(),
        None => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UTC_1970: SentinelYear = SentinelYear {
        year: 1970,
        zone: SentinelZone::Utc,
    };
    const VALID: i64 = 1_500_000_000;
    const MTIME: i64 = 1_650_000_000;

    fn record_with_dates(added: i64, done: i64) -> ResumeRecord {
        let mut record = ResumeRecord::new();
        record.set_int(keys::ADDED_DATE, added);
        record.set_int(keys::DONE_DATE, done);
        record
    }

    #[test]
    fn test_sentinel_year_policy() {
        assert!(UTC_1970.is_erroneous(0));
        assert!(UTC_1970.is_erroneous(31_535_999));
        assert!(!UTC_1970.is_erroneous(31_536_000));
        assert!(!UTC_1970.is_erroneous(-1));
        assert!(!UTC_1970.is_erroneous(VALID));
        assert!(UTC_1970.is_erroneous(i64::MAX));
    }

    #[test]
    fn test_local_zone_flags_mid_1970() {
        // Noon on 1970-01-01 UTC is 1970 in every timezone.
        assert!(SentinelYear::default().is_erroneous(43_200));
        assert!(!SentinelYear::default().is_erroneous(VALID));
    }

    #[test]
    fn test_zero_date_repaired_when_allowed() {
        let mut record = record_with_dates(0, VALID);
        let mut session = RepairSession::new();

        let checks = check_dates(&mut record, MTIME, true, &UTC_1970, &mut session);
        assert_eq!(checks.added, Some(DateStatus::Repaired));
        assert_eq!(checks.done, Some(DateStatus::Unchanged));
        assert_eq!(record.get_int(keys::ADDED_DATE), Some(MTIME));
        assert_eq!(record.get_int(keys::DONE_DATE), Some(VALID));
        assert_eq!(session.repaired_count(), 1);
    }

    #[test]
    fn test_zero_date_only_flagged_without_write() {
        let mut record = record_with_dates(0, VALID);
        let mut session = RepairSession::new();

        let checks = check_dates(&mut record, MTIME, false, &UTC_1970, &mut session);
        assert_eq!(checks.added, Some(DateStatus::Flagged));
        assert_eq!(record.get_int(keys::ADDED_DATE), Some(0));
        assert_eq!(session.repaired_count(), 0);
        assert_eq!(session.flagged_count(), 1);
    }

    #[test]
    fn test_force_overrides_valid_dates() {
        let mut record = record_with_dates(VALID, VALID);
        let mut session = RepairSession::new();
        session.force_dates();

        let checks = check_dates(&mut record, MTIME, true, &UTC_1970, &mut session);
        assert_eq!(checks.added, Some(DateStatus::Repaired));
        assert_eq!(checks.done, Some(DateStatus::Repaired));
        assert_eq!(record.get_int(keys::DONE_DATE), Some(MTIME));
        assert_eq!(session.repaired_count(), 2);
    }

    #[test]
    fn test_both_fields_checked_independently() {
        let mut record = record_with_dates(0, 0);
        let mut session = RepairSession::new();

        let checks = check_dates(&mut record, MTIME, true, &UTC_1970, &mut session);
        assert_eq!(checks.added, Some(DateStatus::Repaired));
        assert_eq!(checks.done, Some(DateStatus::Repaired));
        assert_eq!(session.repaired_count(), 2);
    }

    #[test]
    fn test_absent_fields_are_skipped() {
        let mut record = ResumeRecord::new();
        record.set_int(keys::DONE_DATE, 0);
        let mut session = RepairSession::new();

        let checks = check_dates(&mut record, MTIME, true, &UTC_1970, &mut session);
        assert_eq!(checks.added, None);
        assert_eq!(checks.done, Some(DateStatus::Repaired));
        assert!(!record.contains(keys::ADDED_DATE));
    }

    #[test]
    fn test_custom_policy_is_honoured() {
        struct Never;
        impl DatePolicy for Never {
            fn is_erroneous(&self, _timestamp: i64) -> bool {
                false
            }
        }

        let mut record = record_with_dates(0, 0);
        let mut session = RepairSession::new();
        let checks = check_dates(&mut record, MTIME, true, &Never, &mut session);
        assert_eq!(checks.added, Some(DateStatus::Unchanged));
        assert_eq!(checks.done, Some(DateStatus::Unchanged));
        assert_eq!(session.repaired_count(), 0);
    }
}
