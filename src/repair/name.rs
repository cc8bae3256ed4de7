//! Cross-checks the record's `name` against the file the record lives in.
//!
//! Transmission stores each resume record as
//! `<content-name>.<16 lowercase alphanumerics>.resume`. When the `name`
//! field no longer appears in that filename, the record was populated from
//! a stale source and the filename is taken as ground truth.

use std::path::Path;

use lazy_static::lazy_static;
use regex::bytes::Regex;
use tracing::info;

use super::session::RepairSession;
use crate::error::Error;
use crate::platform;
use crate::resume::{keys, ResumeRecord};

pub const HASH_LEN: usize = 16;

lazy_static! {
    /// The hash suffix, anchored at the end. Its start offset is the end of
    /// the content name.
    static ref HASH_SUFFIX: Regex =
        Regex::new(r"\.([a-z0-9]{16})\.resume$").expect("hash suffix pattern is valid");
}

/// The filename a resume record is stored under, kept as raw bytes so
/// non-UTF-8 names survive unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageFilename {
    raw: Vec<u8>,
}

/// A storage filename split along the naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedStorageFilename<'a> {
    pub content_name: &'a [u8],
    pub hash: &'a [u8],
}

impl StorageFilename {
    pub fn new(raw: impl Into<Vec<u8>>) -> Self {
        Self { raw: raw.into() }
    }

    /// Basename of the resume file path.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let name = path.file_name().unwrap_or_default();
        let raw = platform::os_bytes(name).ok_or_else(|| Error::MalformedStorageFilename {
            filename: name.to_string_lossy().into_owned(),
        })?;
        Ok(Self {
            raw: raw.into_owned(),
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Split on the first (and only) hash suffix match. The content name
    /// must be non-empty.
    pub fn parse(&self) -> Result<ParsedStorageFilename<'_>, Error> {
        let captures = HASH_SUFFIX
            .captures(&self.raw)
            .ok_or_else(|| self.malformed())?;
        let (Some(suffix), Some(hash)) = (captures.get(0), captures.get(1)) else {
            return Err(self.malformed());
        };
        // An empty name would resolve to the destination directory itself.
        if suffix.start() == 0 {
            return Err(self.malformed());
        }
        Ok(ParsedStorageFilename {
            content_name: &self.raw[..suffix.start()],
            hash: hash.as_bytes(),
        })
    }

    fn malformed(&self) -> Error {
        Error::MalformedStorageFilename {
            filename: String::from_utf8_lossy(&self.raw).into_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameCheck {
    Consistent,
    Inferred(Vec<u8>),
}

/// Compare `name` with the storage filename and rewrite it from the
/// filename on mismatch. On `Inferred` the session is charged one repair
/// and later date checks are forced. Both sides are compared as bytes.
pub fn verify_name(
    record: &mut ResumeRecord,
    storage: &StorageFilename,
    session: &mut RepairSession,
) -> Result<NameCheck, Error> {
    let current = record
        .get_raw(keys::NAME)
        .ok_or(Error::MissingField { field: keys::NAME })?;

    if platform::find_bytes(storage.as_bytes(), current).is_some() {
        return Ok(NameCheck::Consistent);
    }

    info!("REPAIR: Resume file does not point to the correct file/directory");
    let parsed = storage.parse()?;
    let inferred = parsed.content_name.to_vec();
    info!("REPAIR: Inferred file: {}", String::from_utf8_lossy(&inferred));

    record.set_raw(keys::NAME, &inferred);
    session.record_repair();
    session.force_dates();
    Ok(NameCheck::Inferred(inferred))
}
