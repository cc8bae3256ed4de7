use tracing::{info, warn};

use crate::error::Error;
use crate::platform;
use crate::resume::{keys, ResumeRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    Rewritten { destination: Vec<u8> },
    NotFound,
}

impl RewriteOutcome {
    pub fn rewritten(&self) -> bool {
        matches!(self, RewriteOutcome::Rewritten { .. })
    }
}

/// Replace the first occurrence of `old` in `haystack` with `new`.
pub fn splice_first(haystack: &[u8], old: &[u8], new: &[u8]) -> Result<Vec<u8>, Error> {
    let start =
        platform::find_bytes(haystack, old).ok_or_else(|| Error::SubstringNotFound {
            needle: String::from_utf8_lossy(old).into_owned(),
            haystack: String::from_utf8_lossy(haystack).into_owned(),
        })?;

    let mut spliced = Vec::with_capacity(haystack.len() - old.len() + new.len());
    spliced.extend_from_slice(&haystack[..start]);
    spliced.extend_from_slice(new);
    spliced.extend_from_slice(&haystack[start + old.len()..]);
    Ok(spliced)
}

/// Edit the `destination` field in place. A missing substring is reported
/// and leaves the record untouched.
pub fn rewrite_destination(
    record: &mut ResumeRecord,
    old: &[u8],
    new: &[u8],
) -> Result<RewriteOutcome, Error> {
    let destination = record
        .get_raw(keys::DESTINATION)
        .filter(|d| !d.is_empty())
        .ok_or(Error::MissingField {
            field: keys::DESTINATION,
        })?;

    match splice_first(destination, old, new) {
        Ok(spliced) => {
            record.set_raw(keys::DESTINATION, &spliced);
            info!("UPDATE: New path: {}", String::from_utf8_lossy(&spliced));
            Ok(RewriteOutcome::Rewritten {
                destination: spliced,
            })
        }
        Err(err) if !err.is_fatal() => {
            warn!("{}", err);
            Ok(RewriteOutcome::NotFound)
        }
        Err(err) => Err(err),
    }
}
