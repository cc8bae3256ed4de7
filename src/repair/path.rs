use std::path::PathBuf;

use crate::error::Error;
use crate::platform;
use crate::resume::{keys, ResumeRecord};

/// `destination + "/" + name`, derived fresh from the record every call.
/// The bytes are joined as stored, without any text decoding.
pub fn resolve_content_path(record: &ResumeRecord) -> Result<PathBuf, Error> {
    let destination = record
        .get_raw(keys::DESTINATION)
        .filter(|d| !d.is_empty())
        .ok_or(Error::MissingField {
            field: keys::DESTINATION,
        })?;
    let name = record
        .get_raw(keys::NAME)
        .ok_or(Error::MissingField { field: keys::NAME })?;

    let mut full_path = Vec::with_capacity(destination.len() + name.len() + 1);
    full_path.extend_from_slice(destination);
    full_path.push(b'/');
    full_path.extend_from_slice(name);
    platform::path_from_bytes(&full_path).ok_or_else(|| Error::Format {
        offset: 0,
        reason: format!(
            "content path {:?} is not representable on this platform",
            String::from_utf8_lossy(&full_path)
        ),
    })
}
