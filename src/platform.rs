use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Raw bytes of an OS string. Always exact on unix.
#[cfg(unix)]
pub fn os_bytes(s: &OsStr) -> Option<Cow<'_, [u8]>> {
    use std::os::unix::ffi::OsStrExt;
    Some(Cow::Borrowed(s.as_bytes()))
}

/// Raw bytes of an OS string, `None` when it is not valid Unicode.
#[cfg(not(unix))]
pub fn os_bytes(s: &OsStr) -> Option<Cow<'_, [u8]>> {
    s.to_str().map(|text| Cow::Borrowed(text.as_bytes()))
}

#[cfg(unix)]
pub fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Some(PathBuf::from(OsStr::from_bytes(bytes)))
}

#[cfg(not(unix))]
pub fn path_from_bytes(bytes: &[u8]) -> Option<PathBuf> {
    std::str::from_utf8(bytes).ok().map(PathBuf::from)
}

/// Byte substring search; an empty needle is always found at 0.
pub fn find_bytes(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Whole seconds since the epoch, floored like `st_mtime`.
pub fn epoch_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => after.as_secs() as i64,
        Err(before) => {
            let before = before.duration();
            let secs = -(before.as_secs() as i64);
            if before.subsec_nanos() > 0 {
                secs - 1
            } else {
                secs
            }
        }
    }
}
