mod walk;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::Error;
use crate::platform;

pub use walk::aggregate_size;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Absent,
    Directory,
    Symlink,
    RegularFile,
}

impl EntityKind {
    pub fn exists(self) -> bool {
        self != EntityKind::Absent
    }
}

/// Snapshot of one probed path. Always taken fresh, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilesystemEntity {
    pub path: PathBuf,
    pub kind: EntityKind,
    pub total_bytes: u64,
    pub modified: i64,
}

/// Existence follows symlinks: a dangling link is `Absent`.
pub fn classify(path: &Path) -> Result<EntityKind, Error> {
    let target = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(EntityKind::Absent),
        Err(err) => return Err(probe_error(path, err)),
    };

    let link = fs::symlink_metadata(path).map_err(|err| probe_error(path, err))?;
    let kind = if link.file_type().is_symlink() {
        EntityKind::Symlink
    } else if target.is_dir() {
        EntityKind::Directory
    } else if target.is_file() {
        EntityKind::RegularFile
    } else {
        warn!("Unsupported file type at {}", path.display());
        EntityKind::Absent
    };
    debug!("{} classified as {:?}", path.display(), kind);
    Ok(kind)
}

/// Last modification time of the (link-resolved) path, in seconds since the epoch.
pub fn modification_time(path: &Path) -> Result<i64, Error> {
    let modified = fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|err| probe_error(path, err))?;
    Ok(platform::epoch_seconds(modified))
}

/// Classify, size and date a path the caller expects to exist.
pub fn probe(path: &Path) -> Result<FilesystemEntity, Error> {
    let kind = classify(path)?;
    if !kind.exists() {
        return Err(Error::NotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(FilesystemEntity {
        path: path.to_path_buf(),
        kind,
        total_bytes: aggregate_size(path)?,
        modified: modification_time(path)?,
    })
}

fn probe_error(path: &Path, source: io::Error) -> Error {
    Error::Probe {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_classify_missing_path() {
        let tmp = tempdir().unwrap();
        let kind = classify(&tmp.path().join("nope")).unwrap();
        assert_eq!(kind, EntityKind::Absent);
        assert!(!kind.exists());
    }

    #[test]
    fn test_classify_file_and_directory() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("movie.mkv");
        fs::write(&file, b"0123456789").unwrap();

        assert_eq!(classify(tmp.path()).unwrap(), EntityKind::Directory);
        assert_eq!(classify(&file).unwrap(), EntityKind::RegularFile);
    }

    #[cfg(unix)]
    #[test]
    fn test_classify_symlinks() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("target.bin");
        fs::write(&file, b"data").unwrap();
        let link = tmp.path().join("link.bin");
        std::os::unix::fs::symlink(&file, &link).unwrap();
        let dangling = tmp.path().join("dangling.bin");
        std::os::unix::fs::symlink(tmp.path().join("gone"), &dangling).unwrap();

        assert_eq!(classify(&link).unwrap(), EntityKind::Symlink);
        assert_eq!(classify(&dangling).unwrap(), EntityKind::Absent);
    }

    #[test]
    fn test_probe_missing_path_is_not_found() {
        let tmp = tempdir().unwrap();
        let missing = tmp.path().join("gone");
        match probe(&missing) {
            Err(Error::NotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_probe_regular_file() {
        let tmp = tempdir().unwrap();
        let file = tmp.path().join("movie.mkv");
        fs::write(&file, vec![0u8; 1234]).unwrap();

        let entity = probe(&file).unwrap();
        assert_eq!(entity.kind, EntityKind::RegularFile);
        assert_eq!(entity.total_bytes, 1234);
        assert!(entity.modified > 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_modification_time_before_epoch_matches_st_mtime() {
        use std::os::unix::fs::MetadataExt;
        use std::time::{Duration, UNIX_EPOCH};

        let tmp = tempdir().unwrap();
        let file = tmp.path().join("old.bin");
        fs::write(&file, b"x").unwrap();
        fs::File::options()
            .write(true)
            .open(&file)
            .unwrap()
            .set_modified(UNIX_EPOCH - Duration::from_millis(1_500))
            .unwrap();

        let st_mtime = fs::metadata(&file).unwrap().mtime();
        assert_eq!(modification_time(&file).unwrap(), st_mtime);
        assert_eq!(st_mtime, -2);
    }
}
