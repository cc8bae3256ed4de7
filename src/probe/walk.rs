use std::fs;
use std::io;
use std::path::Path;

use tracing::{trace, warn};
use walkdir::WalkDir;

use crate::error::Error;

/// Sum the sizes of all regular files reachable under `path`, following
/// symlinks. A single regular file yields its own length. Dangling links
/// inside the tree are skipped.
pub fn aggregate_size(path: &Path) -> Result<u64, Error> {
    let mut total: u64 = 0;

    for entry in WalkDir::new(path).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if let Some(link) = dangling_link(&err) {
                    warn!("Skipping dangling symlink {}", link.display());
                    continue;
                }
                let at = err.path().unwrap_or(path).to_path_buf();
                return Err(Error::Probe {
                    path: at,
                    source: io::Error::from(err),
                });
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let metadata = entry.metadata().map_err(|err| Error::Probe {
            path: entry.path().to_path_buf(),
            source: io::Error::from(err),
        })?;
        trace!("{} bytes in {}", metadata.len(), entry.path().display());
        total += metadata.len();
    }

    Ok(total)
}

fn dangling_link(err: &walkdir::Error) -> Option<&Path> {
    let not_found = err
        .io_error()
        .is_some_and(|e| e.kind() == io::ErrorKind::NotFound);
    let path = err.path()?;
    let is_link = fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false);
    (not_found && is_link).then_some(path)
}
