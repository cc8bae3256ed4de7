use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Resume file: field '{field}' could not be read")]
    MissingField { field: &'static str },

    #[error("Downloaded file/directory '{}' not found", path.display())]
    NotFound { path: PathBuf },

    #[error("Resume file has an incorrect name: '{filename}'")]
    MalformedStorageFilename { filename: String },

    #[error("Substring '{needle}' not found in '{haystack}'")]
    SubstringNotFound { needle: String, haystack: String },

    #[error("Error probing {}: {source}", path.display())]
    Probe {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed resume data at byte {offset}: {reason}")]
    Format { offset: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    /// Everything except a missing rewrite substring ends the invocation.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Error::SubstringNotFound { .. })
    }
}
