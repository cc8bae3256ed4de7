use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::bencode::{self, Dictionary, Value};
use crate::error::Error;

/// A Transmission resume document: one bencoded top-level dictionary.
///
/// Getters treat a field of the wrong type as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeRecord {
    root: Dictionary,
}

impl ResumeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, Error> {
        match bencode::decode(data)? {
            Value::Dict(root) => Ok(Self { root }),
            _ => Err(Error::Format {
                offset: 0,
                reason: "top-level value is not a dictionary".to_string(),
            }),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        bencode::encode(&Value::Dict(self.root.clone()))
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let data = fs::read(path)?;
        debug!("Read {} bytes from {}", data.len(), path.display());
        Self::from_bytes(&data)
    }

    /// Write through a sibling temp file so a failed save leaves the
    /// original intact.
    pub fn save(&self, path: &Path) -> Result<(), Error> {
        let tmp = temp_sibling(path);
        fs::write(&tmp, self.to_bytes())?;
        if let Err(err) = fs::rename(&tmp, path) {
            let _ = fs::remove_file(&tmp);
            return Err(err.into());
        }
        debug!("Saved {}", path.display());
        Ok(())
    }

    pub fn fields(&self) -> &Dictionary {
        &self.root
    }

    pub fn contains(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// UTF-8 text only. Path fields (`name`, `destination`) go through
    /// `get_raw` so non-UTF-8 bytes are not mistaken for a missing field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        dict_str(&self.root, key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        dict_int(&self.root, key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        dict_bool(&self.root, key)
    }

    pub fn get_raw(&self, key: &str) -> Option<&[u8]> {
        match self.root.get(key)? {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        match self.root.get(key)? {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn set_str(&mut self, key: &str, value: &str) {
        self.root
            .insert(key, Value::Bytes(value.as_bytes().to_vec()));
    }

    pub fn set_int(&mut self, key: &str, value: i64) {
        self.root.insert(key, Value::Int(value));
    }

    pub fn set_raw(&mut self, key: &str, value: &[u8]) {
        self.root.insert(key, Value::Bytes(value.to_vec()));
    }
}

pub fn dict_str<'a>(dict: &'a Dictionary, key: &str) -> Option<&'a str> {
    match dict.get(key)? {
        Value::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
        _ => None,
    }
}

pub fn dict_int(dict: &Dictionary, key: &str) -> Option<i64> {
    match dict.get(key)? {
        Value::Int(i) => Some(*i),
        _ => None,
    }
}

/// Booleans are stored as integers, or as the strings "true"/"false".
pub fn dict_bool(dict: &Dictionary, key: &str) -> Option<bool> {
    match dict.get(key)? {
        Value::Int(i) => Some(*i != 0),
        Value::Bytes(bytes) => match bytes.as_slice() {
            b"true" => Some(true),
            b"false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::keys;

    const SAMPLE: &[u8] =
        b"d10:added-datei1500000000e11:destination5:/data4:name9:movie.mkv6:pausedi1e6:peers26:abcdefe";

    #[test]
    fn test_typed_getters() {
        let record = ResumeRecord::from_bytes(SAMPLE).unwrap();
        assert_eq!(record.get_str(keys::DESTINATION), Some("/data"));
        assert_eq!(record.get_str(keys::NAME), Some("movie.mkv"));
        assert_eq!(record.get_int(keys::ADDED_DATE), Some(1_500_000_000));
        assert_eq!(record.get_bool(keys::PAUSED), Some(true));
        assert_eq!(record.get_raw(keys::PEERS_V4), Some(&b"abcdef"[..]));
        assert_eq!(record.get_int(keys::DONE_DATE), None);
    }

    #[test]
    fn test_wrong_type_reads_as_absent() {
        let record = ResumeRecord::from_bytes(SAMPLE).unwrap();
        assert_eq!(record.get_int(keys::NAME), None);
        assert_eq!(record.get_str(keys::ADDED_DATE), None);
        assert!(record.get_dict(keys::DESTINATION).is_none());
    }

    #[test]
    fn test_top_level_must_be_dictionary() {
        assert!(matches!(
            ResumeRecord::from_bytes(b"li1ee"),
            Err(Error::Format { .. })
        ));
    }

    #[test]
    fn test_untouched_fields_round_trip() {
        let mut record = ResumeRecord::from_bytes(SAMPLE).unwrap();
        assert_eq!(record.to_bytes(), SAMPLE);

        record.set_str(keys::NAME, "other.mkv");
        let bytes = record.to_bytes();
        let reloaded = ResumeRecord::from_bytes(&bytes).unwrap();
        assert_eq!(reloaded.get_str(keys::NAME), Some("other.mkv"));
        assert_eq!(reloaded.get_raw(keys::PEERS_V4), Some(&b"abcdef"[..]));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("movie.mkv.0123456789abcdef.resume");

        let mut record = ResumeRecord::from_bytes(SAMPLE).unwrap();
        record.set_int(keys::DONE_DATE, 1_600_000_000);
        record.save(&path).unwrap();

        let loaded = ResumeRecord::load(&path).unwrap();
        assert_eq!(loaded, record);
        assert!(!temp_sibling(&path).exists());
    }
}
