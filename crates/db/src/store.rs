//! Flat-file request store.
//!
//! Layout: `<data_dir>/requests.json`, pretty-printed as
//! `{ "version": 1, "requests": [...] }`. A bare top-level array (the layout
//! written before versioning) is still accepted and is upgraded on the next
//! write.
//!
//! Every access holds an async mutex for its whole duration, so a
//! read-modify-write cycle can never interleave with another. Writes go to a
//! temp file in the same directory which is fsynced and renamed over the
//! target; readers see either the old or the new collection, never a mix.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::request::ServiceAccountRequest;

/// File name of the request collection inside the data directory.
pub const REQUESTS_FILE_NAME: &str = "requests.json";

/// Current on-disk format version.
pub const STORE_FORMAT_VERSION: u32 = 1;

/// Cheaply cloneable handle to the request collection.
#[derive(Clone)]
pub struct RequestStore {
    inner: Arc<Inner>,
}

struct Inner {
    dir: PathBuf,
    path: PathBuf,
    lock: Mutex<()>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    version: u32,
    requests: &'a [ServiceAccountRequest],
}

/// Read on its own first so a newer file is rejected before its records
/// are interpreted.
#[derive(Deserialize)]
struct StoreHeader {
    version: u64,
}

#[derive(Deserialize)]
struct StoreFile {
    requests: Vec<ServiceAccountRequest>,
}

/// Keys used by unversioned files, mapped to their current names.
const LEGACY_KEYS: [(&str, &str); 4] = [
    ("targetOU", "targetOu"),
    ("spns", "servicePrincipalNames"),
    ("passwordInterval", "passwordIntervalDays"),
    ("script", "renderedScript"),
];

impl RequestStore {
    /// Open the store under `data_dir`, creating the directory if missing.
    ///
    /// The requests file itself is created lazily by the first write.
    pub async fn open(data_dir: &Path) -> Result<Self, StoreError> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .map_err(|e| StoreError::io(data_dir, e))?;

        let path = data_dir.join(REQUESTS_FILE_NAME);
        tracing::debug!(path = %path.display(), "Opened request store");

        Ok(Self {
            inner: Arc::new(Inner {
                dir: data_dir.to_path_buf(),
                path,
                lock: Mutex::new(()),
            }),
        })
    }

    /// Path of the backing JSON file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Run `f` over a snapshot of the collection.
    pub(crate) async fn read<T>(
        &self,
        f: impl FnOnce(Vec<ServiceAccountRequest>) -> T,
    ) -> Result<T, StoreError> {
        let _guard = self.inner.lock.lock().await;
        let requests = self.load().await?;
        Ok(f(requests))
    }

    /// Load, mutate and rewrite the whole collection under the lock.
    ///
    /// Nothing is written when `f` fails. The guard is dropped on every exit
    /// path, including errors from the load or the write.
    pub(crate) async fn modify<T>(
        &self,
        f: impl FnOnce(&mut Vec<ServiceAccountRequest>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _guard = self.inner.lock.lock().await;
        let mut requests = self.load().await?;
        let result = f(&mut requests)?;
        self.save(&requests).await?;
        Ok(result)
    }

    async fn load(&self) -> Result<Vec<ServiceAccountRequest>, StoreError> {
        let path = &self.inner.path;
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let requests = decode(&bytes).map_err(|e| match e {
            DecodeError::Json(source) => StoreError::Serialization {
                path: path.clone(),
                source,
            },
            DecodeError::Version(found) => StoreError::UnsupportedVersion {
                found,
                supported: STORE_FORMAT_VERSION,
            },
        })?;
        tracing::debug!(count = requests.len(), "Loaded request store");
        Ok(requests)
    }

    async fn save(&self, requests: &[ServiceAccountRequest]) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&StoreFileRef {
            version: STORE_FORMAT_VERSION,
            requests,
        })
        .map_err(|source| StoreError::Serialization {
            path: self.inner.path.clone(),
            source,
        })?;

        let dir = self.inner.dir.clone();
        let path = self.inner.path.clone();
        tokio::task::spawn_blocking(move || atomic_write(&dir, &path, &bytes)).await??;

        tracing::debug!(count = requests.len(), "Persisted request store");
        Ok(())
    }

    /// Create and discard a temp file in the data directory.
    pub(crate) async fn check_writable(&self) -> Result<(), StoreError> {
        let dir = self.inner.dir.clone();
        tokio::task::spawn_blocking(move || {
            tempfile::NamedTempFile::new_in(&dir)
                .map(drop)
                .map_err(|e| StoreError::io(&dir, e))
        })
        .await?
    }
}

#[derive(Debug)]
enum DecodeError {
    Json(serde_json::Error),
    Version(u64),
}

fn decode(bytes: &[u8]) -> Result<Vec<ServiceAccountRequest>, DecodeError> {
    let value: Value = serde_json::from_slice(bytes).map_err(DecodeError::Json)?;
    if let Value::Array(records) = value {
        return records
            .into_iter()
            .map(|mut record| {
                rename_legacy_keys(&mut record);
                serde_json::from_value(record)
            })
            .collect::<Result<_, _>>()
            .map_err(DecodeError::Json);
    }

    let header = StoreHeader::deserialize(&value).map_err(DecodeError::Json)?;
    if header.version > u64::from(STORE_FORMAT_VERSION) {
        return Err(DecodeError::Version(header.version));
    }
    let file = StoreFile::deserialize(value).map_err(DecodeError::Json)?;
    Ok(file.requests)
}

/// Rename old keys in place unless the current key is already present.
fn rename_legacy_keys(record: &mut Value) {
    let Some(map) = record.as_object_mut() else {
        return;
    };
    for (old, new) in LEGACY_KEYS {
        if map.contains_key(new) {
            continue;
        }
        if let Some(value) = map.remove(old) {
            map.insert(new.to_string(), value);
        }
    }
}

/// Write `bytes` to a fresh temp file in `dir`, fsync it and rename it over
/// `path`.
fn atomic_write(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(bytes)
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| StoreError::io(path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn decode_accepts_versioned_envelope() {
        let requests = decode(br#"{"version": 1, "requests": []}"#).unwrap();
        assert!(requests.is_empty());
    }

    #[test]
    fn decode_accepts_legacy_array() {
        assert!(decode(b"[]").unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_future_version() {
        assert_matches!(
            decode(br#"{"version": 7, "requests": []}"#),
            Err(DecodeError::Version(7))
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_matches!(decode(b"{not json"), Err(DecodeError::Json(_)));
        assert_matches!(decode(br#"{"requests": []}"#), Err(DecodeError::Json(_)));
    }

    #[test]
    fn future_version_rejected_before_records_are_read() {
        let bytes = br#"{"version": 2, "requests": [{"id": "x", "kind": "new-shape"}]}"#;
        assert_matches!(decode(bytes), Err(DecodeError::Version(2)));
    }

    #[test]
    fn legacy_keys_renamed_unless_current_key_present() {
        let mut record = serde_json::json!({
            "targetOU": "OU=Old",
            "passwordInterval": "90",
            "script": "old",
            "renderedScript": "current",
        });
        rename_legacy_keys(&mut record);
        assert_eq!(record["targetOu"], "OU=Old");
        assert_eq!(record["passwordIntervalDays"], "90");
        assert_eq!(record["renderedScript"], "current");
        assert!(record.get("targetOU").is_none());
        assert!(record.get("passwordInterval").is_none());
    }
}
