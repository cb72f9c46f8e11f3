use scrutin::MemStore;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("unable to read {0}: {1}")]
    Read(String, io::Error),

    #[error("unable to write {0}: {1}")]
    Write(String, io::Error),

    #[error("{0} is not a state file: {1}")]
    Format(String, serde_json::Error),

    #[error("{0}: value for key {1:?} is not valid hex")]
    BadHex(String, String),
}

/// Load a state file: a JSON object mapping each key to its hex-encoded value.
///
/// A missing file is an empty store.
pub fn load(path: &str) -> Result<MemStore, StateError> {
    if !Path::new(path).exists() {
        return Ok(MemStore::new());
    }

    let bytes = fs::read(path).map_err(|e| StateError::Read(path.to_owned(), e))?;
    let encoded: BTreeMap<String, String> =
        serde_json::from_slice(&bytes).map_err(|e| StateError::Format(path.to_owned(), e))?;

    let mut decoded = BTreeMap::new();
    for (key, value) in encoded {
        let value =
            hex::decode(&value).map_err(|_| StateError::BadHex(path.to_owned(), key.clone()))?;
        decoded.insert(key, value);
    }
    Ok(decoded.into())
}

/// Save a store, replacing the file only once the new content is fully written
pub fn save(path: &str, store: MemStore) -> Result<(), StateError> {
    let decoded: BTreeMap<String, Vec<u8>> = store.into();
    let encoded: BTreeMap<String, String> = decoded
        .into_iter()
        .map(|(key, value)| (key, hex::encode(value)))
        .collect();

    let json =
        serde_json::to_vec_pretty(&encoded).map_err(|e| StateError::Format(path.to_owned(), e))?;

    let tmp = format!("{}.tmp", path);
    fs::write(&tmp, json).map_err(|e| StateError::Write(tmp.clone(), e))?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(StateError::Write(path.to_owned(), e));
    }
    Ok(())
}
