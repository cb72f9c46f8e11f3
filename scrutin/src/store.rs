use crate::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

/// The ledger key-value contract supplied by the host.
///
/// A missing key is `Ok(None)`. `Err` is reserved for failures of the store itself.
pub trait Store {
    /// Get the raw bytes stored at `key`
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` at `key`, overwriting whatever was there
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError>;

    /// Get a JSON record, treating undecodable content as absent.
    fn get_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let bytes = match self.get_state(key)? {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => return Ok(None),
        };
        match serde_json::from_slice(&bytes) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                tracing::warn!(key, error = %e, "undecodable record treated as absent");
                Ok(None)
            }
        }
    }

    /// Encode a record as JSON and store it
    fn put_record<T: Serialize>(&mut self, key: &str, record: &T) -> Result<(), Error> {
        let bytes = serde_json::to_vec(record)?;
        self.put_state(key, bytes)?;
        Ok(())
    }
}

/// A simple store that uses an in-memory BTreeMap
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct MemStore {
    inner: BTreeMap<String, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Store for MemStore {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.inner.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: Vec<u8>) -> Result<(), StoreError> {
        self.inner.insert(key.to_owned(), value);
        Ok(())
    }
}

impl From<BTreeMap<String, Vec<u8>>> for MemStore {
    fn from(inner: BTreeMap<String, Vec<u8>>) -> Self {
        MemStore { inner }
    }
}

impl From<MemStore> for BTreeMap<String, Vec<u8>> {
    fn from(store: MemStore) -> Self {
        store.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Named {
        #[serde(default)]
        name: String,
    }

    #[test]
    fn test_missing_key() {
        let store = MemStore::new();
        assert_eq!(store.get_state("nope").unwrap(), None);
        assert!(store.get_record::<Named>("nope").unwrap().is_none());
    }

    #[test]
    fn test_garbage_is_absent() {
        let mut store = MemStore::new();
        store.put_state("k", b"not json".to_vec()).unwrap();
        assert!(store.get_record::<Named>("k").unwrap().is_none());

        store.put_state("k", vec![]).unwrap();
        assert!(store.get_record::<Named>("k").unwrap().is_none());
    }

    #[test]
    fn test_put_record_is_compact_json() {
        let mut store = MemStore::new();
        store.put_record("k", &Named { name: "x".into() }).unwrap();
        assert_eq!(store.get_state("k").unwrap().unwrap(), br#"{"name":"x"}"#);
        assert_eq!(store.len(), 1);
    }
}
