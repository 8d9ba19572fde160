//! Versioned envelope for persisted client state.

use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{KeyValueStore, StoreError, StoreExt};

/// Schema version written with every persisted value.
///
/// Entries with a different version are discarded on load.
pub const STORAGE_VERSION: u32 = 0;

/// A value as written to client storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Persisted<T> {
    /// The stored state.
    pub state: T,
    /// Schema version the state was written with.
    pub version: u32,
    /// When the entry was written (Unix millis).
    pub updated_at: i64,
}

impl<T> Persisted<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Wrap state with the current version and timestamp.
    pub fn new(state: T) -> Self {
        Self {
            state,
            version: STORAGE_VERSION,
            updated_at: Utc::now().timestamp_millis(),
        }
    }

    /// Load state from `key`.
    ///
    /// A missing entry is `Ok(None)`. An entry written with another schema
    /// version is treated as missing.
    pub fn load(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, StoreError> {
        match store.get::<Persisted<T>>(key)? {
            Some(entry) if entry.version == STORAGE_VERSION => Ok(Some(entry.state)),
            Some(entry) => {
                tracing::warn!(
                    key,
                    found = entry.version,
                    expected = STORAGE_VERSION,
                    "discarding persisted state with unknown version"
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Write state under `key`.
    pub fn save(store: &dyn KeyValueStore, key: &str, state: T) -> Result<(), StoreError> {
        store.set(key, &Persisted::new(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;

    #[test]
    fn test_save_and_load() {
        let store = MemoryStore::new();
        Persisted::save(&store, "k", vec![1u32, 2, 3]).unwrap();
        assert_eq!(
            Persisted::<Vec<u32>>::load(&store, "k").unwrap(),
            Some(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_missing_entry() {
        let store = MemoryStore::new();
        assert_eq!(Persisted::<u32>::load(&store, "k").unwrap(), None);
    }

    #[test]
    fn test_unknown_version_is_discarded() {
        let store = MemoryStore::new();
        let entry = Persisted {
            state: 7u32,
            version: STORAGE_VERSION + 1,
            updated_at: 0,
        };
        store.set("k", &entry).unwrap();
        assert_eq!(Persisted::<u32>::load(&store, "k").unwrap(), None);
    }

    #[test]
    fn test_envelope_shape() {
        let json = serde_json::to_value(Persisted::new(5u32)).unwrap();
        assert_eq!(json["state"], 5);
        assert_eq!(json["version"], STORAGE_VERSION);
        assert!(json["updatedAt"].as_i64().unwrap() > 0);
    }
}
