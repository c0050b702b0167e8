//! Record store: keyed collections of JSON records.
//!
//! A collection is a JSON array of objects stored under one key. Each object
//! carries a string `id`, the only key used for upsert and delete.
//!
//! The [`RecordStore`] trait is async even though [`LocalRecordStore`]
//! completes synchronously, so a networked or file-backed store can satisfy
//! the same contract without touching callers.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::storage::LocalStorage;

/// Storage key holding the appointment collection.
pub const APPOINTMENTS_KEY: &str = "notary_appointments";

/// Name of the identity field every record carries.
const ID_FIELD: &str = "id";

/// Async access to keyed record collections.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every record stored under `key`, in insertion order.
    ///
    /// A missing key or unreadable stored JSON yields an empty list.
    async fn get(&self, key: &str) -> Result<Vec<Value>>;

    /// Replace the record whose `id` matches `record`'s, or append it.
    /// Returns the updated list.
    async fn save(&self, key: &str, record: Value) -> Result<Vec<Value>>;

    /// Drop every record whose `id` is `id`. Returns the updated list.
    async fn delete(&self, key: &str, id: &str) -> Result<Vec<Value>>;
}

/// Identity of a stored record, if it has one.
#[must_use]
pub fn record_id(record: &Value) -> Option<&str> {
    record.get(ID_FIELD).and_then(Value::as_str)
}

/// Decode a stored collection, degrading to empty on anything unexpected.
fn decode_list(key: &str, raw: Option<&str>) -> Vec<Value> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Array(items)) => items,
        Ok(other) => {
            warn!(key, kind = %json_kind(&other), "stored collection is not an array; treating as empty");
            Vec::new()
        }
        Err(e) => {
            warn!(key, error = %e, "stored collection is not valid JSON; treating as empty");
            Vec::new()
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Insert or replace `record` in `list` by `id`.
fn upsert(list: &mut Vec<Value>, record: Value) {
    let id = record_id(&record).map(str::to_owned);
    let existing = id
        .as_deref()
        .and_then(|id| list.iter().position(|r| record_id(r) == Some(id)));
    match existing {
        Some(idx) => list[idx] = record,
        None => list.push(record),
    }
}

/// [`RecordStore`] backed by [`LocalStorage`].
#[derive(Debug, Clone)]
pub struct LocalRecordStore {
    storage: Arc<LocalStorage>,
}

impl LocalRecordStore {
    /// Wrap a shared storage handle.
    #[must_use]
    pub fn new(storage: Arc<LocalStorage>) -> Self {
        Self { storage }
    }

    fn read(&self, key: &str) -> Result<Vec<Value>> {
        let raw = self.storage.get_item(key)?;
        Ok(decode_list(key, raw.as_deref()))
    }

    fn write(&self, key: &str, list: &[Value]) -> Result<()> {
        let encoded = serde_json::to_string(list)?;
        self.storage.set_item(key, &encoded)
    }
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    async fn get(&self, key: &str) -> Result<Vec<Value>> {
        self.read(key)
    }

    async fn save(&self, key: &str, record: Value) -> Result<Vec<Value>> {
        let mut list = self.read(key)?;
        debug!(key, id = record_id(&record), "saving record");
        upsert(&mut list, record);
        self.write(key, &list)?;
        Ok(list)
    }

    async fn delete(&self, key: &str, id: &str) -> Result<Vec<Value>> {
        let mut list = self.read(key)?;
        let before = list.len();
        list.retain(|r| record_id(r) != Some(id));
        debug!(key, id, removed = before - list.len(), "deleting record");
        self.write(key, &list)?;
        Ok(list)
    }
}

/// Typed view over one collection.
///
/// Records that no longer decode as `T` are skipped when reading, so one bad
/// entry never hides the rest of the collection.
pub struct Collection<T> {
    store: Arc<dyn RecordStore>,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> std::fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection").field("key", &self.key).finish()
    }
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            key: self.key,
            _marker: PhantomData,
        }
    }
}

impl<T> Collection<T>
where
    T: Serialize + DeserializeOwned,
{
    /// View the collection stored under `key`.
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, key: &'static str) -> Self {
        Self {
            store,
            key,
            _marker: PhantomData,
        }
    }

    /// Storage key of this collection.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// All decodable records, in storage order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    pub async fn all(&self) -> Result<Vec<T>> {
        let raw = self.store.get(self.key).await?;
        Ok(self.decode_all(raw))
    }

    /// Find a record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    pub async fn find(&self, id: &str) -> Result<Option<T>> {
        let raw = self.store.get(self.key).await?;
        Ok(raw
            .into_iter()
            .find(|r| record_id(r) == Some(id))
            .and_then(|r| self.decode(r)))
    }

    /// Upsert `record`, returning the updated collection.
    ///
    /// # Errors
    ///
    /// Returns an error if `record` does not serialize to an object with a
    /// string `id`, or if the backing store fails.
    pub async fn save(&self, record: &T) -> Result<Vec<T>> {
        let value = serde_json::to_value(record)?;
        if record_id(&value).is_none() {
            return Err(Error::internal(format!(
                "record for '{}' has no string id",
                self.key
            )));
        }
        let raw = self.store.save(self.key, value).await?;
        Ok(self.decode_all(raw))
    }

    /// Delete by id, returning the updated collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    pub async fn delete(&self, id: &str) -> Result<Vec<T>> {
        let raw = self.store.delete(self.key, id).await?;
        Ok(self.decode_all(raw))
    }

    /// Delete by id. Returns whether any stored record carried that id,
    /// including records that no longer decode as `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    pub async fn remove(&self, id: &str) -> Result<bool> {
        let before = self.store.get(self.key).await?.len();
        let after = self.store.delete(self.key, id).await?.len();
        Ok(after < before)
    }

    fn decode_all(&self, raw: Vec<Value>) -> Vec<T> {
        raw.into_iter().filter_map(|r| self.decode(r)).collect()
    }

    fn decode(&self, raw: Value) -> Option<T> {
        let id = record_id(&raw).map(str::to_owned);
        match serde_json::from_value(raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(key = self.key, id = id.as_deref(), error = %e, "skipping undecodable record");
                None
            }
        }
    }
}
