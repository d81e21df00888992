//! Typed CRUD over whole collections.
//!
//! A [`Repository`] borrows the storage port for the duration of one call
//! sequence. Each mutating call re-reads the collection, changes it in
//! memory and writes the entire collection back.

mod attendance;
mod fees;
mod marks;
mod notices;
mod students;

use chrono::Utc;
use serde_json::{Map, Value};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::models::{Fields, Record};
use crate::store::{read_collection, write_collection, KeyValueStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Keys a patch may never overwrite.
const IMMUTABLE_KEYS: &[&str] = &["id", "createdAt"];

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Shallow merge: each top-level key of `patch` replaces the stored value.
/// The result must still be a valid `F`.
pub fn merge_record<F: Fields>(
    existing: &Record<F>,
    patch: &Map<String, Value>,
) -> Result<Record<F>, RepoError> {
    let mut obj = match serde_json::to_value(existing) {
        Ok(Value::Object(obj)) => obj,
        Ok(_) => return Err(RepoError::Validation("entity is not an object".to_string())),
        Err(e) => return Err(RepoError::Validation(e.to_string())),
    };
    for (key, value) in patch {
        if IMMUTABLE_KEYS.contains(&key.as_str()) {
            continue;
        }
        obj.insert(key.clone(), value.clone());
    }
    let merged: Record<F> = serde_json::from_value(Value::Object(obj))
        .map_err(|e| RepoError::Validation(e.to_string()))?;
    merged.fields.validate().map_err(RepoError::Validation)?;
    Ok(merged)
}

fn fields_as_patch<F: Fields>(fields: &F) -> Result<Map<String, Value>, RepoError> {
    match serde_json::to_value(fields) {
        Ok(Value::Object(obj)) => Ok(obj),
        Ok(_) => Err(RepoError::Validation("fields are not an object".to_string())),
        Err(e) => Err(RepoError::Validation(e.to_string())),
    }
}

pub struct Repository<'s, F> {
    store: &'s mut dyn KeyValueStore,
    _fields: PhantomData<F>,
}

impl<'s, F: Fields> Repository<'s, F> {
    pub fn new(store: &'s mut dyn KeyValueStore) -> Self {
        Self {
            store,
            _fields: PhantomData,
        }
    }

    pub fn list_all(&self) -> Result<Vec<Record<F>>, StoreError> {
        read_collection(&*self.store, F::COLLECTION)
    }

    pub fn find<P>(&self, pred: P) -> Result<Vec<Record<F>>, StoreError>
    where
        P: Fn(&Record<F>) -> bool,
    {
        Ok(self.list_all()?.into_iter().filter(|r| pred(r)).collect())
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Record<F>>, StoreError> {
        Ok(self.list_all()?.into_iter().find(|r| r.id == id))
    }

    fn save(&mut self, records: &[Record<F>]) -> Result<(), StoreError> {
        write_collection(&mut *self.store, F::COLLECTION, records)
    }

    pub fn create(&mut self, fields: F) -> Result<Record<F>, RepoError> {
        fields.validate().map_err(RepoError::Validation)?;
        let mut records = self.list_all()?;
        let record = Record {
            id: new_id(),
            fields,
            created_at: Some(Utc::now()),
        };
        records.push(record.clone());
        self.save(&records)?;
        tracing::debug!(collection = F::COLLECTION.key(), id = %record.id, "created");
        Ok(record)
    }

    pub fn update(
        &mut self,
        id: &str,
        patch: &Map<String, Value>,
    ) -> Result<Option<Record<F>>, RepoError> {
        let mut records = self.list_all()?;
        let Some(idx) = records.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        let merged = merge_record(&records[idx], patch)?;
        records[idx] = merged.clone();
        self.save(&records)?;
        tracing::debug!(collection = F::COLLECTION.key(), id, "updated");
        Ok(Some(merged))
    }

    /// Removing a missing id still rewrites the collection and reports success.
    pub fn delete(&mut self, id: &str) -> Result<bool, StoreError> {
        let mut records = self.list_all()?;
        let before = records.len();
        records.retain(|r| r.id != id);
        self.save(&records)?;
        tracing::debug!(
            collection = F::COLLECTION.key(),
            id,
            removed = before - records.len(),
            "deleted"
        );
        Ok(true)
    }

    /// Create-or-merge keyed by a natural key instead of the generated id.
    /// A match is merged in place (last write wins); otherwise a new record
    /// is appended.
    pub fn upsert_by<K>(&mut self, fields: F, same_key: K) -> Result<Record<F>, RepoError>
    where
        K: Fn(&F, &F) -> bool,
    {
        fields.validate().map_err(RepoError::Validation)?;
        let mut records = self.list_all()?;
        let record = match records.iter().position(|r| same_key(&r.fields, &fields)) {
            Some(idx) => {
                let merged = merge_record(&records[idx], &fields_as_patch(&fields)?)?;
                records[idx] = merged.clone();
                merged
            }
            None => {
                let record = Record {
                    id: new_id(),
                    fields,
                    created_at: Some(Utc::now()),
                };
                records.push(record.clone());
                record
            }
        };
        self.save(&records)?;
        Ok(record)
    }

    /// Replaces one record by id without merge semantics. `None` when absent.
    fn replace_with<M>(&mut self, id: &str, change: M) -> Result<Option<Record<F>>, StoreError>
    where
        M: FnOnce(&mut Record<F>) -> bool,
    {
        let mut records = self.list_all()?;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        let changed = change(record);
        let out = record.clone();
        if changed {
            self.save(&records)?;
        }
        Ok(Some(out))
    }
}

/// Rounded mean, 0 for an empty set.
pub(crate) fn rounded_mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, n) = values
        .into_iter()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        return 0.0;
    }
    (sum / n as f64).round()
}
