use std::{
    collections::HashMap,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use halo_domain::{Identifiable, Record};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::CoreError;

/// Every record collection the back office persists.
pub const COLLECTIONS: [&str; 10] = [
    "transactions",
    "tasks",
    "employees",
    "payroll_entries",
    "vendors",
    "vendor_transactions",
    "customers",
    "products",
    "invoices",
    "fund_accounts",
];

/// Abstraction over persistence backends holding named record collections and
/// single keyed documents.
pub trait RecordStore: Send + Sync {
    /// Returns an empty list when the collection has never been written.
    fn load_collection(&self, name: &str) -> Result<Vec<Value>, CoreError>;
    /// Replaces the whole collection in one write.
    fn save_collection(&self, name: &str, records: &[Value]) -> Result<(), CoreError>;
    fn load_document(&self, key: &str) -> Result<Option<Value>, CoreError>;
    fn save_document(&self, key: &str, value: &Value) -> Result<(), CoreError>;
}

/// Typed access to [`RecordStore`] collections.
pub struct Records;

impl Records {
    pub fn list<R: Record>(store: &dyn RecordStore) -> Result<Vec<R>, CoreError> {
        store
            .load_collection(R::COLLECTION)?
            .into_iter()
            .map(|value| serde_json::from_value(value).map_err(CoreError::from))
            .collect()
    }

    pub fn get<R: Record>(store: &dyn RecordStore, id: &str) -> Result<Option<R>, CoreError> {
        Ok(Self::list::<R>(store)?
            .into_iter()
            .find(|record| record.id() == id))
    }

    pub fn require<R: Record>(store: &dyn RecordStore, id: &str) -> Result<R, CoreError> {
        Self::get(store, id)?.ok_or_else(|| CoreError::not_found(R::COLLECTION, id))
    }

    /// Newest records are kept first.
    pub fn add<R: Record>(store: &dyn RecordStore, record: R) -> Result<R, CoreError> {
        let mut records = Self::list::<R>(store)?;
        records.insert(0, record.clone());
        Self::replace_all(store, &records)?;
        Ok(record)
    }

    /// Prepends `batch` in a single write; either all records land or none do.
    pub fn add_batch<R: Record>(store: &dyn RecordStore, batch: Vec<R>) -> Result<Vec<R>, CoreError> {
        if batch.is_empty() {
            return Ok(batch);
        }
        let existing = Self::list::<R>(store)?;
        let mut records = batch.clone();
        records.extend(existing);
        Self::replace_all(store, &records)?;
        Ok(batch)
    }

    pub fn update<R, F>(store: &dyn RecordStore, id: &str, change: F) -> Result<R, CoreError>
    where
        R: Record,
        F: FnOnce(&mut R) -> Result<(), CoreError>,
    {
        let mut records = Self::list::<R>(store)?;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| CoreError::not_found(R::COLLECTION, id))?;
        change(record)?;
        let updated = record.clone();
        Self::replace_all(store, &records)?;
        Ok(updated)
    }

    pub fn delete<R: Record>(store: &dyn RecordStore, id: &str) -> Result<R, CoreError> {
        let mut records = Self::list::<R>(store)?;
        let index = records
            .iter()
            .position(|record| record.id() == id)
            .ok_or_else(|| CoreError::not_found(R::COLLECTION, id))?;
        let removed = records.remove(index);
        Self::replace_all(store, &records)?;
        Ok(removed)
    }

    /// Drops every record rejected by `keep`; returns how many were removed.
    pub fn retain<R, F>(store: &dyn RecordStore, keep: F) -> Result<usize, CoreError>
    where
        R: Record,
        F: Fn(&R) -> bool,
    {
        let mut records = Self::list::<R>(store)?;
        let before = records.len();
        records.retain(|record| keep(record));
        let removed = before - records.len();
        if removed > 0 {
            Self::replace_all(store, &records)?;
        }
        Ok(removed)
    }

    pub fn replace_all<R: Record>(store: &dyn RecordStore, records: &[R]) -> Result<(), CoreError> {
        let values = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        store.save_collection(R::COLLECTION, &values)
    }

    pub fn load_document<T: DeserializeOwned>(
        store: &dyn RecordStore,
        key: &str,
    ) -> Result<Option<T>, CoreError> {
        store
            .load_document(key)?
            .map(|value| serde_json::from_value(value).map_err(CoreError::from))
            .transpose()
    }

    pub fn save_document<T: Serialize>(
        store: &dyn RecordStore,
        key: &str,
        document: &T,
    ) -> Result<(), CoreError> {
        store.save_document(key, &serde_json::to_value(document)?)
    }
}

/// Volatile store used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    documents: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, CoreError> {
        lock.read()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
    }

    fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, CoreError> {
        lock.write()
            .map_err(|_| CoreError::Storage("memory store lock poisoned".into()))
    }
}

impl RecordStore for MemoryStore {
    fn load_collection(&self, name: &str) -> Result<Vec<Value>, CoreError> {
        Ok(Self::read(&self.collections)?
            .get(name)
            .cloned()
            .unwrap_or_default())
    }

    fn save_collection(&self, name: &str, records: &[Value]) -> Result<(), CoreError> {
        Self::write(&self.collections)?.insert(name.to_string(), records.to_vec());
        Ok(())
    }

    fn load_document(&self, key: &str) -> Result<Option<Value>, CoreError> {
        Ok(Self::read(&self.documents)?.get(key).cloned())
    }

    fn save_document(&self, key: &str, value: &Value) -> Result<(), CoreError> {
        Self::write(&self.documents)?.insert(key.to_string(), value.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use halo_domain::Employee;
    use rust_decimal_macros::dec;

    fn employee(name: &str) -> Employee {
        Employee::new(name, "Staff", dec!(100), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn add_prepends_newest_record() {
        let store = MemoryStore::new();
        Records::add(&store, employee("First")).unwrap();
        Records::add(&store, employee("Second")).unwrap();
        let listed: Vec<Employee> = Records::list(&store).unwrap();
        assert_eq!(listed[0].name, "Second");
        assert_eq!(listed[1].name, "First");
    }

    #[test]
    fn update_and_delete_report_missing_ids() {
        let store = MemoryStore::new();
        let err = Records::update::<Employee, _>(&store, "nope", |_| Ok(())).unwrap_err();
        assert!(matches!(err, CoreError::NotFound { collection: "employees", .. }));
        assert!(Records::delete::<Employee>(&store, "nope").is_err());
    }

    #[test]
    fn failed_update_leaves_collection_untouched() {
        let store = MemoryStore::new();
        let saved = Records::add(&store, employee("Keep")).unwrap();
        let result = Records::update::<Employee, _>(&store, &saved.id, |emp| {
            emp.name = "Changed".into();
            Err(CoreError::Validation("rejected".into()))
        });
        assert!(result.is_err());
        let reloaded: Employee = Records::require(&store, &saved.id).unwrap();
        assert_eq!(reloaded.name, "Keep");
    }

    #[test]
    fn retain_counts_removed_records() {
        let store = MemoryStore::new();
        Records::add_batch(&store, vec![employee("A"), employee("B"), employee("A")]).unwrap();
        let removed = Records::retain::<Employee, _>(&store, |emp| emp.name != "A").unwrap();
        assert_eq!(removed, 2);
        assert_eq!(Records::list::<Employee>(&store).unwrap().len(), 1);
    }
}
