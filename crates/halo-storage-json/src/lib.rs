use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use halo_core::{storage::COLLECTIONS, CoreError, RecordStore};
use serde_json::Value;

const FILE_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Directory layout for a [`JsonFileStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePaths {
    pub collections_root: PathBuf,
    pub documents_root: PathBuf,
    pub backup_root: PathBuf,
}

impl StoragePaths {
    /// `collections/`, `documents/` and `backups/` beneath `root`.
    pub fn under(root: &Path) -> Self {
        Self {
            collections_root: root.join("collections"),
            documents_root: root.join("documents"),
            backup_root: root.join("backups"),
        }
    }
}

/// Describes one saved snapshot of a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionBackup {
    pub collection: String,
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// Filesystem-backed record store: one JSON array per collection, one JSON
/// value per document. Overwritten collections are copied into a rotating
/// backup directory first.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    paths: StoragePaths,
    retention: usize,
}

impl JsonFileStore {
    pub fn new(paths: StoragePaths) -> Result<Self, CoreError> {
        Self::with_retention(paths, DEFAULT_RETENTION)
    }

    pub fn with_retention(paths: StoragePaths, retention: usize) -> Result<Self, CoreError> {
        fs::create_dir_all(&paths.collections_root)?;
        fs::create_dir_all(&paths.documents_root)?;
        fs::create_dir_all(&paths.backup_root)?;
        Ok(Self {
            paths,
            retention: retention.max(1),
        })
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    pub fn collection_path(&self, name: &str) -> PathBuf {
        self.paths
            .collections_root
            .join(format!("{}.{}", canonical_name(name), FILE_EXTENSION))
    }

    pub fn document_path(&self, key: &str) -> PathBuf {
        self.paths
            .documents_root
            .join(format!("{}.{}", canonical_name(key), FILE_EXTENSION))
    }

    /// Record counts for every known collection that has been written.
    pub fn collection_counts(&self) -> Result<Vec<(String, usize)>, CoreError> {
        let mut counts = Vec::new();
        for name in COLLECTIONS {
            if self.collection_path(name).exists() {
                counts.push((name.to_string(), self.load_collection(name)?.len()));
            }
        }
        Ok(counts)
    }

    /// Newest first.
    pub fn list_backups(&self, name: &str) -> Result<Vec<CollectionBackup>, CoreError> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let collection = canonical_name(name);
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
                entries.push(CollectionBackup {
                    collection: collection.clone(),
                    id: file_name.to_string(),
                    created_at: parse_backup_timestamp(file_name),
                    size_bytes,
                    path: path.clone(),
                });
            }
        }
        entries.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        Ok(entries)
    }

    /// Copies the snapshot over the live collection, backing up the current one.
    pub fn restore_backup(&self, name: &str, backup_id: &str) -> Result<Vec<Value>, CoreError> {
        let backup = self.backup_dir(name).join(backup_id);
        if !backup.exists() {
            return Err(CoreError::Storage(format!("backup `{backup_id}` not found")));
        }
        let records = read_collection(&backup)?;
        self.save_collection(name, &records)?;
        tracing::info!(collection = name, backup = backup_id, "restored collection backup");
        Ok(records)
    }

    pub fn delete_backup(&self, name: &str, backup_id: &str) -> Result<(), CoreError> {
        let path = self.backup_dir(name).join(backup_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.paths.backup_root.join(canonical_name(name))
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<(), CoreError> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        fs::create_dir_all(&dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let file_name = format!("{}_{}.{}", canonical_name(name), timestamp, FILE_EXTENSION);
        fs::copy(path, dir.join(file_name))?;
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<(), CoreError> {
        for entry in self.list_backups(name)?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                tracing::warn!(path = %entry.path.display(), error = %err, "failed to prune backup");
            }
        }
        Ok(())
    }
}

impl RecordStore for JsonFileStore {
    fn load_collection(&self, name: &str) -> Result<Vec<Value>, CoreError> {
        let path = self.collection_path(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_collection(&path)
    }

    fn save_collection(&self, name: &str, records: &[Value]) -> Result<(), CoreError> {
        let path = self.collection_path(name);
        self.backup_existing_file(name, &path)?;
        write_json_atomic(&path, &Value::Array(records.to_vec()))?;
        tracing::debug!(collection = name, records = records.len(), "saved collection");
        Ok(())
    }

    fn load_document(&self, key: &str) -> Result<Option<Value>, CoreError> {
        let path = self.document_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&data)?))
    }

    fn save_document(&self, key: &str, value: &Value) -> Result<(), CoreError> {
        write_json_atomic(&self.document_path(key), value)
    }
}

fn read_collection(path: &Path) -> Result<Vec<Value>, CoreError> {
    let data = fs::read_to_string(path)?;
    match serde_json::from_str(&data)? {
        Value::Array(records) => Ok(records),
        other => Err(CoreError::Storage(format!(
            "{} does not hold a record list (found {})",
            path.display(),
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "collection".into()
    } else {
        sanitized
    }
}

fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", FILE_EXTENSION))?;
    let mut segments = trimmed.rsplit('_');
    let time = segments.next()?;
    let date = segments.next()?;
    if !is_digits(date, 8) || !is_digits(time, 9) {
        return None;
    }
    let raw = format!("{date}{time}");
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S%3f")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_json_atomic(path: &Path, value: &Value) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(value)?;
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names_are_filesystem_safe() {
        assert_eq!(canonical_name("Vendor Transactions"), "vendor_transactions");
        assert_eq!(canonical_name("../.."), "collection");
    }

    #[test]
    fn backup_timestamps_parse_from_file_names() {
        let parsed = parse_backup_timestamp("tasks_20240301_101530250.json").unwrap();
        assert_eq!(parsed.format("%Y-%m-%d %H:%M:%S%.3f").to_string(), "2024-03-01 10:15:30.250");
        assert!(parse_backup_timestamp("tasks_latest.json").is_none());
    }

    #[test]
    fn tmp_path_appends_suffix() {
        let tmp = tmp_path(Path::new("/data/tasks.json"));
        assert_eq!(tmp, PathBuf::from("/data/tasks.json.tmp"));
    }
}
