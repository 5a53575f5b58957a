//! Durable persistence of the history stacks

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{HistoryError, Stack};
use crate::history::History;
use crate::record::OperationRecord;

/// File name used when no other location is configured
pub const DEFAULT_HISTORY_FILE: &str = "operation_history.json";

/// Backing storage for a [`History`]
pub trait HistoryStore {
    /// Read the persisted history.
    ///
    /// Returns `Ok(None)` when nothing has been persisted yet.
    fn try_load(&self) -> Result<Option<History>, HistoryError>;

    /// Replace the persisted history with `history`, in full
    fn save(&self, history: &History) -> Result<(), HistoryError>;

    /// Read the persisted history, never failing.
    ///
    /// An unreadable store is reported and treated as empty.
    fn load(&self) -> History {
        match self.try_load() {
            Ok(Some(history)) => history,
            Ok(None) => History::new(),
            Err(e) => {
                warn!(error = %e, "history unreadable, starting with an empty history");
                History::new()
            }
        }
    }
}

#[derive(Serialize)]
struct PersistedHistory<'a> {
    undo_stack: &'a [OperationRecord],
    redo_stack: &'a [OperationRecord],
}

/// Top-level document as read; each stack is checked on its own
#[derive(Deserialize)]
struct RawHistory {
    #[serde(default)]
    undo_stack: Option<Value>,
    #[serde(default)]
    redo_stack: Option<Value>,
}

/// JSON file store, replaced atomically on every save
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where a corrupt history file is preserved before it gets overwritten
    pub fn corrupt_copy_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| DEFAULT_HISTORY_FILE.into());
        name.push(".corrupt");
        self.path.with_file_name(name)
    }

    /// Parse a persisted document
    pub fn parse(&self, contents: &str) -> Result<History, HistoryError> {
        let value: Value = serde_json::from_str(contents)
            .map_err(|e| HistoryError::store_corrupt(&self.path, e.to_string()))?;
        if !value.is_object() {
            return Err(HistoryError::store_corrupt(
                &self.path,
                "top level is not an object",
            ));
        }
        let raw: RawHistory = serde_json::from_value(value)
            .map_err(|e| HistoryError::store_corrupt(&self.path, e.to_string()))?;

        Ok(History::from_stacks(
            decode_stack(raw.undo_stack, Stack::Undo),
            decode_stack(raw.redo_stack, Stack::Redo),
        ))
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = format!(
            ".tmp-{}-{}",
            Uuid::new_v4(),
            self.path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(DEFAULT_HISTORY_FILE)
        );
        self.path.with_file_name(file_name)
    }

    fn write_atomic(&self, contents: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.temp_path();
        let written = File::create(&temp_path).and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        });
        let result = written.and_then(|_| fs::rename(&temp_path, &self.path));
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result
    }
}

impl HistoryStore for JsonFileStore {
    fn try_load(&self) -> Result<Option<History>, HistoryError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(HistoryError::store_corrupt(&self.path, e.to_string())),
        };
        let history = self.parse(&contents)?;
        debug!(
            path = %self.path.display(),
            undo = history.undoable_count(),
            redo = history.redoable_count(),
            "history loaded"
        );
        Ok(Some(history))
    }

    fn save(&self, history: &History) -> Result<(), HistoryError> {
        let document = PersistedHistory {
            undo_stack: history.undo_stack(),
            redo_stack: history.redo_stack(),
        };
        let contents = serde_json::to_vec_pretty(&document)?;
        self.write_atomic(&contents)
            .map_err(|e| HistoryError::store_unwritable(&self.path, e))?;
        debug!(path = %self.path.display(), "history saved");
        Ok(())
    }

    fn load(&self) -> History {
        match self.try_load() {
            Ok(Some(history)) => history,
            Ok(None) => History::new(),
            Err(e) => {
                let copy = self.corrupt_copy_path();
                match fs::copy(&self.path, &copy) {
                    Ok(_) => warn!(
                        error = %e,
                        preserved = %copy.display(),
                        "history unreadable, starting with an empty history"
                    ),
                    Err(copy_err) => warn!(
                        error = %e,
                        copy_error = %copy_err,
                        "history unreadable and could not be preserved, starting with an empty history"
                    ),
                }
                History::new()
            }
        }
    }
}

fn decode_stack(value: Option<Value>, stack: Stack) -> Vec<OperationRecord> {
    let values = match value {
        Some(Value::Array(values)) => values,
        None => Vec::new(),
        Some(other) => {
            warn!(%stack, found = %other, "history stack is not a list, treating it as empty");
            Vec::new()
        }
    };
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match OperationRecord::decode(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(%stack, index, error = %e, "skipping history record");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonFileStore {
        JsonFileStore::new(dir.path().join(DEFAULT_HISTORY_FILE))
    }

    fn sample_history() -> History {
        History::from_stacks(
            vec![
                OperationRecord::rename("img1.png", "photo_1.png"),
                OperationRecord::create_batch(["10_", "20_", "30_"]),
            ],
            vec![OperationRecord::delete_batch(["a", "b"])],
        )
    }

    #[test]
    fn test_load_absent_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.try_load().unwrap().is_none());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let history = sample_history();

        store.save(&history).unwrap();
        assert_eq!(store.load(), history);
    }

    #[test]
    fn test_save_overwrites_previous_state() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&sample_history()).unwrap();
        store.save(&History::new()).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&sample_history()).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![DEFAULT_HISTORY_FILE.to_string()]);
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("history.json"));
        store.save(&sample_history()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_persisted_layout() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&sample_history()).unwrap();

        let value: Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(value["undo_stack"][0]["type"], "rename");
        assert_eq!(value["undo_stack"][0]["old"], "img1.png");
        assert_eq!(value["undo_stack"][1]["folders"][2], "30_");
        assert_eq!(value["redo_stack"][0]["type"], "delete");
    }

    #[test]
    fn test_unicode_names_written_verbatim() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let history = History::from_stacks(vec![OperationRecord::rename("写真.png", "photo.png")], vec![]);
        store.save(&history).unwrap();

        assert!(fs::read_to_string(store.path()).unwrap().contains("写真.png"));
        assert_eq!(store.load(), history);
    }

    #[test]
    fn test_missing_keys_are_empty_stacks() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"undo_stack": [{"type": "create", "folders": ["10_"]}], "version": 3}"#,
        )
        .unwrap();

        let history = store.load();
        assert_eq!(history.undo_stack(), &[OperationRecord::create_batch(["10_"])]);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_unknown_records_are_skipped() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{
                "undo_stack": [
                    {"type": "rename", "old": "a", "new": "b"},
                    {"type": "chmod", "mode": 755},
                    ["c", "d"]
                ],
                "redo_stack": []
            }"#,
        )
        .unwrap();

        let history = store.try_load().unwrap().unwrap();
        assert_eq!(
            history.undo_stack(),
            &[
                OperationRecord::rename("a", "b"),
                OperationRecord::rename("c", "d"),
            ]
        );
    }

    #[test]
    fn test_non_list_stack_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{"undo_stack": [{"type": "create", "folders": ["10_"]}], "redo_stack": null}"#,
        )
        .unwrap();

        let history = store.try_load().unwrap().unwrap();
        assert_eq!(history.undo_stack(), &[OperationRecord::create_batch(["10_"])]);
        assert!(!history.can_redo());

        fs::write(
            store.path(),
            r#"{"undo_stack": {"type": "rename"}, "redo_stack": [["a", "b"]]}"#,
        )
        .unwrap();

        let history = store.try_load().unwrap().unwrap();
        assert!(!history.can_undo());
        assert_eq!(history.redo_stack(), &[OperationRecord::rename("a", "b")]);
        assert!(!store.corrupt_copy_path().exists());
    }

    #[test]
    fn test_records_naming_other_directories_are_skipped() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"{
                "undo_stack": [
                    {"type": "rename", "old": "a", "new": "b"},
                    {"type": "rename", "old": "secret.txt", "new": "../escaped.txt"},
                    {"type": "delete", "folders": ["/tmp"]}
                ],
                "redo_stack": [["x", "sub/y"]]
            }"#,
        )
        .unwrap();

        let history = store.try_load().unwrap().unwrap();
        assert_eq!(history.undo_stack(), &[OperationRecord::rename("a", "b")]);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ not json").unwrap();

        assert!(matches!(
            store.try_load(),
            Err(HistoryError::StoreCorrupt { .. })
        ));
        assert!(store.load().is_empty());
        assert_eq!(
            fs::read_to_string(store.corrupt_copy_path()).unwrap(),
            "{ not json"
        );
    }

    #[test]
    fn test_non_object_document_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "[[], []]").unwrap();
        assert!(matches!(
            store.try_load(),
            Err(HistoryError::StoreCorrupt { .. })
        ));
    }

    #[test]
    fn test_save_to_unwritable_location() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();
        let store = JsonFileStore::new(blocker.join("history.json"));

        let result = store.save(&sample_history());
        assert!(matches!(result, Err(HistoryError::StoreUnwritable { .. })));
    }

    #[test]
    fn test_corrupt_copy_path() {
        let store = JsonFileStore::new("/tmp/x/operation_history.json");
        assert_eq!(
            store.corrupt_copy_path(),
            PathBuf::from("/tmp/x/operation_history.json.corrupt")
        );
    }
}
