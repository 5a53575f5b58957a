//! Directory listing, name matching and name generation

use std::fs;
use std::io;
use std::path::Path;

use regex::Regex;
use tracing::warn;

use crate::error::HistoryError;

/// Spacing between generated folder prefixes
pub const FOLDER_STEP: usize = 10;

/// Fail with `DirectoryNotFound` unless `dir` is an existing directory
pub fn ensure_directory(dir: &Path) -> Result<(), HistoryError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        _ => Err(HistoryError::DirectoryNotFound(dir.to_path_buf())),
    }
}

fn read_names(dir: &Path, only_dirs: bool) -> Result<Vec<String>, HistoryError> {
    let entries = fs::read_dir(dir).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => HistoryError::DirectoryNotFound(dir.to_path_buf()),
        _ => HistoryError::Io(e),
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if only_dirs && !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!(name = ?raw, "skipping entry with a non UTF-8 name"),
        }
    }
    names.sort();
    Ok(names)
}

/// Names of all direct entries of `dir`, sorted
pub fn list_entries(dir: &Path) -> Result<Vec<String>, HistoryError> {
    read_names(dir, false)
}

/// Names of the direct subdirectories of `dir`, sorted.
///
/// Symlinks are not followed.
pub fn subdirectories(dir: &Path) -> Result<Vec<String>, HistoryError> {
    read_names(dir, true)
}

/// A compiled rename rule
#[derive(Debug, Clone)]
pub struct RenamePattern {
    regex: Regex,
    replacement: String,
}

impl RenamePattern {
    /// Compile `pattern`; `replacement` may use `$1`/`${name}` group references
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, HistoryError> {
        Ok(RenamePattern {
            regex: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// Whether `name` contains a match
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// New name for `name`, or `None` when it does not match or would not change
    pub fn new_name(&self, name: &str) -> Option<String> {
        if !self.matches(name) {
            return None;
        }
        let renamed = self.regex.replace_all(name, self.replacement.as_str());
        (renamed != name).then(|| renamed.into_owned())
    }
}

/// `count` folder names spaced by [`FOLDER_STEP`]: `10_`, `20_`, ...
pub fn numbered_folder_names(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("{}_", i * FOLDER_STEP)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_numbered_folder_names() {
        assert_eq!(numbered_folder_names(3), vec!["10_", "20_", "30_"]);
        assert!(numbered_folder_names(0).is_empty());
    }

    #[test]
    fn test_rename_pattern_with_groups() {
        let pattern = RenamePattern::new(r"img(\d+)\.png", "photo_$1.png").unwrap();
        assert_eq!(pattern.new_name("img1.png"), Some("photo_1.png".to_string()));
        assert_eq!(pattern.new_name("img22.png"), Some("photo_22.png".to_string()));
        assert_eq!(pattern.new_name("note.txt"), None);
    }

    #[test]
    fn test_rename_pattern_replaces_every_occurrence() {
        let pattern = RenamePattern::new("-", "_").unwrap();
        assert_eq!(pattern.new_name("a-b-c.txt"), Some("a_b_c.txt".to_string()));
    }

    #[test]
    fn test_rename_pattern_unchanged_name() {
        let pattern = RenamePattern::new("a", "a").unwrap();
        assert!(pattern.matches("abc"));
        assert_eq!(pattern.new_name("abc"), None);
    }

    #[test]
    fn test_rename_pattern_invalid() {
        let result = RenamePattern::new("img(", "x");
        assert!(matches!(result, Err(HistoryError::InvalidPattern(_))));
    }

    #[test]
    fn test_list_entries_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::create_dir(dir.path().join("c")).unwrap();

        assert_eq!(list_entries(dir.path()).unwrap(), vec!["a.txt", "b.txt", "c"]);
    }

    #[test]
    fn test_subdirectories_only() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();
        fs::create_dir(dir.path().join("a").join("nested")).unwrap();
        fs::write(dir.path().join("f.txt"), "").unwrap();

        assert_eq!(subdirectories(dir.path()).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        assert!(matches!(
            list_entries(&missing),
            Err(HistoryError::DirectoryNotFound(_))
        ));
        assert!(matches!(
            ensure_directory(&missing),
            Err(HistoryError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_ensure_directory_rejects_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("f.txt");
        fs::write(&file, "").unwrap();
        assert!(ensure_directory(&file).is_err());
        assert!(ensure_directory(dir.path()).is_ok());
    }
}
