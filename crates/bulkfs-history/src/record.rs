//! Operation records and their persisted shape

use std::fmt;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Tags understood by [`OperationRecord::decode`]
const KNOWN_TAGS: &[&str] = &["rename", "create", "delete"];

/// One completed, reversible filesystem mutation.
///
/// Names are entry names relative to the target directory at operation time,
/// never full paths. The inverse action is derived from the record when it is
/// replayed and is never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OperationRecord {
    /// An entry was renamed from `old` to `new`
    Rename {
        /// Name before the rename
        old: String,
        /// Name after the rename
        new: String,
    },
    /// Folders created by one invocation, in creation order
    #[serde(rename = "create")]
    CreateBatch {
        /// Folder names
        #[serde(default)]
        folders: Vec<String>,
    },
    /// Folders deleted by one invocation, in deletion order
    #[serde(rename = "delete")]
    DeleteBatch {
        /// Folder names
        #[serde(default)]
        folders: Vec<String>,
    },
}

/// Why a persisted record could not be turned into an [`OperationRecord`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordDecodeError {
    /// The `type` tag names an operation this version does not know
    #[error("unknown record type '{0}'")]
    UnknownType(String),

    /// The value does not have the shape of any record
    #[error("malformed record: {0}")]
    Malformed(String),

    /// A name is not a single entry of the target directory
    #[error("'{0}' is not a plain entry name")]
    InvalidName(String),
}

/// Whether `name` names a direct entry of a directory.
///
/// Empty names, `.`, `..` and anything holding a path separator are rejected.
pub fn is_entry_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => part == name,
        _ => false,
    }
}

#[derive(Deserialize)]
struct UntaggedRename {
    old: String,
    new: String,
}

impl OperationRecord {
    /// Create a rename record
    pub fn rename(old: impl Into<String>, new: impl Into<String>) -> Self {
        Self::Rename {
            old: old.into(),
            new: new.into(),
        }
    }

    /// Create a folder-creation record
    pub fn create_batch<I, T>(folders: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::CreateBatch {
            folders: folders.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a folder-deletion record
    pub fn delete_batch<I, T>(folders: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::DeleteBatch {
            folders: folders.into_iter().map(Into::into).collect(),
        }
    }

    /// Persisted tag of this record
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Rename { .. } => "rename",
            Self::CreateBatch { .. } => "create",
            Self::DeleteBatch { .. } => "delete",
        }
    }

    /// Whether this record groups several items
    pub fn is_batch(&self) -> bool {
        !matches!(self, Self::Rename { .. })
    }

    /// Every entry name the record refers to
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Rename { old, new } => vec![old.as_str(), new.as_str()],
            Self::CreateBatch { folders } | Self::DeleteBatch { folders } => {
                folders.iter().map(String::as_str).collect()
            }
        }
    }

    fn validated(self) -> Result<Self, RecordDecodeError> {
        let invalid = self
            .names()
            .into_iter()
            .find(|name| !is_entry_name(name))
            .map(str::to_string);
        match invalid {
            Some(name) => Err(RecordDecodeError::InvalidName(name)),
            None => Ok(self),
        }
    }

    /// Decode one persisted record.
    ///
    /// Accepts the tagged object written by this crate, plus the older rename
    /// shapes: a two-element array `["old", "new"]` and an untagged
    /// `{"old": .., "new": ..}` object. Unknown fields are ignored. A record
    /// naming anything other than a direct entry is rejected.
    pub fn decode(value: Value) -> Result<Self, RecordDecodeError> {
        Self::decode_shape(value)?.validated()
    }

    fn decode_shape(value: Value) -> Result<Self, RecordDecodeError> {
        match value {
            Value::Array(items) => match <[String; 2]>::deserialize(Value::Array(items)) {
                Ok([old, new]) => Ok(Self::Rename { old, new }),
                Err(e) => Err(RecordDecodeError::Malformed(e.to_string())),
            },
            Value::Object(map) => {
                let tag = match map.get("type") {
                    Some(Value::String(tag)) => Some(tag.clone()),
                    Some(other) => {
                        return Err(RecordDecodeError::Malformed(format!(
                            "type tag must be a string, found {}",
                            other
                        )))
                    }
                    None => None,
                };

                match tag {
                    Some(tag) if KNOWN_TAGS.contains(&tag.as_str()) => {
                        serde_json::from_value(Value::Object(map))
                            .map_err(|e| RecordDecodeError::Malformed(e.to_string()))
                    }
                    Some(tag) => Err(RecordDecodeError::UnknownType(tag)),
                    None => serde_json::from_value::<UntaggedRename>(Value::Object(map))
                        .map(|r| Self::Rename {
                            old: r.old,
                            new: r.new,
                        })
                        .map_err(|e| RecordDecodeError::Malformed(e.to_string())),
                }
            }
            other => Err(RecordDecodeError::Malformed(format!(
                "expected an object or a pair, found {}",
                other
            ))),
        }
    }
}

impl fmt::Display for OperationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rename { old, new } => write!(f, "rename {} -> {}", old, new),
            Self::CreateBatch { folders } => write!(f, "create [{}]", folders.join(", ")),
            Self::DeleteBatch { folders } => write!(f, "delete [{}]", folders.join(", ")),
        }
    }
}
