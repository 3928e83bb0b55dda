//! Result model
//!
//! Every command maps what it produced to a [`ResultSet`] before rendering.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::paths::make_relative;
use crate::select::{SelectError, Selection};

/// The kind of result item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// A selected track
    Track,
    /// A matched track dropped because it vanished before ordering
    Skipped,
    /// An external tool status line (doctor)
    Tool,
    /// A failure that aborted the command
    Error,
}

/// Metadata for a result item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Modification time in milliseconds since epoch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime_ms: Option<i64>,
}

/// Error information for a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickError {
    pub code: String,
    pub message: String,
}

impl PickError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultItem {
    pub kind: Kind,

    /// Path relative to the library root, using '/' as separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Free-form text (tool status lines)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,

    #[serde(default)]
    pub meta: Meta,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<PickError>,
}

impl ResultItem {
    pub fn track(path: impl Into<String>) -> Self {
        Self {
            kind: Kind::Track,
            path: Some(path.into()),
            excerpt: None,
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    pub fn skipped(path: impl Into<String>) -> Self {
        Self {
            kind: Kind::Skipped,
            path: Some(path.into()),
            excerpt: None,
            meta: Meta::default(),
            errors: vec![PickError::new(
                "TRACK_VANISHED",
                "track disappeared before it could be ordered",
            )],
        }
    }

    pub fn tool(excerpt: impl Into<String>) -> Self {
        Self {
            kind: Kind::Tool,
            path: None,
            excerpt: Some(excerpt.into()),
            meta: Meta::default(),
            errors: Vec::new(),
        }
    }

    pub fn error(error: PickError) -> Self {
        Self {
            kind: Kind::Error,
            path: None,
            excerpt: None,
            meta: Meta::default(),
            errors: vec![error],
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    pub fn with_error(mut self, error: PickError) -> Self {
        self.errors.push(error);
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultSet {
    pub items: Vec<ResultItem>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a result set from a selection, in selection order.
    ///
    /// Modification times are only those the recency sort already read.
    pub fn from_selection(selection: &Selection) -> Self {
        let mut set = ResultSet::new();

        for (index, path) in selection.paths.iter().enumerate() {
            let meta = Meta {
                mtime_ms: selection.mtime(index),
            };
            set.push(ResultItem::track(path.as_str()).with_meta(meta));
        }

        for path in &selection.skipped {
            set.push(ResultItem::skipped(path.as_str()));
        }

        set
    }

    /// A single error item for a selection that could not be computed
    pub fn from_select_error(error: &SelectError, root: &Path) -> Self {
        let message = match std::error::Error::source(error) {
            Some(source) => format!("{}: {}", error, source),
            None => error.to_string(),
        };

        let mut item = ResultItem::error(PickError::new(error.code(), message));
        item.path = make_relative(error.path(), root).filter(|p| !p.is_empty());

        std::iter::once(item).collect()
    }

    pub fn push(&mut self, item: ResultItem) {
        self.items.push(item);
    }

    /// Number of selected tracks
    pub fn track_count(&self) -> usize {
        self.items.iter().filter(|i| i.kind == Kind::Track).count()
    }
}

impl FromIterator<ResultItem> for ResultSet {
    fn from_iter<T: IntoIterator<Item = ResultItem>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}
