//! Selection pipeline: walk -> match -> order

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::Result;
use super::order::{order, OrderOptions};
use super::query::{normalize_candidate, Query};
use super::walk::{walk, Classify};

/// Everything needed to compute a selection
#[derive(Debug, Clone)]
pub struct SelectRequest {
    pub root: PathBuf,
    pub terms: Vec<String>,
    pub options: OrderOptions,
    pub classify: Classify,
}

impl SelectRequest {
    pub fn new(root: impl Into<PathBuf>, terms: Vec<String>) -> Self {
        Self {
            root: root.into(),
            terms,
            options: OrderOptions::default(),
            classify: Classify::default(),
        }
    }

    pub fn with_options(mut self, options: OrderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_classify(mut self, classify: Classify) -> Self {
        self.classify = classify;
        self
    }
}

/// The final, ordered list of root-relative paths
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub paths: Vec<String>,
    /// Modification times from the recency sort, parallel to `paths`;
    /// empty when the selection was not sorted by recency
    pub mtimes: Vec<i64>,
    /// Matched paths left out because they vanished before ordering
    pub skipped: Vec<String>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Modification time of the `index`th path, when it was read
    pub fn mtime(&self, index: usize) -> Option<i64> {
        self.mtimes.get(index).copied()
    }

    /// Absolute paths for handing to a player
    pub fn absolute_paths(&self, root: &Path) -> Vec<PathBuf> {
        self.paths
            .iter()
            .map(|p| crate::core::paths::join_normalized(root, p))
            .collect()
    }
}

/// Run the whole selection for `request`.
///
/// A traversal failure aborts with no partial result. Zero matches is an
/// empty selection, not an error.
pub fn select(request: &SelectRequest) -> Result<Selection> {
    let classifier = request.classify.classifier();
    let candidates = walk(&request.root, classifier.as_ref())?;
    let total = candidates.len();

    let query = Query::parse(&request.terms);
    let matched: Vec<String> = candidates
        .into_iter()
        .filter(|p| query.matches(&normalize_candidate(p)))
        .collect();

    debug!(candidates = total, matched = matched.len(), "matched query");

    if matched.is_empty() {
        return Ok(Selection::default());
    }

    let ordered = order(&request.root, matched, &request.options);

    Ok(Selection {
        paths: ordered.paths,
        mtimes: ordered.mtimes,
        skipped: ordered.skipped,
    })
}
