//! Library tree walker
//!
//! Lists the library root with an explicit stack of open directory listings.
//! Whether a listed entry is emitted as a track or descended into is decided
//! by a [`LeafClassifier`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::error::{Result, SelectError};
use crate::core::paths::make_relative;

/// A listed directory entry, as seen by a classifier
pub struct Entry<'a> {
    name: &'a str,
    path: &'a Path,
    dir_entry: &'a fs::DirEntry,
}

impl<'a> Entry<'a> {
    pub fn name(&self) -> &str {
        self.name
    }

    pub fn path(&self) -> &Path {
        self.path
    }

    /// File type of the entry, without following symlinks
    pub fn file_type(&self) -> std::io::Result<fs::FileType> {
        self.dir_entry.file_type()
    }
}

/// Decides whether an entry is a leaf (emitted) or a container (descended)
pub trait LeafClassifier {
    fn is_leaf(&self, entry: &Entry<'_>) -> bool;
}

/// Lexical classification: a name containing `.` is a file.
///
/// Known hazards: a directory such as `Artist.2020` is emitted as a single
/// leaf and its contents are never listed, and a file without an extension is
/// treated as a directory, which makes the walk fail when it is listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameHeuristic;

impl LeafClassifier for NameHeuristic {
    fn is_leaf(&self, entry: &Entry<'_>) -> bool {
        entry.name().contains('.')
    }
}

/// Classification from the entry's file type: anything but a directory is a leaf
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTypeClassifier;

impl LeafClassifier for FileTypeClassifier {
    fn is_leaf(&self, entry: &Entry<'_>) -> bool {
        let is_dir = match entry.file_type() {
            Ok(ft) if ft.is_symlink() => entry.path().is_dir(),
            Ok(ft) => ft.is_dir(),
            Err(_) => false,
        };
        !is_dir
    }
}

/// Classifier selection exposed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Classify {
    #[default]
    Name,
    Metadata,
}

impl Classify {
    pub fn classifier(self) -> Box<dyn LeafClassifier> {
        match self {
            Classify::Name => Box::new(NameHeuristic),
            Classify::Metadata => Box::new(FileTypeClassifier),
        }
    }
}

impl std::str::FromStr for Classify {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name" => Ok(Classify::Name),
            "metadata" | "meta" => Ok(Classify::Metadata),
            _ => Err(format!("Unknown classifier: {}", s)),
        }
    }
}

/// Collect every leaf path under `root`, relative to it and `/`-separated.
///
/// Entries come out in directory-listing order, each directory's contents
/// in place of the directory itself. The first directory that cannot be
/// listed aborts the walk. Entries whose names are not valid UTF-8 are
/// skipped with a warning.
pub fn walk(root: &Path, classifier: &dyn LeafClassifier) -> Result<Vec<String>> {
    let mut candidates = Vec::new();
    let mut open: Vec<(PathBuf, fs::ReadDir)> = vec![list(root)?];
    let mut listed = 1usize;

    loop {
        let next = match open.last_mut() {
            Some((dir, entries)) => entries
                .next()
                .map(|e| e.map_err(|err| SelectError::traversal(dir.as_path(), err))),
            None => break,
        };

        let dir_entry = match next {
            Some(dir_entry) => dir_entry?,
            None => {
                open.pop();
                continue;
            }
        };

        let path = dir_entry.path();
        let name = match dir_entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                warn!(
                    path = %path.display(),
                    name = ?raw,
                    "skipping entry with a non-UTF-8 name"
                );
                continue;
            }
        };

        let entry = Entry {
            name: &name,
            path: &path,
            dir_entry: &dir_entry,
        };

        if classifier.is_leaf(&entry) {
            if let Some(relative) = make_relative(&path, root) {
                candidates.push(relative);
            }
        } else {
            open.push(list(&path)?);
            listed += 1;
        }
    }

    debug!(
        root = %root.display(),
        directories = listed,
        candidates = candidates.len(),
        "walked library"
    );

    Ok(candidates)
}

fn list(dir: &Path) -> Result<(PathBuf, fs::ReadDir)> {
    let entries = fs::read_dir(dir).map_err(|e| SelectError::traversal(dir, e))?;
    Ok((dir.to_path_buf(), entries))
}
