//! Path normalization utilities
//!
//! Track paths are kept relative to the library root with '/' as separator.

use std::path::{Path, PathBuf};

/// Directory name of the default library under the home directory
pub const DEFAULT_LIBRARY_DIR: &str = "Music";

/// Normalize a path to use '/' as separator (for cross-platform consistency)
pub fn normalize_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Make a path relative to the root directory
pub fn make_relative(path: &Path, root: &Path) -> Option<String> {
    path.strip_prefix(root).ok().map(normalize_path)
}

/// Join a '/'-separated relative path onto a base directory
pub fn join_normalized(base: &Path, relative: &str) -> PathBuf {
    base.join(relative.replace('/', std::path::MAIN_SEPARATOR_STR))
}

/// `~/Music`, when the home directory is known
pub fn default_library_root() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(DEFAULT_LIBRARY_DIR))
}
