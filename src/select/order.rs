//! Selection ordering: recency sort and limit

use std::num::NonZeroUsize;
use std::path::Path;

use tracing::warn;

use crate::core::paths::join_normalized;
use crate::core::util::get_mtime_ms;

/// Ordering options for a selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderOptions {
    /// Sort newest first by modification time
    pub recency: bool,
    /// Keep at most this many paths (applied after sorting)
    pub limit: Option<NonZeroUsize>,
}

impl OrderOptions {
    pub fn is_noop(&self) -> bool {
        !self.recency && self.limit.is_none()
    }
}

/// Result of ordering: the kept paths and the ones dropped because they
/// could not be stat'ed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ordered {
    pub paths: Vec<String>,
    /// Modification times read for the recency sort, parallel to `paths`;
    /// empty when no sort was requested
    pub mtimes: Vec<i64>,
    pub skipped: Vec<String>,
}

impl Ordered {
    fn unsorted(paths: Vec<String>) -> Self {
        Self {
            paths,
            ..Self::default()
        }
    }
}

/// Order and truncate matched paths.
///
/// Paths are relative to `root`. With `recency`, a path whose metadata can
/// no longer be read is left out and reported in `skipped`.
pub fn order(root: &Path, candidates: Vec<String>, options: &OrderOptions) -> Ordered {
    if options.is_noop() {
        return Ordered::unsorted(candidates);
    }

    let mut ordered = if options.recency {
        sort_by_recency(root, candidates)
    } else {
        Ordered::unsorted(candidates)
    };

    if let Some(limit) = options.limit {
        ordered.paths.truncate(limit.get());
        ordered.mtimes.truncate(limit.get());
    }

    ordered
}

fn sort_by_recency(root: &Path, candidates: Vec<String>) -> Ordered {
    let stamped = stat_all(root, candidates);

    let mut kept: Vec<(i64, String)> = Vec::with_capacity(stamped.len());
    let mut skipped = Vec::new();

    for (path, mtime) in stamped {
        match mtime {
            Ok(ms) => kept.push((ms, path)),
            Err(e) => {
                warn!(path = %path, error = %e, "skipping track that vanished before stat");
                skipped.push(path);
            }
        }
    }

    // Stable sort keeps listing order between equal timestamps
    kept.sort_by(|a, b| b.0.cmp(&a.0));

    let (mtimes, paths): (Vec<i64>, Vec<String>) = kept.into_iter().unzip();

    Ordered {
        paths,
        mtimes,
        skipped,
    }
}

#[cfg(not(feature = "parallel"))]
fn stat_all(root: &Path, candidates: Vec<String>) -> Vec<(String, std::io::Result<i64>)> {
    candidates
        .into_iter()
        .map(|p| {
            let mtime = get_mtime_ms(&join_normalized(root, &p));
            (p, mtime)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn stat_all(root: &Path, candidates: Vec<String>) -> Vec<(String, std::io::Result<i64>)> {
    use rayon::prelude::*;

    candidates
        .into_par_iter()
        .map(|p| {
            let mtime = get_mtime_ms(&join_normalized(root, &p));
            (p, mtime)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::{Duration, SystemTime};
    use tempfile::tempdir;

    fn track(root: &Path, name: &str, secs: u64) {
        let path = root.join(name);
        let file = File::create(&path).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
            .unwrap();
    }

    fn paths(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_noop_keeps_input_order() {
        let temp = tempdir().unwrap();
        let input = paths(&["b.mp3", "a.mp3", "c.mp3"]);

        let options = OrderOptions::default();
        assert!(options.is_noop());

        let result = order(temp.path(), input.clone(), &options);
        assert_eq!(result.paths, input);
        assert!(result.mtimes.is_empty());
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_limit_keeps_prefix() {
        let temp = tempdir().unwrap();
        let options = OrderOptions {
            recency: false,
            limit: NonZeroUsize::new(2),
        };

        let result = order(temp.path(), paths(&["b.mp3", "a.mp3", "c.mp3"]), &options);
        assert_eq!(result.paths, paths(&["b.mp3", "a.mp3"]));
    }

    #[test]
    fn test_limit_larger_than_input() {
        let temp = tempdir().unwrap();
        let options = OrderOptions {
            recency: false,
            limit: NonZeroUsize::new(10),
        };

        let result = order(temp.path(), paths(&["a.mp3"]), &options);
        assert_eq!(result.paths, paths(&["a.mp3"]));
    }

    #[test]
    fn test_recency_sorts_newest_first() {
        let temp = tempdir().unwrap();
        track(temp.path(), "A.mp3", 3000);
        track(temp.path(), "B.mp3", 1000);
        track(temp.path(), "C.mp3", 2000);

        let options = OrderOptions {
            recency: true,
            limit: None,
        };

        let result = order(temp.path(), paths(&["A.mp3", "B.mp3", "C.mp3"]), &options);
        assert_eq!(result.paths, paths(&["A.mp3", "C.mp3", "B.mp3"]));
    }

    #[test]
    fn test_recency_then_limit() {
        let temp = tempdir().unwrap();
        track(temp.path(), "A.mp3", 3000);
        track(temp.path(), "B.mp3", 1000);
        track(temp.path(), "C.mp3", 2000);

        let options = OrderOptions {
            recency: true,
            limit: NonZeroUsize::new(2),
        };

        let result = order(temp.path(), paths(&["A.mp3", "B.mp3", "C.mp3"]), &options);
        assert_eq!(result.paths, paths(&["A.mp3", "C.mp3"]));
        assert_eq!(result.mtimes, vec![3_000_000, 2_000_000]);
    }

    #[test]
    fn test_recency_ties_keep_listing_order() {
        let temp = tempdir().unwrap();
        track(temp.path(), "x.mp3", 1000);
        track(temp.path(), "y.mp3", 1000);
        track(temp.path(), "z.mp3", 1000);

        let options = OrderOptions {
            recency: true,
            limit: None,
        };

        let result = order(temp.path(), paths(&["y.mp3", "z.mp3", "x.mp3"]), &options);
        assert_eq!(result.paths, paths(&["y.mp3", "z.mp3", "x.mp3"]));
    }

    #[test]
    fn test_recency_skips_vanished_track() {
        let temp = tempdir().unwrap();
        track(temp.path(), "A.mp3", 3000);
        track(temp.path(), "B.mp3", 1000);
        fs::remove_file(temp.path().join("B.mp3")).unwrap();

        let options = OrderOptions {
            recency: true,
            limit: None,
        };

        let result = order(temp.path(), paths(&["A.mp3", "B.mp3"]), &options);
        assert_eq!(result.paths, paths(&["A.mp3"]));
        assert_eq!(result.skipped, paths(&["B.mp3"]));
    }

    #[test]
    fn test_recency_resolves_nested_paths_against_root() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("Rock/Live")).unwrap();
        track(temp.path(), "Rock/Live/old.mp3", 1000);
        track(temp.path(), "Rock/new.mp3", 5000);

        let options = OrderOptions {
            recency: true,
            limit: None,
        };

        let result = order(
            temp.path(),
            paths(&["Rock/Live/old.mp3", "Rock/new.mp3"]),
            &options,
        );
        assert_eq!(result.paths, paths(&["Rock/new.mp3", "Rock/Live/old.mp3"]));
    }
}
