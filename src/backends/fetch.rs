//! Downloader integration
//!
//! Installs a track into one of the library's top-level folders with an
//! external fetcher (youtube-dl by default).

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::util::format_command;

/// Default fetcher executable
pub const DEFAULT_FETCHER: &str = "youtube-dl";

/// Default audio format requested from the fetcher
pub const DEFAULT_AUDIO_FORMAT: &str = "m4a";

/// Output template when no explicit name is given
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "%(title)s.%(ext)s";

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid WHITESPACE_RE regex"));

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("cannot list library folders in {}: {source}", path.display())]
    ListRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid folder: {0}")]
    UnknownFolder(String),

    #[error("folder '{folder}' matches more than one folder: {}", candidates.join(", "))]
    AmbiguousFolder {
        folder: String,
        candidates: Vec<String>,
    },

    #[error("cannot parse fetcher arguments: {0}")]
    BadExtraArgs(String),
}

/// Lowercase and collapse whitespace runs to '-' ("Hip Hop" -> "hip-hop")
pub fn normalize_folder_name(name: &str) -> String {
    WHITESPACE_RE
        .replace_all(&name.to_lowercase(), "-")
        .into_owned()
}

/// Find the library sub-directory whose normalized name equals the request's
pub fn resolve_folder(root: &Path, requested: &str) -> std::result::Result<String, FetchError> {
    let entries = fs::read_dir(root).map_err(|source| FetchError::ListRoot {
        path: root.to_path_buf(),
        source,
    })?;

    let wanted = normalize_folder_name(requested);
    let mut candidates = Vec::new();

    for entry in entries.flatten() {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if normalize_folder_name(&name) == wanted {
            candidates.push(name);
        }
    }

    match candidates.len() {
        0 => Err(FetchError::UnknownFolder(requested.to_string())),
        1 => Ok(candidates.remove(0)),
        _ => {
            candidates.sort();
            Err(FetchError::AmbiguousFolder {
                folder: requested.to_string(),
                candidates,
            })
        }
    }
}

/// Accept either a full https URL or a bare video id
pub fn source_url(id: &str) -> String {
    if id.starts_with("https://") {
        id.to_string()
    } else {
        format!("{}{}", WATCH_URL_PREFIX, id)
    }
}

/// What to install and how
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub id: String,
    pub folder: String,
    pub format: String,
    /// File name without extension
    pub name: Option<String>,
    /// Extra fetcher arguments, split with shell quoting rules
    pub extra_args: Option<String>,
    pub fetcher: String,
}

impl FetchRequest {
    pub fn output_template(&self) -> String {
        match &self.name {
            Some(name) => format!("{}.%(ext)s", name),
            None => DEFAULT_OUTPUT_TEMPLATE.to_string(),
        }
    }

    /// Build the fetcher argument list for a resolved destination folder
    pub fn args(&self, root: &Path, folder: &str) -> std::result::Result<Vec<String>, FetchError> {
        let output = root.join(folder).join(self.output_template());

        let mut args = vec![
            "-f".to_string(),
            self.format.clone(),
            "-o".to_string(),
            output.to_string_lossy().into_owned(),
        ];

        if let Some(extra) = &self.extra_args {
            let extra_args =
                shlex::split(extra).ok_or_else(|| FetchError::BadExtraArgs(extra.clone()))?;
            args.extend(extra_args);
        }

        args.push("--".to_string());
        args.push(source_url(&self.id));
        Ok(args)
    }
}

/// Run the install command
pub fn run_install(root: &Path, request: &FetchRequest, dry_run: bool) -> Result<()> {
    let folder = resolve_folder(root, &request.folder)?;
    let args = request.args(root, &folder)?;

    tracing::debug!(folder = %folder, fetcher = %request.fetcher, "resolved install folder");

    if dry_run {
        eprintln!("[dry-run] {}", format_command(&request.fetcher, &args));
        return Ok(());
    }

    let status = Command::new(&request.fetcher)
        .args(&args)
        .status()
        .with_context(|| format!("Failed to run '{}'", request.fetcher))?;

    if !status.success() {
        bail!("{} exited with {}", request.fetcher, status);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn request(name: Option<&str>, extra: Option<&str>) -> FetchRequest {
        FetchRequest {
            id: "abc123".to_string(),
            folder: "hip hop".to_string(),
            format: DEFAULT_AUDIO_FORMAT.to_string(),
            name: name.map(str::to_string),
            extra_args: extra.map(str::to_string),
            fetcher: DEFAULT_FETCHER.to_string(),
        }
    }

    #[test]
    fn test_normalize_folder_name() {
        assert_eq!(normalize_folder_name("Hip Hop"), "hip-hop");
        assert_eq!(normalize_folder_name("Lo  Fi\tBeats"), "lo-fi-beats");
        assert_eq!(normalize_folder_name("rock"), "rock");
    }

    #[test]
    fn test_resolve_folder_matches_normalized_name() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("Hip Hop")).unwrap();
        fs::create_dir(temp.path().join("Rock")).unwrap();

        assert_eq!(resolve_folder(temp.path(), "hip-hop").unwrap(), "Hip Hop");
        assert_eq!(resolve_folder(temp.path(), "HIP HOP").unwrap(), "Hip Hop");
        assert_eq!(resolve_folder(temp.path(), "rock").unwrap(), "Rock");
    }

    #[test]
    fn test_resolve_folder_ignores_files() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("rock"), "not a dir").unwrap();

        let err = resolve_folder(temp.path(), "rock").unwrap_err();
        assert!(matches!(err, FetchError::UnknownFolder(_)));
        assert_eq!(err.to_string(), "Invalid folder: rock");
    }

    #[test]
    fn test_resolve_folder_ambiguous() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("Hip Hop")).unwrap();
        fs::create_dir(temp.path().join("hip-hop")).unwrap();

        let err = resolve_folder(temp.path(), "hip hop").unwrap_err();
        match err {
            FetchError::AmbiguousFolder { candidates, .. } => {
                assert_eq!(candidates, vec!["Hip Hop", "hip-hop"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_folder_missing_root() {
        let temp = tempdir().unwrap();
        let err = resolve_folder(&temp.path().join("missing"), "rock").unwrap_err();
        assert!(matches!(err, FetchError::ListRoot { .. }));
    }

    #[test]
    fn test_source_url() {
        assert_eq!(
            source_url("abc123"),
            "https://www.youtube.com/watch?v=abc123"
        );
        assert_eq!(
            source_url("https://example.com/v/1"),
            "https://example.com/v/1"
        );
    }

    #[test]
    fn test_args_default_template() {
        let args = request(None, None)
            .args(Path::new("/music"), "Hip Hop")
            .unwrap();
        assert_eq!(
            args,
            vec![
                "-f",
                "m4a",
                "-o",
                "/music/Hip Hop/%(title)s.%(ext)s",
                "--",
                "https://www.youtube.com/watch?v=abc123",
            ]
        );
    }

    #[test]
    fn test_args_with_name_and_extra() {
        let args = request(Some("My Song"), Some("--no-playlist  -q"))
            .args(Path::new("/music"), "Rock")
            .unwrap();
        assert_eq!(args[3], "/music/Rock/My Song.%(ext)s");
        assert_eq!(&args[4..6], &["--no-playlist", "-q"]);
        assert_eq!(args[6], "--");
    }

    #[test]
    fn test_args_keep_quoted_extra_argument() {
        let args = request(None, Some(r#"--postprocessor-args "-ar 44100""#))
            .args(Path::new("/music"), "Rock")
            .unwrap();
        assert_eq!(&args[4..6], &["--postprocessor-args", "-ar 44100"]);
        assert_eq!(args[6], "--");
    }

    #[test]
    fn test_args_reject_unbalanced_quote() {
        let err = request(None, Some(r#"--postprocessor-args "-ar 44100"#))
            .args(Path::new("/music"), "Rock")
            .unwrap_err();
        assert!(matches!(err, FetchError::BadExtraArgs(_)));
    }
}
