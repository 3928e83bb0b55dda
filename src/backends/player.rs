//! Player integration
//!
//! Hands the selection to an external media player (vlc by default).

use anyhow::{bail, Context, Result};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use crate::core::model::ResultSet;
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::core::util::format_command;
use crate::select::order::OrderOptions;
use crate::select::walk::Classify;
use crate::select::{select, SelectRequest, Selection};

/// Default player executable
pub const DEFAULT_PLAYER: &str = "vlc";

/// How long to stay alive after spawning the player so it can detach
pub const GRACE_PERIOD: Duration = Duration::from_millis(1200);

/// Printed when a query matched no track
pub const NO_MATCH_MESSAGE: &str = "Didn't match anything";

/// A player invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PlayerCommand {
    /// Play the whole library, letting the player expand directories
    pub fn play_all(player: &str, root: &Path) -> Self {
        Self {
            program: player.to_string(),
            args: vec![
                "--recursive=expand".to_string(),
                root.to_string_lossy().into_owned(),
            ],
        }
    }

    /// Play `tracks` in order; `keep_order` turns off the player's shuffle
    pub fn play(player: &str, tracks: &[PathBuf], keep_order: bool) -> Self {
        let mut args: Vec<String> = tracks
            .iter()
            .map(|t| t.to_string_lossy().into_owned())
            .collect();

        if keep_order {
            args.push("--no-random".to_string());
        }

        Self {
            program: player.to_string(),
            args,
        }
    }

    pub fn display(&self) -> String {
        format_command(&self.program, &self.args)
    }

    /// Start the player detached from our stdio
    pub fn spawn(&self) -> Result<()> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to start player '{}'", self.program))?;
        Ok(())
    }
}

/// Options shared by the play and list commands
#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub terms: Vec<String>,
    pub limit: Option<NonZeroUsize>,
    pub recency: bool,
    pub classify: Classify,
    pub player: String,
    pub dry_run: bool,
    pub quiet: bool,
}

impl PlayOptions {
    fn request(&self, root: &Path) -> SelectRequest {
        SelectRequest::new(root, self.terms.clone())
            .with_options(OrderOptions {
                recency: self.recency,
                limit: self.limit,
            })
            .with_classify(self.classify)
    }

    /// No filter and no limit: the player gets the whole library
    pub fn plays_everything(&self) -> bool {
        self.terms.is_empty() && self.limit.is_none()
    }
}

/// Compute the selection, failing when nothing matched.
///
/// Machine-readable formats also get a traversal failure as an error item on
/// stdout.
fn selection_or_bail(
    root: &Path,
    options: &PlayOptions,
    config: RenderConfig,
) -> Result<Selection> {
    let selection = match select(&options.request(root)) {
        Ok(selection) => selection,
        Err(err) => {
            if config.format != OutputFormat::Text {
                let renderer = Renderer::with_config(config);
                println!("{}", renderer.render(&ResultSet::from_select_error(&err, root)));
            }
            return Err(err.into());
        }
    };

    if selection.is_empty() {
        bail!(NO_MATCH_MESSAGE);
    }

    Ok(selection)
}

fn print_selection(heading: &str, selection: &Selection, quiet: bool, config: RenderConfig) {
    let result_set = ResultSet::from_selection(selection);
    let renderer = Renderer::with_config(config);

    if renderer.format() == OutputFormat::Text && !quiet {
        println!("{}: [{}]", heading, result_set.track_count());
    }
    println!("{}", renderer.render(&result_set));
}

/// Run the default command: select, print and hand off to the player
pub fn run_play(root: &Path, options: &PlayOptions, config: RenderConfig) -> Result<()> {
    let command = if options.plays_everything() {
        if !options.quiet {
            println!("Playing all songs");
        }
        PlayerCommand::play_all(&options.player, root)
    } else {
        let selection = selection_or_bail(root, options, config)?;
        print_selection("Playing", &selection, options.quiet, config);
        PlayerCommand::play(
            &options.player,
            &selection.absolute_paths(root),
            options.recency,
        )
    };

    if options.dry_run {
        eprintln!("[dry-run] {}", command.display());
        return Ok(());
    }

    command.spawn()?;
    std::thread::sleep(GRACE_PERIOD);
    Ok(())
}

/// Run the list command: select and print, never play
pub fn run_list(root: &Path, options: &PlayOptions, config: RenderConfig) -> Result<()> {
    let selection = selection_or_bail(root, options, config)?;
    print_selection("Matched", &selection, options.quiet, config);
    Ok(())
}
