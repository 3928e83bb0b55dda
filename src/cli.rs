//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use crate::backends::fetch::{FetchRequest, DEFAULT_AUDIO_FORMAT, DEFAULT_FETCHER};
use crate::backends::player::{PlayOptions, DEFAULT_PLAYER};
use crate::core::logging;
use crate::core::paths::default_library_root;
use crate::core::render::{OutputFormat, RenderConfig};
use crate::select::walk::Classify;

/// tunepick - pick songs from your music library by path and play them.
#[derive(Parser, Debug)]
#[command(name = "tunepick")]
#[command(
    author,
    version,
    about,
    args_conflicts_with_subcommands = true,
    long_about = r#"tunepick walks your music library, keeps the files whose path matches
the query and hands them to your player.

Query language (matched case-insensitively against the path relative to the
music folder, as plain substrings):
- each TERM is an alternative: a track passes if any term matches
- `#` splits a term into parts that must all match:  rock#live
- `,` lists alternatives inside a part:               rock,jazz#live
- a leading `!` makes a term a veto:                  rock '!live'
  (a vetoed track is dropped even if another term matched it)

With no terms and no --limit the whole library is handed to the player.

Examples:
    tunepick rock '!live'
    tunepick 'rock,jazz#2021' --new --limit 20
    tunepick list piano --format jsonl
    tunepick install dQw4w9WgXcQ "hip hop"
"#
)]
pub struct Cli {
    /// Music library root.
    #[arg(
        short = 'm',
        long,
        global = true,
        env = "TUNEPICK_MUSIC_PATH",
        value_name = "DIR",
        long_help = "Music library root (defaults to ~/Music).\n\n\
Paths are matched and printed relative to this directory, so the folder's own\n\
name never satisfies a query."
    )]
    pub music_path: Option<PathBuf>,

    /// Output format (text/jsonl/json/md).
    #[arg(
        long,
        global = true,
        default_value = "text",
        value_parser = ["text", "jsonl", "json", "md"],
        value_name = "FORMAT"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print what would be run instead of running it.
    #[arg(
        short,
        long,
        global = true,
        long_help = "Resolve everything and print the player/fetcher command line to stderr\n\
without starting it. Also skips the wait that lets a detached player start."
    )]
    pub dry_run: bool,

    #[command(flatten)]
    pub select: SelectArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Query and ordering options
#[derive(Args, Debug, Clone)]
pub struct SelectArgs {
    /// Query terms.
    #[arg(value_name = "TERMS")]
    pub terms: Vec<String>,

    /// Keep at most N tracks.
    #[arg(
        short,
        long,
        value_name = "N",
        long_help = "Keep at most N tracks. Applied after --new, so `--new --limit 10` picks\n\
the ten most recent matches; without --new the first N in directory order are kept."
    )]
    pub limit: Option<NonZeroUsize>,

    /// Newest files first (by modification time).
    #[arg(short, long)]
    pub new: bool,

    /// How listed entries are told apart from folders (name/metadata).
    #[arg(
        long,
        default_value = "name",
        value_parser = ["name", "metadata"],
        value_name = "MODE",
        long_help = "How the walker decides whether an entry is a track or a folder.\n\n\
Supported values:\n\
- name (default): names containing '.' are tracks, everything else is a folder.\n\
  Folders with a dot in their name (\"Live.2020\") are not searched, and a\n\
  file without an extension makes the walk fail.\n\
- metadata: ask the filesystem whether the entry is a directory."
    )]
    pub classify: String,

    /// Player executable.
    #[arg(long, env = "TUNEPICK_PLAYER", default_value = DEFAULT_PLAYER, value_name = "CMD")]
    pub player: String,
}

impl SelectArgs {
    fn into_options(self, dry_run: bool, quiet: bool) -> PlayOptions {
        PlayOptions {
            terms: self.terms,
            limit: self.limit,
            recency: self.new,
            classify: self.classify.parse::<Classify>().unwrap_or_default(),
            player: self.player,
            dry_run,
            quiet,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the selection without playing it.
    #[command(long_about = "Run the same selection as the default command and print it.\n\n\
Examples:\n\
  tunepick list rock '!live'\n\
  tunepick list --new --limit 5 --format json\n")]
    List {
        #[command(flatten)]
        select: SelectArgs,
    },

    /// Download a track into a library folder.
    #[command(
        visible_aliases = ["i", "d", "download"],
        long_about = "Download a track with an external fetcher (youtube-dl by default) into one\n\
of the library's top-level folders.\n\n\
FOLDER is compared case-insensitively with whitespace runs treated as '-',\n\
so \"hip hop\" selects a folder named \"Hip Hop\".\n\n\
Examples:\n\
  tunepick install dQw4w9WgXcQ rock\n\
  tunepick install https://www.youtube.com/watch?v=dQw4w9WgXcQ \"hip hop\" --name intro\n"
    )]
    Install {
        /// Video id or https URL.
        #[arg(value_name = "ID")]
        id: String,

        /// Destination folder under the library root.
        #[arg(value_name = "FOLDER")]
        folder: String,

        /// Audio format to request.
        #[arg(short = 'f', long, default_value = DEFAULT_AUDIO_FORMAT, value_name = "FMT")]
        audio_format: String,

        /// Extra arguments passed to the fetcher (shell quoting applies).
        #[arg(short = 'y', long, value_name = "ARGS", allow_hyphen_values = true)]
        ytdl_args: Option<String>,

        /// File name to save as (without extension).
        #[arg(short = 'n', long, value_name = "NAME")]
        name: Option<String>,

        /// Fetcher executable.
        #[arg(long, env = "TUNEPICK_FETCHER", default_value = DEFAULT_FETCHER, value_name = "CMD")]
        fetcher: String,
    },

    /// Check that the player and fetcher are installed.
    Doctor {
        /// Player executable.
        #[arg(long, env = "TUNEPICK_PLAYER", default_value = DEFAULT_PLAYER, value_name = "CMD")]
        player: String,

        /// Fetcher executable.
        #[arg(long, env = "TUNEPICK_FETCHER", default_value = DEFAULT_FETCHER, value_name = "CMD")]
        fetcher: String,
    },
}

/// Resolve the library root from the flag/env or `~/Music`
fn resolve_root(music_path: Option<PathBuf>) -> Result<PathBuf> {
    let root = match music_path {
        Some(path) => path,
        None => default_library_root()
            .context("Cannot determine the home directory; pass --music-path")?,
    };

    Ok(root.canonicalize().unwrap_or(root))
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, cli.quiet, cli.no_color);

    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let render_config = RenderConfig::with_pretty(format, cli.pretty);

    let root = resolve_root(cli.music_path)?;
    tracing::debug!(root = %root.display(), "library root");

    match cli.command {
        None => crate::backends::player::run_play(
            &root,
            &cli.select.into_options(cli.dry_run, cli.quiet),
            render_config,
        ),

        Some(Commands::List { select }) => crate::backends::player::run_list(
            &root,
            &select.into_options(cli.dry_run, cli.quiet),
            render_config,
        ),

        Some(Commands::Install {
            id,
            folder,
            audio_format,
            ytdl_args,
            name,
            fetcher,
        }) => {
            let request = FetchRequest {
                id,
                folder,
                format: audio_format,
                name,
                extra_args: ytdl_args,
                fetcher,
            };
            crate::backends::fetch::run_install(&root, &request, cli.dry_run)
        }

        Some(Commands::Doctor { player, fetcher }) => {
            crate::backends::doctor::run_doctor(&player, &fetcher, render_config)
        }
    }
}
