//! tunepick - pick songs from a music library by path and play them
//!
//! tunepick provides:
//! - A small path query language (alternatives, `#` parts, `,` words, `!` vetoes)
//! - Library traversal with a pluggable file/folder classifier
//! - Recency ordering and limits
//! - Hand-off to an external player, and downloads through an external fetcher

use anyhow::Result;
use clap::Parser;

mod backends;
mod cli;
mod core;
mod select;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::run(cli)
}
