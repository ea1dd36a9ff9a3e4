// SPDX-License-Identifier: MIT OR Apache-2.0
//! Command-line editor for dungeon room node graphs.
//!
//! Every subcommand edits a RON graph document through the same rules the
//! graphical editor uses:
//! - create graphs and room nodes
//! - connect, disconnect and delete nodes
//! - change room types
//! - audit and export documents

mod commands;
mod report;

use clap::Parser;
use commands::{Command, Session};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "dungeon_editor_app=info,dungeon_editor_graph=info";

/// Log filter used with `--verbose`
const VERBOSE_LOG_FILTER: &str = "dungeon_editor_app=debug,dungeon_editor_graph=debug";

#[derive(Parser)]
#[command(name = "dungeon_graph")]
#[command(about = "Edit and validate dungeon room node graphs", version)]
struct Cli {
    /// Graph settings file (default: ./settings.ron if present)
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Room type catalog file (default: built-in types)
    #[arg(long, global = true)]
    types: Option<PathBuf>,

    /// Log graph edits as they happen
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        VERBOSE_LOG_FILTER
    } else {
        DEFAULT_LOG_FILTER
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Starting dungeon_graph v{}", env!("CARGO_PKG_VERSION"));

    let result = Session::open(cli.settings.as_deref(), cli.types.as_deref())
        .and_then(|session| session.execute(cli.command));

    match result {
        Ok(output) => println!("{output}"),
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    }
}
