//! Command-line interface for the panel
use anyhow::Context;
use clap::{Parser, Subcommand};
use easytier_panel::PanelSettings;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the panel settings file
    #[arg(short, long, value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Config store snapshot to edit
    #[arg(long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the global section and every network
    Show,
    /// Set a global option; list options take several values
    Set {
        key: String,
        #[arg(num_args = 0..)]
        values: Vec<String>,
    },
    /// Clear a global option
    Unset { key: String },
    /// Check the stored configuration without changing it
    Validate,
    /// List the declared options
    Schema,
    /// Show whether the daemon is running
    Status {
        /// Keep polling until interrupted
        #[arg(short, long)]
        watch: bool,

        /// Seconds between polls
        #[arg(short, long)]
        interval: Option<u64>,
    },
    /// Manage network entries
    Network {
        #[command(subcommand)]
        action: NetworkCommand,
    },
}

#[derive(Subcommand)]
pub enum NetworkCommand {
    /// List network entries in order
    List,
    /// Add a network entry
    Add {
        /// Network ID to join
        id: String,
    },
    /// Remove a network entry by section
    Remove { section: String },
    /// Move a network entry to a new position
    Move { section: String, index: usize },
    /// Set an option of a network entry
    Set {
        section: String,
        key: String,
        #[arg(num_args = 0..)]
        values: Vec<String>,
    },
    /// Clear an option of a network entry
    Unset { section: String, key: String },
}

/// Parse command line arguments and load the panel settings they point at
pub fn parse_args() -> anyhow::Result<(Command, PanelSettings)> {
    let cli = Cli::parse();

    let mut settings = PanelSettings::load(cli.settings.as_deref())
        .context("failed to load panel settings")?;

    // Override settings with command line arguments
    if let Some(store) = cli.store {
        settings.store_path = store;
    }
    if let Command::Status {
        interval: Some(secs),
        ..
    } = cli.command
    {
        settings.poll_interval_secs = secs;
    }
    if cli.verbose {
        settings.log_level = "debug".to_string();
    }

    Ok((cli.command, settings))
}
