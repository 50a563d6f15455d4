//! Defines the command-line arguments and subcommands for the statelint CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{discovery::DiscoveryConfig, engine::BatchConfig};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "statelint",
    version,
    about = "Validate and inspect nested key/value game-state records."
)]
pub struct StateArgs {
    #[command(subcommand)]
    pub command: ArgsCommand,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum ArgsCommand {
    /// Parse, dump and validate every document in a directory.
    Check {
        /// Directory containing the documents.
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Extension documents must have.
        #[arg(long, default_value = "txt")]
        extension: String,
        /// File names to skip in addition to `output.txt` (repeatable).
        #[arg(long)]
        exclude: Vec<String>,
        /// Also look in subdirectories.
        #[arg(long)]
        recursive: bool,
        /// Report failing documents and continue with the rest.
        #[arg(long)]
        keep_going: bool,
        /// Do not print each document's text before its tree.
        #[arg(long)]
        no_echo: bool,
    },
    /// Show the parse tree of a single document.
    Tree {
        /// The document to parse.
        #[arg(required = true)]
        file: PathBuf,
        /// Emit the tree as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Check the built-in grammar for consistency.
    Grammar,
}

impl ArgsCommand {
    /// Batch configuration for `check`; `None` for other subcommands.
    pub fn batch_config(&self) -> Option<BatchConfig> {
        let ArgsCommand::Check {
            dir,
            extension,
            exclude,
            recursive,
            keep_going,
            no_echo,
        } = self
        else {
            return None;
        };
        Some(BatchConfig {
            dir: dir.clone(),
            discovery: DiscoveryConfig {
                extension: extension.trim_start_matches('.').to_string(),
                exclude: exclude.clone(),
                recursive: *recursive,
                ..DiscoveryConfig::default()
            },
            keep_going: *keep_going,
            echo_source: !*no_echo,
        })
    }
}
