//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use crate::extraction::ExtractorConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// yearline: temporal reference extractor.
///
/// Finds calendar years in long-form text, filters out document
/// identifiers and numeric chains, and builds ordered timelines.
#[derive(Parser, Debug)]
#[command(name = "yearline")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the timeline database file.
    ///
    /// Defaults to `.yearline/timeline.db` in the current directory.
    #[arg(short, long, env = "YEARLINE_DB_PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json).
    #[arg(long, default_value = "text", global = true)]
    pub format: String,

    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Extractor settings shared by the scanning commands.
#[derive(Args, Debug, Clone, Default)]
pub struct ExtractorArgs {
    /// Earliest plausible year (inclusive).
    #[arg(long)]
    pub min_year: Option<u16>,

    /// Latest plausible year (inclusive).
    #[arg(long)]
    pub max_year: Option<u16>,

    /// Characters of context before a match.
    #[arg(long)]
    pub before: Option<usize>,

    /// Characters of context after a match.
    #[arg(long)]
    pub after: Option<usize>,

    /// Flag years below this as low confidence.
    #[arg(long, conflicts_with = "no_low_confidence")]
    pub low_confidence_before: Option<u16>,

    /// Never flag years as low confidence.
    #[arg(long)]
    pub no_low_confidence: bool,

    /// Width in characters of the window used for dense-cluster flags.
    #[arg(long)]
    pub density_window: Option<usize>,

    /// Distinct years within the window that raise a dense-cluster flag.
    #[arg(long)]
    pub density_min: Option<usize>,
}

impl ExtractorArgs {
    /// Applies the flags on top of the default configuration.
    #[must_use]
    pub fn to_config(&self) -> ExtractorConfig {
        let mut config = ExtractorConfig::new();
        if let Some(min_year) = self.min_year {
            config.min_year = min_year;
        }
        if let Some(max_year) = self.max_year {
            config.max_year = max_year;
        }
        if let Some(before) = self.before {
            config.context_before = before;
        }
        if let Some(after) = self.after {
            config.context_after = after;
        }
        if self.no_low_confidence {
            config.low_confidence_before = None;
        } else if let Some(year) = self.low_confidence_before {
            config.low_confidence_before = Some(year);
        }
        if let Some(window) = self.density_window {
            config.density_window = window;
        }
        if let Some(min_distinct) = self.density_min {
            config.density_min_distinct = min_distinct;
        }
        config
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the timeline database.
    ///
    /// Creates the database file and schema if they don't exist.
    Init {
        /// Force re-initialization (destroys existing data).
        #[arg(short, long)]
        force: bool,
    },

    /// Show timeline store status.
    Status,

    /// Reset the store (delete all timelines).
    Reset {
        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Extract the timeline of a text file.
    Scan {
        /// Path to the text file.
        file: PathBuf,

        /// Name to store the document under (defaults to the file name).
        #[arg(short, long)]
        name: Option<String>,

        /// Print the report without storing it.
        #[arg(long)]
        no_store: bool,

        #[command(flatten)]
        extractor: ExtractorArgs,
    },

    /// Extract timelines of many files in parallel.
    Batch {
        /// Paths to the text files.
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Number of worker threads (defaults to one per core).
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        #[command(flatten)]
        extractor: ExtractorArgs,
    },

    /// List every year-shaped token in a file with its verdict.
    Candidates {
        /// Path to the text file.
        file: PathBuf,

        /// Only show rejected candidates.
        #[arg(long)]
        rejected: bool,

        #[command(flatten)]
        extractor: ExtractorArgs,
    },

    /// Check whether a year is valid in the given context.
    Check {
        /// The year to check.
        year: u16,

        /// Text surrounding the year.
        context: String,

        #[command(flatten)]
        extractor: ExtractorArgs,
    },

    /// List stored documents.
    #[command(name = "list", alias = "ls")]
    ListDocuments,

    /// Show a stored document.
    #[command(name = "show")]
    ShowDocument {
        /// Document ID or name.
        document: String,

        /// Show events as well.
        #[arg(short, long)]
        events: bool,
    },

    /// Print the timeline report of a stored document.
    Report {
        /// Document ID or name.
        document: String,
    },

    /// Export a stored timeline as JSON.
    Export {
        /// Document ID or name.
        document: String,

        /// Output file path (stdout if not specified).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON.
        #[arg(short, long)]
        pretty: bool,
    },

    /// Import a JSON timeline export.
    Import {
        /// Path to the JSON file.
        file: PathBuf,

        /// Name to store the timeline under.
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Delete a stored document.
    #[command(name = "delete", alias = "rm")]
    DeleteDocument {
        /// Document ID or name.
        document: String,

        /// Skip confirmation prompt.
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List the rejection rules.
    Rules,
}

impl Cli {
    /// Returns the database path, using the default if not specified.
    #[must_use]
    pub fn get_db_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(crate::storage::DEFAULT_DB_PATH))
    }
}
