//! CLI layer for yearline.
//!
//! Provides the command-line interface using clap, with commands for
//! scanning documents and managing stored timelines.

pub mod commands;
pub mod output;
pub mod parser;

pub use commands::execute;
pub use output::OutputFormat;
pub use parser::{Cli, Commands, ExtractorArgs};
