//! I/O for yearline.
//!
//! Provides file reading with memory mapping support for large documents,
//! plain-text validation, JSON timeline export, and Unicode utilities.

pub mod export;
pub mod reader;
pub mod unicode;

pub use export::{TimelineExport, read_timeline_json, write_timeline_json};
pub use reader::{FileReader, read_text, write_file};
pub use unicode::{char_window, check_text, find_char_boundary, truncate_graphemes, validate_text};
