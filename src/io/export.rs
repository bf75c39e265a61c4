//! JSON timeline export and import.
//!
//! The export is the hand-off format for downstream consumers: one record
//! per validated year, in the order the years appear in the source text.

use crate::core::ValidatedYear;
use crate::error::{ExtractionError, IoError, Result, StorageError};
use crate::extraction::{ExtractorConfig, RejectionRule, YearRangeRule};
use crate::io::reader::{read_text, write_file};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializable timeline of a single document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineExport {
    /// Name of the document the events came from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,

    /// Extractor settings the events were produced with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ExtractorConfig>,

    /// Validated years in original order.
    pub events: Vec<ValidatedYear>,
}

impl TimelineExport {
    /// Creates an export for `events`.
    #[must_use]
    pub const fn new(document: Option<String>, events: Vec<ValidatedYear>) -> Self {
        Self {
            document,
            config: None,
            events,
        }
    }

    /// Settings the events should satisfy: the recorded ones, else the
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidConfig`] if the recorded settings
    /// are inconsistent.
    pub fn effective_config(&self) -> Result<ExtractorConfig> {
        let config = self.config.clone().unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Checks that the events could have come from an extractor run with
    /// `config`: every year within its bounds, offsets strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::InvalidEvent`] for the first event that
    /// breaks either rule.
    pub fn validate(&self, config: &ExtractorConfig) -> Result<()> {
        let range = YearRangeRule::from_config(config);
        let mut previous: Option<usize> = None;

        for (index, event) in self.events.iter().enumerate() {
            if range.rejects("", event.year) {
                return Err(ExtractionError::InvalidEvent {
                    index,
                    year: event.year,
                    reason: format!("outside {}..={}", config.min_year, config.max_year),
                }
                .into());
            }
            if let Some(prev) = previous
                && event.source_offset <= prev
            {
                return Err(ExtractionError::InvalidEvent {
                    index,
                    year: event.year,
                    reason: format!("offset {} does not follow {prev}", event.source_offset),
                }
                .into());
            }
            previous = Some(event.source_offset);
        }
        Ok(())
    }

    /// Renders the export as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        Ok(json.map_err(StorageError::from)?)
    }

    /// Parses an export from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a valid timeline export.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).map_err(StorageError::from)?)
    }
}

/// Writes `export` to `path` as JSON.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
///
/// # Examples
///
/// ```no_run
/// use yearline::core::ValidatedYear;
/// use yearline::io::{TimelineExport, write_timeline_json};
///
/// let export = TimelineExport::new(None, vec![ValidatedYear::new(1916, 3)]);
/// write_timeline_json("timeline.json", &export, true).unwrap();
/// ```
pub fn write_timeline_json<P: AsRef<Path>>(
    path: P,
    export: &TimelineExport,
    pretty: bool,
) -> Result<()> {
    write_file(path, &export.to_json(pretty)?)
}

/// Reads a timeline export from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a timeline export.
pub fn read_timeline_json<P: AsRef<Path>>(path: P) -> Result<TimelineExport> {
    let path_ref = path.as_ref();
    let json = read_text(path_ref)?;
    TimelineExport::from_json(&json).map_err(|e| {
        IoError::ReadFailed {
            path: path_ref.to_string_lossy().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}
