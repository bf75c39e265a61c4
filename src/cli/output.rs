//! Output formatting for CLI commands.
//!
//! Supports text and JSON output formats.

use crate::core::{DocumentRecord, TimelineSummary, ValidatedYear};
use crate::error::Error;
use crate::io::truncate_graphemes;
use crate::storage::StoreStats;
use serde::Serialize;
use std::fmt::Write;

/// Width of the widest bar in the decade table.
const DECADE_BAR_WIDTH: usize = 40;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output.
    Json,
}

impl OutputFormat {
    /// Parses format from string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// A year candidate together with the extractor's verdict.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateVerdict {
    /// The year-shaped value.
    pub value: u16,
    /// Character offset in the source text.
    pub offset: usize,
    /// Local context the verdict was based on.
    pub context: String,
    /// Rule that rejected the candidate, if any.
    pub rejected_by: Option<&'static str>,
}

/// Outcome of scanning one file in a batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    /// File that was scanned.
    pub file: String,
    /// Assigned document ID, if stored.
    pub document_id: Option<i64>,
    /// Number of validated years.
    pub event_count: usize,
    /// Earliest and latest year, if any.
    pub span: Option<(u16, u16)>,
    /// Error message for a failed file.
    pub error: Option<String>,
}

/// Formats a status response.
#[must_use]
pub fn format_status(stats: &StoreStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_status_text(stats),
        OutputFormat::Json => format_json(stats),
    }
}

fn format_status_text(stats: &StoreStats) -> String {
    let mut output = String::new();
    output.push_str("yearline status\n");
    output.push_str("===============\n\n");
    let _ = writeln!(output, "  Documents:     {}", stats.document_count);
    let _ = writeln!(output, "  Events:        {}", stats.event_count);
    match (stats.earliest_year, stats.latest_year) {
        (Some(earliest), Some(latest)) => {
            let _ = writeln!(output, "  Years:         {earliest}-{latest}");
        }
        _ => {
            let _ = writeln!(output, "  Years:         -");
        }
    }
    let _ = writeln!(output, "  Schema:        v{}", stats.schema_version);
    if let Some(size) = stats.db_size {
        let _ = writeln!(output, "  DB size:       {size} bytes");
    }
    output
}

/// Formats a document list.
#[must_use]
pub fn format_document_list(documents: &[DocumentRecord], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_document_list_text(documents),
        OutputFormat::Json => format_json(&documents),
    }
}

fn format_document_list_text(documents: &[DocumentRecord]) -> String {
    if documents.is_empty() {
        return "No documents found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str("Documents:\n");
    let _ = writeln!(
        output,
        "{:<6} {:<24} {:<12} {:<8} Source",
        "ID", "Name", "Size", "Events"
    );
    output.push_str(&"-".repeat(70));
    output.push('\n');

    for document in documents {
        let id = document
            .id
            .map_or_else(|| "-".to_string(), |i| i.to_string());
        let name = document.display_name();
        let source = document
            .source
            .as_ref()
            .map_or_else(|| "-".to_string(), |p| p.to_string_lossy().to_string());

        let _ = writeln!(
            output,
            "{:<6} {:<24} {:<12} {:<8} {}",
            id,
            truncate(&name, 24),
            format_size(document.size),
            document.event_count,
            truncate(&source, 30)
        );
    }

    output
}

/// Formats a single document, optionally with its events.
#[must_use]
pub fn format_document(
    document: &DocumentRecord,
    events: Option<&[ValidatedYear]>,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => format_document_text(document, events),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct DocumentWithEvents<'a> {
                document: &'a DocumentRecord,
                events: Option<&'a [ValidatedYear]>,
            }
            format_json(&DocumentWithEvents { document, events })
        }
    }
}

fn format_document_text(document: &DocumentRecord, events: Option<&[ValidatedYear]>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Document: {}", document.display_name());
    let _ = writeln!(output, "  ID:           {}", document.id.unwrap_or(0));
    let _ = writeln!(output, "  Size:         {} bytes", document.size);
    let _ = writeln!(output, "  Events:       {}", document.event_count);
    if let Some(ref hash) = document.content_hash {
        let _ = writeln!(output, "  Hash:         {hash}");
    }
    if let Some(ref source) = document.source {
        let _ = writeln!(output, "  Source:       {}", source.display());
    }

    if let Some(events) = events {
        output.push('\n');
        output.push_str("Events:\n");
        let _ = writeln!(output, "{:<6} {:<6} {:<10} Confidence", "#", "Year", "Offset");
        output.push_str(&"-".repeat(36));
        output.push('\n');

        for (i, event) in events.iter().enumerate() {
            let _ = writeln!(
                output,
                "{:<6} {:<6} {:<10} {}",
                i, event.year, event.source_offset, event.confidence
            );
        }
    }

    output
}

/// Formats a timeline report: span, decade table and flags.
#[must_use]
pub fn format_report(name: &str, summary: &TimelineSummary, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_report_text(name, summary),
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Report<'a> {
                document: &'a str,
                #[serde(flatten)]
                summary: &'a TimelineSummary,
            }
            format_json(&Report {
                document: name,
                summary,
            })
        }
    }
}

fn format_report_text(name: &str, summary: &TimelineSummary) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "Timeline: {name}");

    let Some(span) = summary.span else {
        output.push_str("  No events found.\n");
        return output;
    };

    let _ = writeln!(
        output,
        "  Span:         {}-{} ({} years)",
        span.earliest_year,
        span.latest_year,
        span.years_covered()
    );
    let _ = writeln!(output, "  Events:       {}", span.event_count);
    let _ = writeln!(output, "  Decades:      {}", summary.decades.len());

    output.push('\n');
    output.push_str("Decades:\n");
    let max = summary.decades.iter().map(|(_, n)| n).max().unwrap_or(1).max(1);
    for (decade, count) in summary.decades.iter() {
        let width = (count * DECADE_BAR_WIDTH).div_ceil(max);
        let _ = writeln!(output, "  {decade}s  {:>5}  {}", count, "#".repeat(width));
    }

    if summary.low_confidence_count > 0 {
        output.push('\n');
        let _ = writeln!(
            output,
            "Low confidence ({}):",
            summary.low_confidence_count
        );
        for event in summary.low_confidence_events() {
            let _ = writeln!(output, "  {} at {}", event.year, event.source_offset);
        }
    }

    if !summary.density_flags.is_empty() {
        output.push('\n');
        let _ = writeln!(output, "Dense clusters ({}):", summary.density_flags.len());
        for flag in &summary.density_flags {
            let years: Vec<String> = flag.distinct_years.iter().map(ToString::to_string).collect();
            let _ = writeln!(
                output,
                "  {}..{}: {}",
                flag.start_offset,
                flag.end_offset,
                years.join(", ")
            );
        }
    }

    output
}

/// Formats the result of scanning one file.
///
/// `document_id` is `None` when the timeline was not stored.
#[must_use]
pub fn format_scan(
    record: &DocumentRecord,
    summary: &TimelineSummary,
    document_id: Option<i64>,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = format_report_text(&record.display_name(), summary);
            if let Some(id) = document_id {
                let _ = writeln!(output, "\nStored as document {id}.");
            }
            output
        }
        OutputFormat::Json => format_json(&serde_json::json!({
            "document_id": document_id,
            "document": record,
            "summary": summary,
        })),
    }
}

/// Formats candidate verdicts.
#[must_use]
pub fn format_candidates(candidates: &[CandidateVerdict], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format_candidates_text(candidates),
        OutputFormat::Json => format_json(&candidates),
    }
}

fn format_candidates_text(candidates: &[CandidateVerdict]) -> String {
    if candidates.is_empty() {
        return "No year candidates found.\n".to_string();
    }

    let mut output = String::new();
    let accepted = candidates.iter().filter(|c| c.rejected_by.is_none()).count();
    let _ = writeln!(
        output,
        "{} candidates, {} accepted:\n",
        candidates.len(),
        accepted
    );

    for candidate in candidates {
        let verdict = candidate
            .rejected_by
            .map_or_else(|| "ok".to_string(), |rule| format!("rejected ({rule})"));
        let context = candidate.context.replace('\n', "\\n");
        let _ = writeln!(
            output,
            "  {:<5} @{:<8} {:<28} {}",
            candidate.value,
            candidate.offset,
            verdict,
            truncate_graphemes(&context, 40)
        );
    }

    output
}

/// Formats the result of checking one year.
#[must_use]
pub fn format_check(
    year: u16,
    rejected_by: Option<&str>,
    confidence: crate::core::Confidence,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Text => rejected_by.map_or_else(
            || format!("{year}: valid ({confidence} confidence)\n"),
            |rule| format!("{year}: rejected by {rule}\n"),
        ),
        OutputFormat::Json => format_json(&serde_json::json!({
            "year": year,
            "valid": rejected_by.is_none(),
            "rejected_by": rejected_by,
            "confidence": rejected_by.is_none().then_some(confidence),
        })),
    }
}

/// Formats batch results.
#[must_use]
pub fn format_batch(entries: &[BatchEntry], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            let failed = entries.iter().filter(|e| e.error.is_some()).count();
            let _ = writeln!(
                output,
                "Scanned {} files ({} failed):",
                entries.len(),
                failed
            );
            for entry in entries {
                if let Some(ref error) = entry.error {
                    let _ = writeln!(output, "  {}: error: {error}", entry.file);
                    continue;
                }
                let span = entry
                    .span
                    .map_or_else(|| "no events".to_string(), |(a, b)| format!("{a}-{b}"));
                let id = entry
                    .document_id
                    .map_or_else(String::new, |id| format!(" (ID: {id})"));
                let _ = writeln!(
                    output,
                    "  {}{id}: {} events, {span}",
                    entry.file, entry.event_count
                );
            }
            output
        }
        OutputFormat::Json => format_json(&entries),
    }
}

/// Formats the rule listing.
#[must_use]
pub fn format_rules(rules: &[(&str, &str)], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut output = String::new();
            output.push_str("Rejection rules (applied in order):\n");
            for (name, description) in rules {
                let _ = writeln!(output, "  {name:<20} {description}");
            }
            output
        }
        OutputFormat::Json => {
            #[derive(Serialize)]
            struct Rule<'a> {
                name: &'a str,
                description: &'a str,
            }
            let rules: Vec<Rule<'_>> = rules
                .iter()
                .map(|(name, description)| Rule { name, description })
                .collect();
            format_json(&rules)
        }
    }
}

/// Formats an error for display.
#[must_use]
pub fn format_error(error: &Error, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => error.to_string(),
        OutputFormat::Json => format_json(&serde_json::json!({
            "error": error.to_string(),
        })),
    }
}

/// Formats a value as JSON.
fn format_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Formats a byte size as human-readable.
#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: usize) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}

/// Truncates a string to `max_len` graphemes with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if truncate_graphemes(s, max_len).len() == s.len() {
        s.to_string()
    } else if max_len <= 3 {
        truncate_graphemes(s, max_len).to_string()
    } else {
        format!("{}...", truncate_graphemes(s, max_len - 3))
    }
}
