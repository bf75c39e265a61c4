//! CLI command implementations.
//!
//! Contains the business logic for each CLI command.

use crate::cli::output::{
    BatchEntry, CandidateVerdict, OutputFormat, format_batch, format_candidates, format_check,
    format_document, format_document_list, format_report, format_rules, format_scan,
    format_status,
};
use crate::cli::parser::{Cli, Commands, ExtractorArgs};
use crate::core::{Document, DocumentRecord};
use crate::error::{CommandError, Error, Result, StorageError};
use crate::extraction::{
    DocumentTimeline, ExtractorConfig, YearExtractor, available_rules, create_rule,
    extract_batch, extract_batch_with_threads, summarize,
};
use crate::io::{TimelineExport, read_text, read_timeline_json, write_timeline_json};
use crate::storage::{SqliteStore, TimelineStore};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Executes the CLI command.
///
/// # Arguments
///
/// * `cli` - Parsed CLI arguments.
///
/// # Returns
///
/// Result with output string on success.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn execute(cli: &Cli) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);
    let db_path = cli.get_db_path();

    match &cli.command {
        Commands::Init { force } => cmd_init(&db_path, *force, format),
        Commands::Status => cmd_status(&db_path, format),
        Commands::Reset { yes } => cmd_reset(&db_path, *yes, format),
        Commands::Scan {
            file,
            name,
            no_store,
            extractor,
        } => cmd_scan(
            &db_path,
            file,
            name.as_deref(),
            *no_store,
            extractor,
            format,
        ),
        Commands::Batch {
            files,
            threads,
            extractor,
        } => cmd_batch(&db_path, files, *threads, extractor, format),
        Commands::Candidates {
            file,
            rejected,
            extractor,
        } => cmd_candidates(file, *rejected, extractor, format),
        Commands::Check {
            year,
            context,
            extractor,
        } => cmd_check(*year, context, extractor, format),
        Commands::ListDocuments => cmd_list_documents(&db_path, format),
        Commands::ShowDocument { document, events } => {
            cmd_show_document(&db_path, document, *events, format)
        }
        Commands::Report { document } => cmd_report(&db_path, document, format),
        Commands::Export {
            document,
            output,
            pretty,
        } => cmd_export(&db_path, document, output.as_deref(), *pretty),
        Commands::Import { file, name } => cmd_import(&db_path, file, name.as_deref(), format),
        Commands::DeleteDocument { document, yes } => {
            cmd_delete_document(&db_path, document, *yes)
        }
        Commands::Rules => cmd_rules(format),
    }
}

/// Rejects database paths that cannot be a database file.
fn check_db_path(db_path: &Path) -> Result<()> {
    if db_path.is_dir() {
        return Err(Error::Config {
            message: format!("database path is a directory: {}", db_path.display()),
        });
    }
    Ok(())
}

/// Opens storage and ensures it's initialized.
fn open_store(db_path: &Path) -> Result<SqliteStore> {
    check_db_path(db_path)?;
    let store = SqliteStore::open(db_path)?;

    if !store.is_initialized()? {
        return Err(StorageError::NotInitialized.into());
    }

    Ok(store)
}

/// Resolves a document identifier (ID or name) to a stored record.
fn resolve_document(store: &SqliteStore, identifier: &str) -> Result<DocumentRecord> {
    // Try as ID first
    if let Ok(id) = identifier.parse::<i64>()
        && let Some(document) = store.get_document(id)?
    {
        return Ok(document);
    }

    if let Some(document) = store.get_document_by_name(identifier)? {
        return Ok(document);
    }

    Err(StorageError::DocumentNotFound {
        identifier: identifier.to_string(),
    }
    .into())
}

/// Returns the ID of a record that came from the store.
fn document_id(record: &DocumentRecord) -> Result<i64> {
    record.id.ok_or_else(|| Error::InvalidState {
        message: format!("stored document {} has no ID", record.display_name()),
    })
}

/// Builds an extractor from command-line flags.
fn build_extractor(args: &ExtractorArgs) -> Result<YearExtractor> {
    YearExtractor::new(args.to_config())
}

// ==================== Command Implementations ====================

fn cmd_init(db_path: &Path, force: bool, _format: OutputFormat) -> Result<String> {
    check_db_path(db_path)?;

    if db_path.exists() && !force {
        return Err(CommandError::ExecutionFailed(
            "Database already exists. Use --force to reinitialize.".to_string(),
        )
        .into());
    }

    if force && db_path.exists() {
        std::fs::remove_file(db_path).map_err(|e| {
            CommandError::ExecutionFailed(format!("Failed to remove existing database: {e}"))
        })?;
    }

    let mut store = SqliteStore::open(db_path)?;
    store.init()?;

    Ok(format!(
        "Initialized timeline database at: {}\n",
        db_path.display()
    ))
}

fn cmd_status(db_path: &Path, format: OutputFormat) -> Result<String> {
    let store = open_store(db_path)?;
    let stats = store.stats()?;
    Ok(format_status(&stats, format))
}

fn cmd_reset(db_path: &Path, yes: bool, _format: OutputFormat) -> Result<String> {
    if !yes {
        return Err(CommandError::ExecutionFailed(
            "Use --yes to confirm reset. This will delete all timelines.".to_string(),
        )
        .into());
    }

    let mut store = open_store(db_path)?;
    store.reset()?;

    Ok("Timeline store reset successfully.\n".to_string())
}

fn cmd_scan(
    db_path: &Path,
    file: &Path,
    name: Option<&str>,
    no_store: bool,
    args: &ExtractorArgs,
    format: OutputFormat,
) -> Result<String> {
    let extractor = build_extractor(args)?;

    // Fail before the (possibly long) scan if the store is missing
    let store = if no_store {
        None
    } else {
        Some(open_store(db_path)?)
    };

    let content = read_text(file).inspect_err(|e| {
        warn!(file = %file.display(), error = %e, "input rejected");
    })?;

    let mut document = Document::from_file(file.to_path_buf(), content);
    if let Some(name) = name {
        document.name = Some(name.to_string());
    }

    let timeline = DocumentTimeline::scan(&extractor, &document)?;

    let document_id = match store {
        Some(mut store) => {
            Some(store.replace_timeline(&timeline.record, &timeline.summary.events)?)
        }
        None => None,
    };

    Ok(format_scan(
        &timeline.record,
        &timeline.summary,
        document_id,
        format,
    ))
}

fn cmd_batch(
    db_path: &Path,
    files: &[PathBuf],
    threads: Option<usize>,
    args: &ExtractorArgs,
    format: OutputFormat,
) -> Result<String> {
    if threads == Some(0) {
        return Err(CommandError::InvalidArgument("--threads must be at least 1".to_string()).into());
    }

    let extractor = build_extractor(args)?;
    let mut store = open_store(db_path)?;

    let mut entries = Vec::with_capacity(files.len());
    let mut documents = Vec::new();
    let mut slots = Vec::new();
    let mut seen = HashSet::new();

    for file in files {
        let mut entry = BatchEntry {
            file: file.display().to_string(),
            document_id: None,
            event_count: 0,
            span: None,
            error: None,
        };
        // Keyed by the path as given; equal file names in different
        // directories stay apart
        let name = file.display().to_string();
        if !seen.insert(name.clone()) {
            entry.error = Some("duplicate of an earlier input".to_string());
            entries.push(entry);
            continue;
        }
        match read_text(file) {
            Ok(content) => {
                slots.push(entries.len());
                let mut document = Document::from_file(file.clone(), content);
                document.name = Some(name);
                documents.push(document);
            }
            Err(e) => {
                warn!(file = %file.display(), error = %e, "input rejected");
                entry.error = Some(e.to_string());
            }
        }
        entries.push(entry);
    }

    let results = match threads {
        Some(n) => extract_batch_with_threads(&extractor, &documents, n)?,
        None => extract_batch(&extractor, &documents),
    };

    for (slot, result) in slots.into_iter().zip(results) {
        let entry = &mut entries[slot];
        match result {
            Ok(timeline) => {
                let id = store.replace_timeline(&timeline.record, &timeline.summary.events)?;
                entry.document_id = Some(id);
                entry.event_count = timeline.summary.events.len();
                entry.span = timeline
                    .summary
                    .span
                    .map(|s| (s.earliest_year, s.latest_year));
            }
            Err(e) => entry.error = Some(e.to_string()),
        }
    }

    Ok(format_batch(&entries, format))
}

fn cmd_candidates(
    file: &Path,
    rejected_only: bool,
    args: &ExtractorArgs,
    format: OutputFormat,
) -> Result<String> {
    let extractor = build_extractor(args)?;
    let content = read_text(file)?;

    let verdicts: Vec<CandidateVerdict> = extractor
        .candidates(&content)?
        .map(|candidate| {
            let rejected_by = extractor.rejection_reason(&candidate.context, candidate.value);
            CandidateVerdict {
                value: candidate.value,
                offset: candidate.start_offset,
                context: candidate.context,
                rejected_by,
            }
        })
        .filter(|verdict| !rejected_only || verdict.rejected_by.is_some())
        .collect();

    Ok(format_candidates(&verdicts, format))
}

fn cmd_check(year: u16, context: &str, args: &ExtractorArgs, format: OutputFormat) -> Result<String> {
    let extractor = build_extractor(args)?;
    let rejected_by = extractor.rejection_reason(context, year);
    let confidence = extractor.config().confidence_for(year);
    Ok(format_check(year, rejected_by, confidence, format))
}

fn cmd_list_documents(db_path: &Path, format: OutputFormat) -> Result<String> {
    let store = open_store(db_path)?;
    let documents = store.list_documents()?;
    Ok(format_document_list(&documents, format))
}

fn cmd_show_document(
    db_path: &Path,
    identifier: &str,
    show_events: bool,
    format: OutputFormat,
) -> Result<String> {
    let store = open_store(db_path)?;
    let document = resolve_document(&store, identifier)?;

    let events = if show_events {
        Some(store.get_events(document_id(&document)?)?)
    } else {
        None
    };

    Ok(format_document(&document, events.as_deref(), format))
}

fn cmd_report(db_path: &Path, identifier: &str, format: OutputFormat) -> Result<String> {
    let store = open_store(db_path)?;
    let document = resolve_document(&store, identifier)?;
    let events = store.get_events(document_id(&document)?)?;

    let summary = summarize(&events, &document.effective_config());
    Ok(format_report(&document.display_name(), &summary, format))
}

fn cmd_export(
    db_path: &Path,
    identifier: &str,
    output: Option<&Path>,
    pretty: bool,
) -> Result<String> {
    let store = open_store(db_path)?;
    let document = resolve_document(&store, identifier)?;
    let events = store.get_events(document_id(&document)?)?;

    let export = TimelineExport {
        document: Some(document.display_name()),
        config: document.config.clone(),
        events,
    };

    if let Some(path) = output {
        write_timeline_json(path, &export, pretty)?;
        Ok(format!(
            "Exported {} events to: {}\n",
            export.events.len(),
            path.display()
        ))
    } else {
        let mut json = export.to_json(pretty)?;
        json.push('\n');
        Ok(json)
    }
}

fn cmd_import(
    db_path: &Path,
    file: &Path,
    name: Option<&str>,
    format: OutputFormat,
) -> Result<String> {
    let mut store = open_store(db_path)?;
    let export = read_timeline_json(file)?;
    let config = export.effective_config()?;
    export.validate(&config).inspect_err(|e| {
        warn!(file = %file.display(), error = %e, "import rejected");
    })?;

    let name = name
        .map(String::from)
        .or_else(|| export.document.clone())
        .or_else(|| file.file_stem().and_then(|n| n.to_str()).map(String::from))
        .ok_or_else(|| CommandError::MissingArgument("--name".to_string()))?;

    let mut record = DocumentRecord::imported(name.clone(), export.events.len());
    record.config = export.config.clone();
    let id = store.replace_timeline(&record, &export.events)?;

    match format {
        OutputFormat::Text => Ok(format!(
            "Imported {} events as {name} (ID: {id})\n",
            export.events.len()
        )),
        OutputFormat::Json => {
            let result = serde_json::json!({
                "document_id": id,
                "name": name,
                "event_count": export.events.len(),
            });
            Ok(serde_json::to_string_pretty(&result).unwrap_or_default())
        }
    }
}

fn cmd_delete_document(db_path: &Path, identifier: &str, yes: bool) -> Result<String> {
    if !yes {
        return Err(
            CommandError::ExecutionFailed("Use --yes to confirm deletion.".to_string()).into(),
        );
    }

    let mut store = open_store(db_path)?;
    let document = resolve_document(&store, identifier)?;
    store.delete_document(document_id(&document)?)?;

    Ok(format!("Deleted document: {}\n", document.display_name()))
}

fn cmd_rules(format: OutputFormat) -> Result<String> {
    let config = ExtractorConfig::new();
    let rules = available_rules()
        .into_iter()
        .map(|name| create_rule(name, &config).map(|rule| (name, rule.description())))
        .collect::<Result<Vec<_>>>()?;
    Ok(format_rules(&rules, format))
}
