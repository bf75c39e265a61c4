//! Integration tests for yearline.

#![allow(clippy::expect_used)]

use yearline::core::{Document, DocumentRecord, ValidatedYear};
use yearline::extraction::{ExtractorConfig, YearExtractor, extract_batch};
use yearline::storage::{SqliteStore, TimelineStore};
use tempfile::TempDir;

/// Helper to create a test store instance.
fn create_test_store() -> (SqliteStore, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let mut store = SqliteStore::open(&db_path).expect("Failed to create store");
    store.init().expect("Failed to init store");
    (store, temp_dir)
}

fn extractor() -> YearExtractor {
    YearExtractor::new(ExtractorConfig::new()).expect("default config is valid")
}

const MEMOIR: &str = "\
In 1916, Dulles had problems with the Nazis. The committee filed \
resolution B3-2058-2068-2078 and cross-referenced 2087-90. By 1945 the \
war was over; in 1948 he returned, and 1953 brought the new directorate. \
The archive index 1961-1962-1963 is unrelated. He wrote again in 1990.";

#[test]
fn test_memoir_timeline() {
    let summary = extractor().timeline(MEMOIR).expect("timeline");
    let years: Vec<u16> = summary.events.iter().map(|e| e.year).collect();
    assert_eq!(years, vec![1916, 1945, 1948, 1953, 1990]);

    let span = summary.span.expect("span");
    assert_eq!(span.earliest_year, 1916);
    assert_eq!(span.latest_year, 1990);
    assert_eq!(span.event_count, 5);

    assert_eq!(summary.decades.get(1940), Some(2));
    assert_eq!(summary.decades.get(1960), None);
    assert_eq!(summary.low_confidence_count, 1);
}

#[test]
fn test_store_round_trip_keeps_order() {
    let (mut store, _temp) = create_test_store();

    let doc = Document::from_named("memoir".to_string(), MEMOIR.to_string());
    let events = extractor()
        .extract_validated_years(&doc.content)
        .expect("extract");
    let record = DocumentRecord::from_document(&doc, events.len());

    let id = store.save_timeline(&record, &events).expect("save");
    let loaded = store.get_events(id).expect("get_events");
    assert_eq!(loaded, events);

    let stats = store.stats().expect("stats");
    assert_eq!(stats.document_count, 1);
    assert_eq!(stats.event_count, events.len());
}

#[test]
fn test_storage_reset() {
    let (mut store, _temp) = create_test_store();

    store
        .save_timeline(
            &DocumentRecord::imported("doc".to_string(), 1),
            &[ValidatedYear::new(1950, 0)],
        )
        .expect("save");
    store.reset().expect("reset");

    let stats = store.stats().expect("stats");
    assert_eq!(stats.document_count, 0);
    assert_eq!(stats.event_count, 0);
}

#[test]
fn test_batch_matches_sequential() {
    let ex = extractor();
    let docs: Vec<Document> = (0..32u16)
        .map(|i| {
            Document::from_named(
                format!("doc-{i}"),
                format!("{MEMOIR} Appendix {} and ref Z9-{}.", 1900 + i * 3, 1950 + i),
            )
        })
        .collect();

    let parallel = extract_batch(&ex, &docs);
    for (doc, result) in docs.iter().zip(parallel) {
        let timeline = result.expect("batch result");
        let sequential = ex.timeline(&doc.content).expect("sequential");
        assert_eq!(timeline.summary, sequential);
        assert_eq!(timeline.record.name, doc.name);
    }
}

/// Property tests over generated text.
mod property_tests {
    use proptest::prelude::*;
    use yearline::extraction::{ExtractorConfig, YearExtractor};

    fn extractor() -> YearExtractor {
        YearExtractor::new(ExtractorConfig::new()).expect("default config is valid")
    }

    /// Text built from words, years, identifiers and chains.
    fn yearish_text() -> impl Strategy<Value = String> {
        let piece = prop_oneof![
            "[a-zA-Zé世 ,.]{1,12}",
            (1850u16..2150).prop_map(|y| y.to_string()),
            ("[A-Z]", 0u8..10, 1900u16..2100).prop_map(|(p, d, y)| format!("{p}{d}-{y}")),
            (1900u16..2100, 1900u16..2100, 1900u16..2100)
                .prop_map(|(a, b, c)| format!("{a}-{b}-{c}")),
        ];
        prop::collection::vec(piece, 0..30).prop_map(|parts| parts.join(" "))
    }

    proptest! {
        #[test]
        fn validated_years_within_bounds(text in yearish_text()) {
            let events = extractor().extract_validated_years(&text).expect("text input");
            for event in &events {
                prop_assert!((1900..=2025).contains(&event.year));
            }
        }

        #[test]
        fn offsets_point_at_the_year(text in yearish_text()) {
            let events = extractor().extract_validated_years(&text).expect("text input");
            for event in &events {
                let at: String = text.chars().skip(event.source_offset).take(4).collect();
                prop_assert_eq!(at, event.year.to_string());
            }
        }

        #[test]
        fn events_in_text_order(text in yearish_text()) {
            let events = extractor().extract_validated_years(&text).expect("text input");
            for pair in events.windows(2) {
                prop_assert!(pair[0].source_offset < pair[1].source_offset);
            }
        }

        #[test]
        fn extraction_is_idempotent(text in yearish_text()) {
            let ex = extractor();
            let first = ex.extract_validated_years(&text).expect("text input");
            let second = ex.extract_validated_years(&text).expect("text input");
            prop_assert_eq!(first, second);
        }

        #[test]
        fn decades_account_for_every_event(text in yearish_text()) {
            let summary = extractor().timeline(&text).expect("text input");
            let total: usize = summary.decades.iter().map(|(_, n)| n).sum();
            prop_assert_eq!(total, summary.events.len());
            prop_assert!(summary.decades.iter().all(|(_, n)| n > 0));
            prop_assert_eq!(summary.span.is_none(), summary.events.is_empty());
        }

        #[test]
        fn is_valid_year_is_total(context in "\\PC{0,60}", year in any::<u16>()) {
            let ex = extractor();
            let valid = ex.is_valid_year(&context, year);
            prop_assert_eq!(valid, ex.rejection_reason(&context, year).is_none());
        }
    }
}

/// CLI command integration tests.
mod cli_tests {
    use std::path::PathBuf;
    use tempfile::TempDir;
    use yearline::cli::commands::execute;
    use yearline::cli::parser::{Cli, Commands, ExtractorArgs};

    /// Helper to create a CLI struct with custom `db_path`.
    fn make_cli(db_path: PathBuf, command: Commands) -> Cli {
        Cli {
            db_path: Some(db_path),
            verbose: false,
            format: "text".to_string(),
            command,
        }
    }

    /// Helper to create a CLI struct with JSON format.
    fn make_cli_json(db_path: PathBuf, command: Commands) -> Cli {
        Cli {
            db_path: Some(db_path),
            verbose: false,
            format: "json".to_string(),
            command,
        }
    }

    fn init(db_path: &std::path::Path) {
        let cli = make_cli(db_path.to_path_buf(), Commands::Init { force: false });
        execute(&cli).expect("init");
    }

    fn scan(db_path: &std::path::Path, file: PathBuf, name: Option<&str>) -> String {
        let cli = make_cli(
            db_path.to_path_buf(),
            Commands::Scan {
                file,
                name: name.map(String::from),
                no_store: false,
                extractor: ExtractorArgs::default(),
            },
        );
        execute(&cli).expect("scan")
    }

    #[test]
    fn test_cmd_init() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("test.db");

        let cli = make_cli(db_path.clone(), Commands::Init { force: false });
        let result = execute(&cli);
        assert!(result.expect("init result").contains("Initialized"));
        assert!(db_path.exists());
    }

    #[test]
    fn test_cmd_status_json() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("test.db");
        init(&db_path);

        let cli = make_cli_json(db_path, Commands::Status);
        let output = execute(&cli).expect("json output");
        assert!(output.contains("document_count"));
    }

    #[test]
    fn test_cmd_status_not_initialized() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("nonexistent.db");

        let cli = make_cli(db_path, Commands::Status);
        let err = execute(&cli).expect_err("status should fail");
        assert!(err.to_string().contains("yearline init"));
    }

    #[test]
    fn test_scan_then_report() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("test.db");
        init(&db_path);

        let file = temp_dir.path().join("memoir.txt");
        std::fs::write(&file, super::MEMOIR).expect("write");
        let output = scan(&db_path, file, Some("memoir"));
        assert!(output.contains("Span:         1916-1990"));

        let cli = make_cli(
            db_path.clone(),
            Commands::Report {
                document: "memoir".to_string(),
            },
        );
        let report = execute(&cli).expect("report");
        assert!(report.contains("1940s      2"));
        assert!(report.contains("Low confidence (1):"));

        let cli = make_cli(db_path, Commands::ListDocuments);
        let list = execute(&cli).expect("list");
        assert!(list.contains("memoir"));
    }

    #[test]
    fn test_scan_json_no_events() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("test.db");

        let file = temp_dir.path().join("plain.txt");
        std::fs::write(&file, "Nothing dated here, only B3-2058.").expect("write");

        let cli = make_cli_json(
            db_path,
            Commands::Scan {
                file,
                name: None,
                no_store: true,
                extractor: ExtractorArgs::default(),
            },
        );
        let output = execute(&cli).expect("scan");
        assert!(output.contains("\"span\": null"));
        assert!(output.contains("\"document_id\": null"));
    }

    #[test]
    fn test_export_import() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("test.db");
        init(&db_path);

        let file = temp_dir.path().join("memoir.txt");
        std::fs::write(&file, super::MEMOIR).expect("write");
        scan(&db_path, file, Some("memoir"));

        let json_path = temp_dir.path().join("memoir.json");
        let cli = make_cli(
            db_path.clone(),
            Commands::Export {
                document: "memoir".to_string(),
                output: Some(json_path.clone()),
                pretty: true,
            },
        );
        assert!(execute(&cli).expect("export").contains("Exported 5 events"));

        let cli = make_cli(
            db_path.clone(),
            Commands::Import {
                file: json_path,
                name: Some("memoir-copy".to_string()),
            },
        );
        execute(&cli).expect("import");

        let cli = make_cli(
            db_path,
            Commands::ShowDocument {
                document: "memoir-copy".to_string(),
                events: true,
            },
        );
        let shown = execute(&cli).expect("show");
        assert!(shown.contains("Events:       5"));
    }

    #[test]
    fn test_rules() {
        let temp_dir = TempDir::new().expect("temp dir");
        let cli = make_cli_json(temp_dir.path().join("unused.db"), Commands::Rules);
        let output = execute(&cli).expect("rules");
        assert!(output.contains("\"name\": \"year-range\""));
    }
}

/// End-to-end tests of the `yearline` binary.
mod binary_tests {
    use assert_cmd::cargo::cargo_bin_cmd;
    use predicates::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn check_prints_verdict() {
        let mut cmd = cargo_bin_cmd!("yearline");
        cmd.args(["check", "2058", "resolution B3-2058-2068"]);
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("2058: rejected by year-range"));
    }

    #[test]
    fn scan_without_store() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = temp_dir.path().join("memoir.txt");
        std::fs::write(&file, super::MEMOIR).expect("write");

        let mut cmd = cargo_bin_cmd!("yearline");
        cmd.arg("scan").arg(&file).arg("--no-store");
        cmd.assert().success().stdout(
            predicate::str::contains("Span:         1916-1990")
                .and(predicate::str::contains("Stored as").not()),
        );
    }

    #[test]
    fn status_uses_env_db_path() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("env.db");

        let mut cmd = cargo_bin_cmd!("yearline");
        cmd.env("YEARLINE_DB_PATH", &db_path).arg("init");
        cmd.assert().success();

        let mut cmd = cargo_bin_cmd!("yearline");
        cmd.env("YEARLINE_DB_PATH", &db_path).arg("status");
        cmd.assert()
            .success()
            .stdout(predicate::str::contains("Documents:     0"));
    }

    #[test]
    fn binary_input_fails() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = temp_dir.path().join("blob.bin");
        std::fs::write(&file, b"1950\x00\x00").expect("write");

        let mut cmd = cargo_bin_cmd!("yearline");
        cmd.arg("scan").arg(&file).arg("--no-store");
        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("invalid input at byte offset 4"));
    }

    #[test]
    fn import_of_implausible_years_fails() {
        let temp_dir = TempDir::new().expect("temp dir");
        let db_path = temp_dir.path().join("test.db");
        let json = temp_dir.path().join("bad.json");
        std::fs::write(
            &json,
            r#"{"events":[{"year":0,"source_offset":0},{"year":65535,"source_offset":5}]}"#,
        )
        .expect("write");

        let mut cmd = cargo_bin_cmd!("yearline");
        cmd.arg("--db-path").arg(&db_path).arg("init");
        cmd.assert().success();

        let mut cmd = cargo_bin_cmd!("yearline");
        cmd.arg("--db-path")
            .arg(&db_path)
            .arg("import")
            .arg(&json)
            .args(["--name", "x"]);
        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("invalid event #0 (year 0)"));

        let mut cmd = cargo_bin_cmd!("yearline");
        cmd.arg("--db-path").arg(&db_path).args(["report", "x"]);
        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("document not found: x"));
    }

    #[test]
    fn json_errors_go_to_stdout() {
        let temp_dir = TempDir::new().expect("temp dir");

        let mut cmd = cargo_bin_cmd!("yearline");
        cmd.arg("--db-path")
            .arg(temp_dir.path().join("missing.db"))
            .args(["--format", "json", "list"]);
        cmd.assert()
            .failure()
            .stdout(predicate::str::contains("\"error\""));
    }
}
