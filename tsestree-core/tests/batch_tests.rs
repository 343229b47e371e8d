//! Integration tests for multi-file parsing and the parse cache

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tsestree_core::{
    parse_batch, read_sources, AnalyzeOptions, CancellationFlag, FileOutcome, ParseCache,
    ParseError, ParseOptions, SourceInput,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_inputs(names: &[&str]) -> Vec<SourceInput> {
    let paths: Vec<PathBuf> = names.iter().map(|n| fixture_path(n)).collect();
    read_sources(&paths).unwrap()
}

#[test]
fn test_syntax_error_is_isolated() {
    let inputs = fixture_inputs(&["simple.ts", "broken.ts", "component.tsx", "legacy.js"]);
    let outcomes = parse_batch(
        &inputs,
        &ParseOptions::default(),
        &AnalyzeOptions::default(),
        None,
        &CancellationFlag::new(),
    );

    assert_eq!(outcomes.len(), inputs.len());
    for (input, outcome) in inputs.iter().zip(&outcomes) {
        if input.file.ends_with("broken.ts") {
            let err = outcome.error().unwrap();
            assert!(err.is_syntax());
            assert_eq!(err.file(), Some(input.file.as_str()));
        } else {
            let parsed = outcome.parsed().unwrap_or_else(|| panic!("{} failed", input.file));
            assert_eq!(parsed.file.file, input.file);
        }
    }
}

#[test]
fn test_batch_matches_single_file_parse() {
    let inputs = fixture_inputs(&["classes.ts", "types.ts"]);
    let outcomes = parse_batch(
        &inputs,
        &ParseOptions::default(),
        &AnalyzeOptions::default(),
        None,
        &CancellationFlag::new(),
    );
    for (input, outcome) in inputs.iter().zip(&outcomes) {
        let single = tsestree_core::parse_and_analyze(
            &input.source,
            &ParseOptions::for_file(input.file.clone()),
            &AnalyzeOptions::default(),
        )
        .unwrap();
        let batched = outcome.parsed().unwrap();
        assert_eq!(batched.file.ast, single.file.ast);
        assert_eq!(
            batched.scope_manager.scope_count(),
            single.scope_manager.scope_count()
        );
    }
}

#[test]
fn test_cache_invalidated_by_edit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("edited.ts");
    fs::write(&path, "export const a = 1;").unwrap();

    let cache = ParseCache::new();
    let cancel = CancellationFlag::new();
    let parse_options = ParseOptions::default();
    let analyze_options = AnalyzeOptions::default();

    let run = |cache: &ParseCache| {
        let inputs = read_sources(&[&path]).unwrap();
        let mut outcomes = parse_batch(&inputs, &parse_options, &analyze_options, Some(cache), &cancel);
        match outcomes.remove(0) {
            FileOutcome::Parsed(result) => result,
            other => panic!("expected a parse, got {other:?}"),
        }
    };

    let first = run(&cache);
    let unchanged = run(&cache);
    assert!(Arc::ptr_eq(&first, &unchanged));

    fs::write(&path, "export const a = 1;\nexport const b = a;").unwrap();
    let edited = run(&cache);
    assert!(!Arc::ptr_eq(&first, &edited));
    assert!(edited.file.ast.len() > first.file.ast.len());
    assert_eq!(cache.len(), 1);

    let file = path.to_string_lossy().to_string();
    assert!(cache.invalidate(&file));
    let reparsed = run(&cache);
    assert!(!Arc::ptr_eq(&edited, &reparsed));
    assert_eq!(reparsed.file.ast, edited.file.ast);
}

#[test]
fn test_cancelled_batch_does_no_work() {
    let inputs = fixture_inputs(&["simple.ts", "types.ts"]);
    let cache = ParseCache::new();
    let cancel = CancellationFlag::new();
    cancel.cancel();
    let outcomes = parse_batch(
        &inputs,
        &ParseOptions::default(),
        &AnalyzeOptions::default(),
        Some(&cache),
        &cancel,
    );
    assert!(outcomes.iter().all(|o| matches!(o, FileOutcome::Cancelled)));
    assert!(cache.is_empty());
}

#[test]
fn test_invalid_options_fail_every_file() {
    let inputs = fixture_inputs(&["simple.ts"]);
    let options = AnalyzeOptions {
        jsx_pragma: Some("not a name".to_string()),
        ..AnalyzeOptions::default()
    };
    let outcomes = parse_batch(
        &inputs,
        &ParseOptions::default(),
        &options,
        None,
        &CancellationFlag::new(),
    );
    assert!(matches!(outcomes[0].error(), Some(ParseError::InvalidOptions(_))));
}
