//! Parallel parsing of many files
//!
//! Each file runs its own parse, convert and analyze pipeline on a rayon
//! worker. Results come back in input order. A failing file never affects
//! the others, and a raised cancellation flag stops files that have not
//! started yet.

use crate::cache::ParseCache;
use crate::config::{AnalyzeOptions, ParseOptions};
use crate::error::ParseError;
use crate::ParseResult;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// One file to parse: its identity and full text
#[derive(Debug, Clone)]
pub struct SourceInput {
    pub file: String,
    pub source: String,
}

impl SourceInput {
    pub fn new(file: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum FileOutcome {
    Parsed(Arc<ParseResult>),
    Failed(ParseError),
    /// The batch was cancelled before this file started
    Cancelled,
}

impl FileOutcome {
    pub fn parsed(&self) -> Option<&ParseResult> {
        match self {
            FileOutcome::Parsed(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ParseError> {
        match self {
            FileOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Shared stop signal for a running batch
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Parse and analyze every input, in parallel, keeping input order
///
/// `parse_options.file_path` is replaced per file by the input's `file`.
/// With a cache, unchanged files are served from it and fresh results are
/// stored back.
pub fn parse_batch(
    inputs: &[SourceInput],
    parse_options: &ParseOptions,
    analyze_options: &AnalyzeOptions,
    cache: Option<&ParseCache>,
    cancel: &CancellationFlag,
) -> Vec<FileOutcome> {
    let outcomes: Vec<FileOutcome> = inputs
        .par_iter()
        .map(|input| {
            if cancel.is_cancelled() {
                return FileOutcome::Cancelled;
            }
            let options = ParseOptions {
                file_path: Some(input.file.clone()),
                ..parse_options.clone()
            };
            let result = match cache {
                Some(cache) => cache.get_or_parse(&input.source, &options, analyze_options),
                None => crate::parse_and_analyze(&input.source, &options, analyze_options).map(Arc::new),
            };
            match result {
                Ok(result) => FileOutcome::Parsed(result),
                Err(err) => {
                    tracing::warn!(file = %input.file, error = %err, "skipping file");
                    FileOutcome::Failed(err)
                }
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|o| o.error().is_some()).count();
    tracing::debug!(files = inputs.len(), failed, "batch finished");
    outcomes
}

/// Read files from disk into batch inputs; the file identity is the path as given
pub fn read_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<SourceInput>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let source = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read file: {}", path.display()))?;
            Ok(SourceInput::new(path.to_string_lossy(), source))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn inputs() -> Vec<SourceInput> {
        vec![
            SourceInput::new("a.ts", "const a: number = 1;"),
            SourceInput::new("broken.ts", "function ("),
            SourceInput::new("c.tsx", "const c = <div>{a}</div>;"),
        ]
    }

    #[test]
    fn test_failure_is_isolated_and_order_kept() {
        let outcomes = parse_batch(
            &inputs(),
            &ParseOptions::default(),
            &AnalyzeOptions::default(),
            None,
            &CancellationFlag::new(),
        );
        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].parsed().unwrap().file.file, "a.ts");
        assert!(matches!(outcomes[1].error(), Some(ParseError::Syntax { file, .. }) if file == "broken.ts"));
        assert_eq!(outcomes[2].parsed().unwrap().file.file, "c.tsx");
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancellationFlag::new();
        cancel.cancel();
        let outcomes = parse_batch(
            &inputs(),
            &ParseOptions::default(),
            &AnalyzeOptions::default(),
            None,
            &cancel,
        );
        assert!(outcomes.iter().all(|o| matches!(o, FileOutcome::Cancelled)));
    }

    #[test]
    fn test_batch_fills_cache() {
        let cache = ParseCache::new();
        let cancel = CancellationFlag::new();
        let first = parse_batch(
            &inputs(),
            &ParseOptions::default(),
            &AnalyzeOptions::default(),
            Some(&cache),
            &cancel,
        );
        assert_eq!(cache.len(), 2);

        let second = parse_batch(
            &inputs(),
            &ParseOptions::default(),
            &AnalyzeOptions::default(),
            Some(&cache),
            &cancel,
        );
        match (&first[0], &second[0]) {
            (FileOutcome::Parsed(a), FileOutcome::Parsed(b)) => assert!(Arc::ptr_eq(a, b)),
            other => panic!("expected two parsed outcomes, got {:?}", other),
        }
    }

    #[test]
    fn test_read_sources() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.ts");
        fs::write(&path, "let x = 1;").unwrap();

        let sources = read_sources(&[&path]).unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].source, "let x = 1;");

        let missing = dir.path().join("missing.ts");
        let err = read_sources(&[&missing]).unwrap_err();
        assert!(err.to_string().contains("failed to read file"));
    }
}
