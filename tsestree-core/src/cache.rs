//! In-memory parse cache shared by batch workers.
//!
//! Cache key: the file identity (its `file_path`, or `<input>`). Each entry
//! remembers the blake3 hash of the source text and the fingerprint of both
//! option sets it was produced with. A lookup whose hash or fingerprint
//! differs is a miss, and the next insert replaces the stale entry.
//!
//! Readers never block each other; a writer only holds the lock long enough
//! to swap one entry.

use crate::config::{AnalyzeOptions, ParseOptions};
use crate::error::ParseError;
use crate::ParseResult;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct CacheEntry {
    content_hash: blake3::Hash,
    fingerprint: String,
    result: Arc<ParseResult>,
}

#[derive(Debug, Default)]
pub struct ParseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

/// Combined fingerprint of both option sets
pub fn options_fingerprint(parse: &ParseOptions, analyze: &AnalyzeOptions) -> String {
    format!("{}:{}", parse.fingerprint(), analyze.fingerprint())
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave an entry half-written, so
    // a poisoned lock is still safe to use.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Cached result for `file`, if it was produced from the same text and options
    pub fn get(&self, file: &str, source: &str, fingerprint: &str) -> Option<Arc<ParseResult>> {
        let hash = blake3::hash(source.as_bytes());
        let entries = self.read();
        let entry = entries.get(file)?;
        (entry.content_hash == hash && entry.fingerprint == fingerprint).then(|| Arc::clone(&entry.result))
    }

    /// Store `result`, replacing whatever was cached for `file`
    pub fn insert(&self, file: &str, source: &str, fingerprint: &str, result: Arc<ParseResult>) {
        let entry = CacheEntry {
            content_hash: blake3::hash(source.as_bytes()),
            fingerprint: fingerprint.to_string(),
            result,
        };
        self.write().insert(file.to_string(), entry);
    }

    /// Cached result, or a fresh parse that is then cached. Errors are not cached.
    pub fn get_or_parse(
        &self,
        source: &str,
        parse_options: &ParseOptions,
        analyze_options: &AnalyzeOptions,
    ) -> Result<Arc<ParseResult>, ParseError> {
        let file = parse_options.file_name();
        let fingerprint = options_fingerprint(parse_options, analyze_options);
        if let Some(hit) = self.get(file, source, &fingerprint) {
            tracing::trace!(file, "parse cache hit");
            return Ok(hit);
        }
        let result = Arc::new(crate::parse_and_analyze(source, parse_options, analyze_options)?);
        self.insert(file, source, &fingerprint, Arc::clone(&result));
        Ok(result)
    }

    /// Drop the entry for `file`; returns whether one existed
    pub fn invalidate(&self, file: &str) -> bool {
        self.write().remove(file).is_some()
    }

    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(file: &str) -> (ParseOptions, AnalyzeOptions) {
        (ParseOptions::for_file(file), AnalyzeOptions::default())
    }

    #[test]
    fn test_hit_on_same_text_and_options() {
        let cache = ParseCache::new();
        let (parse, analyze) = options("a.ts");
        let first = cache.get_or_parse("let a = 1;", &parse, &analyze).unwrap();
        let second = cache.get_or_parse("let a = 1;", &parse, &analyze).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_text_is_a_miss() {
        let cache = ParseCache::new();
        let (parse, analyze) = options("a.ts");
        let first = cache.get_or_parse("let a = 1;", &parse, &analyze).unwrap();
        let second = cache.get_or_parse("let a = 2;", &parse, &analyze).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        // The stale entry was replaced, not kept alongside
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_changed_options_are_a_miss() {
        let cache = ParseCache::new();
        let (parse, analyze) = options("a.ts");
        let first = cache.get_or_parse("let a = 1;", &parse, &analyze).unwrap();
        let strict = AnalyzeOptions {
            implied_strict: true,
            ..AnalyzeOptions::default()
        };
        let second = cache.get_or_parse("let a = 1;", &parse, &strict).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = ParseCache::new();
        let (parse, analyze) = options("a.ts");
        cache.get_or_parse("let a = 1;", &parse, &analyze).unwrap();
        assert!(cache.invalidate("a.ts"));
        assert!(!cache.invalidate("a.ts"));
        assert!(cache.is_empty());

        cache.get_or_parse("let a = 1;", &parse, &analyze).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = ParseCache::new();
        let (parse, analyze) = options("bad.ts");
        assert!(cache.get_or_parse("let = ;", &parse, &analyze).is_err());
        assert!(cache.is_empty());
    }
}
