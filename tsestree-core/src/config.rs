//! Parse and analysis options
//!
//! Both option sets deserialize from JSON with every field optional, the way
//! a host tool would pass them through from its own configuration. Options
//! are validated before any work starts; an invalid set yields
//! `ParseError::InvalidOptions` and no tree.

use crate::ast::SourceType;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Default factory name used by classic JSX transforms
pub const DEFAULT_JSX_PRAGMA: &str = "React";

/// Options for the upstream parse and the node converter
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// File name used in errors and for extension-driven syntax selection
    pub file_path: Option<String>,

    /// Markup mode for files whose extension doesn't decide it (default: off)
    pub jsx: Option<bool>,

    /// Force script or module parsing (default: detect from import/export)
    pub source_type: Option<SourceType>,

    /// Accept decorator syntax (always on for TypeScript files)
    pub decorators: bool,

    /// Parse as an ambient declaration file (default: from a `.d.ts` path)
    pub dts: Option<bool>,

    /// Include the token stream in the result
    pub tokens: bool,

    /// Include comments in the result
    pub comments: bool,

    /// Keep the standardized-node to upstream-node maps for type-aware callers
    pub preserve_node_maps: bool,

    /// Accept `return` at the top level of a script
    pub allow_return_outside_function: bool,
}

/// Library declaration sets whose globals are made implicitly available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibName {
    Es5,
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Es2022,
    Es2023,
    EsNext,
    Dom,
}

/// Options for scope building and reference resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzeOptions {
    /// Analyze as script or module (default: the tree's own source type)
    pub source_type: Option<SourceType>,

    /// Treat the program body as if it were wrapped in a function
    pub global_return: bool,

    /// Treat the whole program as strict code
    pub implied_strict: bool,

    /// Resolve unknown top-level names to implicit global variables (scripts only)
    pub implicit_globals: bool,

    /// Library globals declared in the global scope
    pub lib: Vec<LibName>,

    /// JSX factory marked as used by JSX elements (default: `React`)
    pub jsx_pragma: Option<String>,

    /// JSX fragment factory marked as used by fragments
    pub jsx_fragment_name: Option<String>,
}

impl ParseOptions {
    /// Options for a named file, everything else defaulted
    pub fn for_file(file_path: impl Into<String>) -> Self {
        ParseOptions {
            file_path: Some(file_path.into()),
            ..Default::default()
        }
    }

    /// File name reported in errors
    pub fn file_name(&self) -> &str {
        self.file_path.as_deref().unwrap_or("<input>")
    }

    /// Whether the file is an ambient declaration file
    pub fn is_declaration_file(&self) -> bool {
        self.dts.unwrap_or_else(|| {
            self.file_path.as_deref().is_some_and(|p| {
                p.ends_with(".d.ts") || p.ends_with(".d.mts") || p.ends_with(".d.cts")
            })
        })
    }

    /// Validate the options for contradictions
    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.file_path {
            if path.is_empty() {
                anyhow::bail!("file_path must not be empty when given");
            }
        }
        if self.jsx == Some(true) && self.dts == Some(true) {
            anyhow::bail!("jsx cannot be enabled for declaration files");
        }
        if self.allow_return_outside_function && self.source_type == Some(SourceType::Module) {
            anyhow::bail!("allow_return_outside_function requires script source_type");
        }
        Ok(())
    }

    /// Stable hash of the option set, used as a cache key component
    pub fn fingerprint(&self) -> String {
        fingerprint_of(self)
    }
}

impl AnalyzeOptions {
    /// Resolved JSX factory name
    pub fn jsx_pragma(&self) -> &str {
        self.jsx_pragma.as_deref().unwrap_or(DEFAULT_JSX_PRAGMA)
    }

    /// Validate the options for contradictions
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("jsx_pragma", &self.jsx_pragma),
            ("jsx_fragment_name", &self.jsx_fragment_name),
        ] {
            if let Some(name) = value {
                if !is_identifier_name(name) {
                    anyhow::bail!("{} must be an identifier (got {:?})", field, name);
                }
            }
        }
        if self.implicit_globals && self.source_type == Some(SourceType::Module) {
            anyhow::bail!("implicit_globals has no effect on modules; use source_type script");
        }
        Ok(())
    }

    /// Stable hash of the option set, used as a cache key component
    pub fn fingerprint(&self) -> String {
        fingerprint_of(self)
    }
}

fn fingerprint_of<T: Serialize>(value: &T) -> String {
    // Struct fields serialize in declaration order, so the encoding is stable
    let encoded = serde_json::to_vec(value).unwrap_or_default();
    blake3::hash(&encoded).to_hex().to_string()
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let opts: ParseOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, ParseOptions::default());
        assert_eq!(opts.file_name(), "<input>");

        let analyze: AnalyzeOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(analyze.jsx_pragma(), "React");
        assert!(analyze.lib.is_empty());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<ParseOptions, _> = serde_json::from_str(r#"{"project": "tsconfig.json"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_json_fields() {
        let opts: ParseOptions = serde_json::from_str(
            r#"{"file_path": "a.tsx", "source_type": "module", "tokens": true}"#,
        )
        .unwrap();
        assert_eq!(opts.file_path.as_deref(), Some("a.tsx"));
        assert_eq!(opts.source_type, Some(SourceType::Module));
        assert!(opts.tokens);

        let analyze: AnalyzeOptions =
            serde_json::from_str(r#"{"lib": ["es2015", "dom"], "implied_strict": true}"#).unwrap();
        assert_eq!(analyze.lib, vec![LibName::Es2015, LibName::Dom]);
        assert!(analyze.implied_strict);
    }

    #[test]
    fn test_declaration_file_detection() {
        assert!(ParseOptions::for_file("types/index.d.ts").is_declaration_file());
        assert!(!ParseOptions::for_file("index.ts").is_declaration_file());
        let forced = ParseOptions {
            dts: Some(true),
            ..ParseOptions::for_file("index.ts")
        };
        assert!(forced.is_declaration_file());
    }

    #[test]
    fn test_validate_rejects_contradictions() {
        let bad = ParseOptions {
            jsx: Some(true),
            dts: Some(true),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let bad_pragma = AnalyzeOptions {
            jsx_pragma: Some("not valid".to_string()),
            ..Default::default()
        };
        assert!(bad_pragma.validate().is_err());

        let good = AnalyzeOptions {
            jsx_pragma: Some("h".to_string()),
            jsx_fragment_name: Some("Fragment".to_string()),
            ..Default::default()
        };
        assert!(good.validate().is_ok());
    }

    #[test]
    fn test_fingerprint_tracks_every_field() {
        let base = ParseOptions::for_file("a.ts");
        let same = ParseOptions::for_file("a.ts");
        let other = ParseOptions {
            tokens: true,
            ..ParseOptions::for_file("a.ts")
        };
        assert_eq!(base.fingerprint(), same.fingerprint());
        assert_ne!(base.fingerprint(), other.fingerprint());

        let analyze = AnalyzeOptions::default();
        let with_lib = AnalyzeOptions {
            lib: vec![LibName::Es5],
            ..Default::default()
        };
        assert_ne!(analyze.fingerprint(), with_lib.fingerprint());
    }
}
