//! Error types surfaced by the parse pipeline
//!
//! The only externally visible failure of the core is "no tree for file X,
//! for reason Y". Unresolved references are not errors.

use thiserror::Error;

/// Reason a file produced no standardized tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The upstream parser reported a diagnostic, or left an invalid node behind.
    #[error("{file}:{line}:{column}: {message}")]
    Syntax {
        file: String,
        /// Byte offset into the source text
        offset: u32,
        /// 1-based line
        line: u32,
        /// 0-based column
        column: u32,
        message: String,
    },

    /// The converter met an upstream construct it has no mapping for.
    ///
    /// This is a converter defect, not a user error.
    #[error("{file}: unsupported {kind} at offset {offset}")]
    Unsupported {
        file: String,
        kind: &'static str,
        offset: u32,
    },

    /// Options failed validation before parsing started.
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

impl ParseError {
    /// File name the error refers to, if any
    pub fn file(&self) -> Option<&str> {
        match self {
            ParseError::Syntax { file, .. } | ParseError::Unsupported { file, .. } => Some(file),
            ParseError::InvalidOptions(_) => None,
        }
    }

    /// Whether this error came from the user's source rather than from a defect or misuse
    pub fn is_syntax(&self) -> bool {
        matches!(self, ParseError::Syntax { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display() {
        let err = ParseError::Syntax {
            file: "a.ts".to_string(),
            offset: 12,
            line: 2,
            column: 4,
            message: "Expression expected".to_string(),
        };
        assert_eq!(err.to_string(), "a.ts:2:4: Expression expected");
        assert_eq!(err.file(), Some("a.ts"));
        assert!(err.is_syntax());
    }

    #[test]
    fn test_invalid_options_has_no_file() {
        let err = ParseError::InvalidOptions("jsx_pragma must not be empty".to_string());
        assert_eq!(err.file(), None);
        assert!(!err.is_syntax());
    }
}
