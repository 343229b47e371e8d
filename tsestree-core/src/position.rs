//! Position translation: absolute byte offsets to line/column locations
//!
//! Global invariants enforced:
//! - Lines are 1-based, columns are 0-based and counted in UTF-16 code units
//! - `\n`, `\r\n` and `\r` each terminate exactly one line
//! - Translation is monotonic in the offset
//! - An offset past the end of the text is a programming error and panics

use serde::{Serialize, Serializer};

/// Half-open byte range `[start, end)` into the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Range {
    pub start: u32,
    pub end: u32,
}

impl Range {
    pub fn new(start: u32, end: u32) -> Self {
        Range { start, end }
    }

    /// Length of the range in bytes
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Check if the range is empty
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if this range contains another range
    pub fn contains(&self, other: &Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check if this range contains an offset
    pub fn contains_offset(&self, offset: u32) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Check if this range overlaps with another range
    ///
    /// Zero-width ranges don't overlap with anything, including themselves.
    pub fn overlaps(&self, other: &Range) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.start < other.end && other.start < self.end
    }

    /// Smallest range covering both ranges
    pub fn cover(&self, other: &Range) -> Range {
        Range {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl Serialize for Range {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq([self.start, self.end])
    }
}

/// A line/column pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    /// 1-based line
    pub line: u32,
    /// 0-based column in UTF-16 code units
    pub column: u32,
}

/// Start and end positions of a node, token or comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

/// Precomputed line table for one source text
#[derive(Debug, Clone)]
pub struct LineIndex {
    text: String,
    /// Byte offset of the first character of every line
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0u32];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' => {
                    if bytes.get(i + 1) == Some(&b'\n') {
                        i += 1;
                    }
                    line_starts.push((i + 1) as u32);
                }
                b'\n' => line_starts.push((i + 1) as u32),
                _ => {}
            }
            i += 1;
        }
        LineIndex {
            text: text.to_string(),
            line_starts,
        }
    }

    /// Source text this index was built from
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the source text in bytes
    pub fn len(&self) -> u32 {
        self.text.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of lines (an empty text has one line)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Translate an absolute byte offset into a line/column position
    ///
    /// # Panics
    ///
    /// Panics if `offset` is past the end of the text.
    pub fn position(&self, offset: u32) -> Position {
        assert!(
            offset as usize <= self.text.len(),
            "offset {} is past the end of the source ({} bytes)",
            offset,
            self.text.len()
        );
        // Index of the last line start <= offset
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line_start = self.line_starts[line_idx] as usize;
        let mut end = offset as usize;
        while !self.text.is_char_boundary(end) {
            end -= 1;
        }
        let column: usize = self.text[line_start..end]
            .chars()
            .map(char::len_utf16)
            .sum();
        Position {
            line: line_idx as u32 + 1,
            column: column as u32,
        }
    }

    /// Translate a byte range into a start/end location
    pub fn location(&self, range: Range) -> SourceLocation {
        SourceLocation {
            start: self.position(range.start),
            end: self.position(range.end),
        }
    }

    /// Build a half-open range, clamping `end` so it never precedes `start`
    pub fn range(&self, start: u32, end: u32) -> Range {
        assert!(
            start as usize <= self.text.len() && end as usize <= self.text.len(),
            "range [{}, {}) is past the end of the source ({} bytes)",
            start,
            end,
            self.text.len()
        );
        Range::new(start, end.max(start))
    }

    /// Source text covered by a range
    pub fn slice(&self, range: Range) -> &str {
        self.text
            .get(range.start as usize..range.end as usize)
            .unwrap_or("")
    }
}
