//! Comment collection and attachment
//!
//! Comments are gathered once per file from the upstream comment store,
//! sorted by offset and deduplicated. Each comment is attached to the
//! innermost node whose range encloses it; the leading/trailing queries
//! work from the token stream instead of storing copies on every node.

use crate::ast::{Ast, NodeId};
use crate::position::{LineIndex, Range, SourceLocation};
use crate::tokens::{token_after, token_before, Token};
use serde::Serialize;
use swc_common::comments::{CommentKind as UpstreamCommentKind, SingleThreadedComments};
use swc_common::BytePos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CommentKind {
    Line,
    Block,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    #[serde(rename = "type")]
    pub kind: CommentKind,
    /// Text without the `//`, `/*` or `*/` delimiters
    pub value: String,
    pub range: Range,
    pub loc: SourceLocation,
    /// Innermost node whose range encloses the comment
    #[serde(skip)]
    pub enclosing: Option<NodeId>,
}

/// Drain the upstream comment store into a sorted, deduplicated list
///
/// A `#!` line is reported as a line comment whose value follows the `#!`.
pub(crate) fn collect(
    store: &SingleThreadedComments,
    base: BytePos,
    index: &LineIndex,
    hashbang: Option<Range>,
) -> Vec<Comment> {
    let (leading, trailing) = store.borrow_all();
    let mut comments: Vec<Comment> = leading
        .values()
        .chain(trailing.values())
        .flatten()
        .map(|c| {
            let start = c.span.lo.0.saturating_sub(base.0).min(index.len());
            let end = c.span.hi.0.saturating_sub(base.0).min(index.len());
            let range = index.range(start, end);
            Comment {
                kind: match c.kind {
                    UpstreamCommentKind::Line => CommentKind::Line,
                    UpstreamCommentKind::Block => CommentKind::Block,
                },
                value: c.text.to_string(),
                range,
                loc: index.location(range),
                enclosing: None,
            }
        })
        .collect();
    if let Some(range) = hashbang {
        comments.push(Comment {
            kind: CommentKind::Line,
            value: index.slice(range).trim_start_matches("#!").to_string(),
            range,
            loc: index.location(range),
            enclosing: None,
        });
    }
    comments.sort_by_key(|c| c.range.start);
    comments.dedup_by_key(|c| c.range);
    comments
}

/// Record the innermost enclosing node of every comment
pub(crate) fn attach(ast: &Ast, comments: &mut [Comment]) {
    for comment in comments.iter_mut() {
        comment.enclosing = enclosing_node(ast, comment.range);
    }
}

fn enclosing_node(ast: &Ast, range: Range) -> Option<NodeId> {
    let root = ast.root();
    if !ast.range(root).contains(&range) {
        return None;
    }
    let mut current = root;
    'descend: loop {
        for child in ast.children(current) {
            if ast.range(child).contains(&range) {
                current = child;
                continue 'descend;
            }
        }
        return Some(current);
    }
}

/// Comments between the previous token and the start of `range`
pub fn leading_comments<'a>(
    tokens: &[Token],
    comments: &'a [Comment],
    range: Range,
) -> &'a [Comment] {
    let lower = token_before(tokens, range.start).map_or(0, |t| t.range.end);
    comments_between(comments, lower, range.start)
}

/// Comments between the end of `range` and the next token
pub fn trailing_comments<'a>(
    tokens: &[Token],
    comments: &'a [Comment],
    range: Range,
) -> &'a [Comment] {
    let upper = token_after(tokens, range.end).map_or(u32::MAX, |t| t.range.start);
    comments_between(comments, range.end, upper)
}

fn comments_between(comments: &[Comment], lower: u32, upper: u32) -> &[Comment] {
    let start = comments.partition_point(|c| c.range.start < lower);
    let len = comments[start..].partition_point(|c| c.range.end <= upper);
    &comments[start..start + len]
}
