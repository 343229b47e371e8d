//! Node converter: SWC program to standardized tree
//!
//! Global invariants enforced:
//! - Every upstream variant maps to a standardized node; `Invalid` is an error
//! - Children are pushed before their parent, which adopts them exactly once
//! - A node's range covers the ranges of all its children
//! - Markup mode is resolved once and carried on the converter

mod class;
mod expr;
mod jsx;
mod module;
mod pat;
mod stmt;
mod ts;

use crate::ast::{Ast, AstBuilder, NodeId, NodeKind};
use crate::error::ParseError;
use crate::node_map::{NodeMaps, UpstreamNode};
use crate::position::{LineIndex, Range};
use crate::tokens::{self, Token};
use swc_common::{BytePos, Span};
use swc_ecma_ast::{Ident, IdentName, Program};

/// Result of converting one program
pub(crate) struct Converted {
    pub ast: Ast,
    pub node_maps: Option<NodeMaps>,
}

pub(crate) struct Converter<'a> {
    file: &'a str,
    base: u32,
    index: &'a LineIndex,
    tokens: &'a [Token],
    jsx: bool,
    nodes: AstBuilder,
    maps: Option<NodeMaps>,
    error: Option<ParseError>,
}

impl<'a> Converter<'a> {
    pub(crate) fn new(
        file: &'a str,
        base: BytePos,
        index: &'a LineIndex,
        tokens: &'a [Token],
        jsx: bool,
        preserve_node_maps: bool,
    ) -> Self {
        Converter {
            file,
            base: base.0,
            index,
            tokens,
            jsx,
            nodes: AstBuilder::default(),
            maps: preserve_node_maps.then(NodeMaps::default),
            error: None,
        }
    }

    /// Convert a whole program, consuming the converter
    pub(crate) fn convert(mut self, program: &Program) -> Result<Converted, ParseError> {
        let root = self.program(program);
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(Converted {
            ast: self.nodes.finish(root),
            node_maps: self.maps,
        })
    }

    fn offset(&self, pos: BytePos) -> u32 {
        pos.0.saturating_sub(self.base).min(self.index.len())
    }

    /// File-relative range of an upstream span; `None` for dummy spans
    fn span_range(&self, span: Span) -> Option<Range> {
        if span.lo.0 == 0 && span.hi.0 == 0 {
            return None;
        }
        let start = self.offset(span.lo);
        let end = self.offset(span.hi);
        Some(Range::new(start, end.max(start)))
    }

    fn text(&self, range: Range) -> &'a str {
        let index: &'a LineIndex = self.index;
        index.slice(range)
    }

    /// Push a node produced from an upstream node
    fn make(&mut self, kind: NodeKind, span: Span, upstream: &'static str) -> NodeId {
        let own = self.span_range(span);
        self.make_at(kind, own, Some(upstream))
    }

    /// Push a node with an explicit own range, widened to cover its children
    fn make_at(&mut self, kind: NodeKind, own: Option<Range>, upstream: Option<&'static str>) -> NodeId {
        let mut cover: Option<Range> = own;
        let nodes = &self.nodes;
        kind.for_each_child(&mut |_, child| {
            let r = nodes.range(child);
            cover = Some(cover.map_or(r, |c| c.cover(&r)));
        });
        let range = cover.unwrap_or_default();
        let loc = self.index.location(range);
        let id = self.nodes.push(kind, range, loc);
        if let (Some(maps), Some(kind_name)) = (self.maps.as_mut(), upstream) {
            maps.record(
                id,
                UpstreamNode {
                    kind: kind_name,
                    range: own.unwrap_or(range),
                },
            );
        }
        id
    }

    fn range_of(&self, id: NodeId) -> Range {
        self.nodes.range(id)
    }

    /// Record an upstream construct with no mapping and return a placeholder
    fn unsupported(&mut self, kind: &'static str, span: Span) -> NodeId {
        let range = self.span_range(span);
        if self.error.is_none() {
            self.error = Some(ParseError::Unsupported {
                file: self.file.to_string(),
                kind,
                offset: range.map_or(0, |r| r.start),
            });
        }
        self.make_at(NodeKind::EmptyStatement {}, range, None)
    }

    fn token_after(&self, offset: u32) -> Option<&'a Token> {
        tokens::token_after(self.tokens, offset)
    }

    fn token_before(&self, offset: u32) -> Option<&'a Token> {
        tokens::token_before(self.tokens, offset)
    }

    fn first_token_in(&self, range: Range, pred: impl Fn(&Token) -> bool) -> Option<&'a Token> {
        tokens::first_token_in(self.tokens, range, pred)
    }

    /// Extend a statement range over a directly following `;`
    fn with_semicolon(&self, range: Range) -> Range {
        match self.token_after(range.end) {
            Some(t) if t.is_punctuator(";") && self.text(Range::new(range.end, t.range.start)).trim().is_empty() => {
                Range::new(range.start, t.range.end)
            }
            _ => range,
        }
    }

    /// Extend a range back over a leading keyword such as `declare`
    fn with_leading_word(&self, range: Range, word: &str) -> Range {
        match self.token_before(range.start) {
            Some(t) if t.is_word(word) => Range::new(t.range.start, range.end),
            _ => range,
        }
    }

    fn identifier_at(&mut self, name: String, range: Option<Range>, upstream: Option<&'static str>) -> NodeId {
        self.make_at(
            NodeKind::Identifier {
                name,
                optional: false,
                type_annotation: None,
                decorators: Vec::new(),
            },
            range,
            upstream,
        )
    }

    fn ident(&mut self, id: &Ident) -> NodeId {
        let range = self.span_range(id.span);
        self.identifier_at(id.sym.to_string(), range, Some("Ident"))
    }

    fn ident_name(&mut self, id: &IdentName) -> NodeId {
        let range = self.span_range(id.span);
        self.identifier_at(id.sym.to_string(), range, Some("IdentName"))
    }
}
