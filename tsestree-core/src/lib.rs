//! tsestree core library - ESTree-shaped trees and scope graphs for TypeScript and JavaScript

// Global invariants enforced in this crate:
// - One file is one independent pipeline; nothing mutable is shared between files
// - Upstream parse, conversion and scope analysis never block on I/O
// - Node ids, scope ids and reference ids follow traversal order
// - Identical input and options yield identical trees and scope graphs
// - A file either yields a complete tree or a `ParseError`, never a partial tree

pub mod ast;
pub mod batch;
pub mod cache;
pub mod comments;
pub mod config;
mod convert;
pub mod error;
pub mod node_map;
mod parser;
pub mod position;
pub mod scope;
pub mod tokens;
pub mod visitor_keys;

pub use ast::{Ast, Node, NodeId, NodeKind, NodeType, SourceType};
pub use batch::{parse_batch, read_sources, CancellationFlag, FileOutcome, SourceInput};
pub use cache::ParseCache;
pub use comments::{Comment, CommentKind};
pub use config::{AnalyzeOptions, LibName, ParseOptions};
pub use error::ParseError;
pub use node_map::{ParserServices, UpstreamNode};
pub use parser::markup_enabled;
pub use position::{LineIndex, Position, Range, SourceLocation};
pub use scope::{
    Definition, DefinitionKind, Reference, ReferenceId, Scope, ScopeId, ScopeKind, ScopeManager,
    Variable, VariableId,
};
pub use tokens::{Token, TokenKind};
pub use visitor_keys::visitor_keys;

use convert::Converter;
use serde_json::Value;

/// Standardized tree of one file plus what the options asked to keep
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub file: String,
    pub ast: Ast,
    /// Present when `ParseOptions::tokens` is set
    pub tokens: Option<Vec<Token>>,
    /// Present when `ParseOptions::comments` is set
    pub comments: Option<Vec<Comment>>,
    pub services: ParserServices,
    pub line_index: LineIndex,
}

impl ParsedFile {
    pub fn source_type(&self) -> SourceType {
        self.ast.source_type()
    }

    /// ESTree JSON of the whole file
    pub fn to_estree_json(&self) -> Value {
        ast::to_estree_json(&self.ast, self.tokens.as_deref(), self.comments.as_deref())
    }
}

/// Tree and resolved scope graph of one file
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub file: ParsedFile,
    pub scope_manager: ScopeManager,
}

fn invalid_options(err: anyhow::Error) -> ParseError {
    ParseError::InvalidOptions(format!("{err:#}"))
}

/// Parse `source` and convert it to the standardized tree
pub fn parse(source: &str, options: &ParseOptions) -> Result<ParsedFile, ParseError> {
    options.validate().map_err(invalid_options)?;
    let file = options.file_name();
    let line_index = LineIndex::new(source);

    let upstream = parser::parse_upstream(source, options, &line_index)?;
    let mut comments =
        comments::collect(&upstream.comments, upstream.base, &line_index, upstream.hashbang);
    let comment_ranges: Vec<Range> = comments.iter().map(|c| c.range).collect();
    let tokens = tokens::tokenize(
        &line_index,
        &upstream.tokens,
        &upstream.markup_text,
        &comment_ranges,
    );

    let converted = Converter::new(
        file,
        upstream.base,
        &line_index,
        &tokens,
        upstream.jsx,
        options.preserve_node_maps,
    )
    .convert(&upstream.program)?;
    comments::attach(&converted.ast, &mut comments);

    tracing::debug!(
        file,
        nodes = converted.ast.len(),
        tokens = tokens.len(),
        comments = comments.len(),
        "converted"
    );

    Ok(ParsedFile {
        file: file.to_string(),
        ast: converted.ast,
        tokens: options.tokens.then_some(tokens),
        comments: options.comments.then_some(comments),
        services: ParserServices {
            node_maps: converted.node_maps,
        },
        line_index,
    })
}

/// Build and resolve the scope graph of an existing tree
pub fn analyze(ast: &Ast, options: &AnalyzeOptions) -> ScopeManager {
    let manager = ScopeManager::analyze(ast, options);
    tracing::debug!(
        scopes = manager.scope_count(),
        unresolved = manager.unresolved().count(),
        "scope analysis finished"
    );
    manager
}

/// Parse, convert and analyze one file
pub fn parse_and_analyze(
    source: &str,
    parse_options: &ParseOptions,
    analyze_options: &AnalyzeOptions,
) -> Result<ParseResult, ParseError> {
    analyze_options.validate().map_err(invalid_options)?;
    let file = parse(source, parse_options)?;
    let scope_manager = analyze(&file.ast, analyze_options);
    Ok(ParseResult {
        file,
        scope_manager,
    })
}
