//! Upstream parse using SWC
//!
//! Global invariants enforced:
//! - Markup mode is decided once per file, from the extension first and the
//!   `jsx` option only when the extension doesn't decide it
//! - The earliest diagnostic (fatal or recovered) in source order wins
//! - A program with an `Invalid` node left by error recovery is rejected

use crate::ast::SourceType;
use crate::config::ParseOptions;
use crate::error::ParseError;
use crate::position::{LineIndex, Range};
use crate::tokens::UpstreamTokenSpan;
use swc_common::comments::SingleThreadedComments;
use swc_common::{sync::Lrc, BytePos, FileName, SourceFile, SourceMap, Span, Spanned};
use swc_ecma_ast::{EsVersion, Invalid, JSXText, Program};
use swc_ecma_parser::unstable::Capturing;
use swc_ecma_parser::{lexer::Lexer, EsSyntax, Parser, StringInput, Syntax, TsSyntax};
use swc_ecma_visit::{Visit, VisitWith};

const TS_EXTENSIONS: &[&str] = &[".ts", ".mts", ".cts"];
const TSX_EXTENSIONS: &[&str] = &[".tsx", ".mtsx", ".ctsx"];
const JS_EXTENSIONS: &[&str] = &[".js", ".mjs", ".cjs"];
const JSX_EXTENSIONS: &[&str] = &[".jsx", ".mjsx", ".cjsx"];

fn has_extension(path: &str, extensions: &[&str]) -> bool {
    extensions.iter().any(|ext| path.ends_with(ext))
}

/// Resolve markup mode for a file
///
/// `.tsx`/`.jsx` families and plain JavaScript accept markup, the `.ts`
/// family never does; any other name falls back to the `jsx` option.
pub fn markup_enabled(options: &ParseOptions) -> bool {
    let Some(path) = options.file_path.as_deref() else {
        return options.jsx.unwrap_or(false);
    };
    if has_extension(path, TSX_EXTENSIONS) || has_extension(path, JSX_EXTENSIONS) {
        true
    } else if has_extension(path, TS_EXTENSIONS) {
        false
    } else if has_extension(path, JS_EXTENSIONS) {
        true
    } else {
        options.jsx.unwrap_or(false)
    }
}

/// Determine the syntax configuration for a file
fn syntax_for_file(options: &ParseOptions, jsx: bool) -> Syntax {
    let path = options.file_path.as_deref().unwrap_or("");
    let is_javascript = has_extension(path, JS_EXTENSIONS) || has_extension(path, JSX_EXTENSIONS);
    if is_javascript {
        Syntax::Es(EsSyntax {
            jsx,
            decorators: options.decorators,
            allow_return_outside_function: options.allow_return_outside_function,
            ..Default::default()
        })
    } else {
        // Unknown extensions parse as TypeScript, a superset of the plain language
        Syntax::Typescript(TsSyntax {
            tsx: jsx,
            decorators: true,
            dts: options.is_declaration_file(),
            ..Default::default()
        })
    }
}

/// Module/script decision before parsing; `None` lets the parser detect it
fn forced_source_type(options: &ParseOptions) -> Option<SourceType> {
    if options.source_type.is_some() {
        return options.source_type;
    }
    let path = options.file_path.as_deref().unwrap_or("");
    if path.ends_with(".mjs") || path.ends_with(".mts") {
        Some(SourceType::Module)
    } else if path.ends_with(".cjs") || path.ends_with(".cts") {
        Some(SourceType::Script)
    } else {
        None
    }
}

/// Output of a successful upstream parse
pub(crate) struct UpstreamParse {
    pub program: Program,
    /// Upstream position of byte 0 of the file
    pub base: BytePos,
    pub comments: SingleThreadedComments,
    pub jsx: bool,
    /// Tokens the lexer produced, in source order
    pub tokens: Vec<UpstreamTokenSpan>,
    /// Ranges of `JSXText` nodes
    pub markup_text: Vec<Range>,
    /// The `#!` line, when the file starts with one
    pub hashbang: Option<Range>,
}

/// Collects markup text spans and the first invalid node in one walk
#[derive(Default)]
struct NodeScan {
    markup_text: Vec<Span>,
    invalid: Option<Span>,
}

impl Visit for NodeScan {
    fn visit_jsx_text(&mut self, n: &JSXText) {
        self.markup_text.push(n.span);
    }

    fn visit_invalid(&mut self, n: &Invalid) {
        if self.invalid.map_or(true, |seen| n.span.lo < seen.lo) {
            self.invalid = Some(n.span);
        }
    }
}

fn syntax_error(file: &str, index: &LineIndex, base: BytePos, span: Span, message: String) -> ParseError {
    let offset = span.lo.0.saturating_sub(base.0).min(index.len());
    let position = index.position(offset);
    ParseError::Syntax {
        file: file.to_string(),
        offset,
        line: position.line,
        column: position.column,
        message,
    }
}

/// The first line when it starts with `#!`
fn hashbang_line(index: &LineIndex) -> Option<Range> {
    let text = index.text();
    if !text.starts_with("#!") {
        return None;
    }
    let end = text
        .find(['\n', '\r', '\u{2028}', '\u{2029}'])
        .unwrap_or(text.len());
    Some(index.range(0, end as u32))
}

/// Parse source text with SWC
///
/// Returns the upstream program, its comments, and the captured token
/// stream; any diagnostic aborts with a `ParseError::Syntax`.
pub(crate) fn parse_upstream(
    src: &str,
    options: &ParseOptions,
    index: &LineIndex,
) -> Result<UpstreamParse, ParseError> {
    let file = options.file_name();
    let jsx = markup_enabled(options);
    let syntax = syntax_for_file(options, jsx);

    let source_map: Lrc<SourceMap> = Default::default();
    let source_file: Lrc<SourceFile> = source_map.new_source_file(
        FileName::Custom(file.into()).into(),
        src.to_string(),
    );
    let base = source_file.start_pos;
    let comments = SingleThreadedComments::default();

    let (result, mut errors, captured) = {
        let lexer = Lexer::new(
            syntax,
            EsVersion::EsNext,
            StringInput::from(&*source_file),
            Some(&comments),
        );
        let mut parser = Parser::new_from(Capturing::new(lexer));
        let result = match forced_source_type(options) {
            Some(SourceType::Module) => parser.parse_module().map(Program::Module),
            Some(SourceType::Script) => parser.parse_script().map(Program::Script),
            None => parser.parse_program(),
        };
        let errors = parser.take_errors();
        let captured = parser.input_mut().iter_mut().take();
        (result, errors, captured)
    };

    let program = match result {
        Ok(program) => Some(program),
        Err(err) => {
            errors.push(err);
            None
        }
    };
    if let Some(first) = errors.iter().min_by_key(|e| e.span().lo) {
        return Err(syntax_error(
            file,
            index,
            base,
            first.span(),
            first.kind().msg().to_string(),
        ));
    }
    let Some(program) = program else {
        return Err(syntax_error(file, index, base, Span::default(), "empty parse".to_string()));
    };

    let mut scan = NodeScan::default();
    program.visit_with(&mut scan);
    if let Some(span) = scan.invalid {
        return Err(syntax_error(file, index, base, span, "invalid syntax".to_string()));
    }

    let rebase = |span: Span| {
        let start = span.lo.0.saturating_sub(base.0).min(index.len());
        let end = span.hi.0.saturating_sub(base.0).min(index.len());
        index.range(start, end)
    };
    let tokens: Vec<UpstreamTokenSpan> = captured
        .into_iter()
        .map(|t| UpstreamTokenSpan {
            token: t.token,
            range: rebase(t.span),
        })
        .collect();
    let has_shebang = match &program {
        Program::Module(m) => m.shebang.is_some(),
        Program::Script(s) => s.shebang.is_some(),
    };
    let hashbang = has_shebang.then(|| hashbang_line(index)).flatten();
    let markup_text = scan.markup_text.into_iter().map(rebase).collect();

    tracing::trace!(file, jsx, tokens = tokens.len(), "upstream parse finished");
    Ok(UpstreamParse {
        program,
        base,
        comments,
        jsx,
        tokens,
        markup_text,
        hashbang,
    })
}

#[cfg(test)]
#[path = "parser/tests.rs"]
mod tests;
