//! Token stream
//!
//! Tokens are the ones the upstream lexer produced while parsing, recorded
//! by wrapping it in `Capturing`, and mapped onto ESTree token kinds.
//! Template chunks keep their delimiters (`` `a${ ``, `}b${`, `` }c` ``),
//! a private name is one token, and `</` splits into `<` and `/`.
//!
//! The capturing buffer misses what the lexer reads in markup-child
//! position, so any uncovered text outside comments is filled from the
//! tree's `JSXText` spans and single-character punctuators.
//!
//! The stream is sorted by offset and tokens never overlap.

use crate::position::{LineIndex, Range, SourceLocation};
use serde::Serialize;
use swc_ecma_parser::unstable::Token as UpstreamToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Boolean,
    Identifier,
    Keyword,
    Null,
    Numeric,
    Punctuator,
    RegularExpression,
    String,
    Template,
    JSXText,
    PrivateIdentifier,
    BigInt,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    pub value: String,
    pub range: Range,
    pub loc: SourceLocation,
}

impl Token {
    /// Whether this token is the punctuator `p`
    pub fn is_punctuator(&self, p: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.value == p
    }

    /// Whether this token is the keyword or identifier-like word `w`
    pub fn is_word(&self, w: &str) -> bool {
        matches!(
            self.kind,
            TokenKind::Keyword | TokenKind::Identifier | TokenKind::Boolean | TokenKind::Null
        ) && self.value == w
    }
}

/// Reserved words reported as `Keyword`; contextual keywords stay `Identifier`
const KEYWORDS: &[&str] = &[
    "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
    "do", "else", "enum", "export", "extends", "finally", "for", "function", "if", "import",
    "in", "instanceof", "new", "return", "super", "switch", "this", "throw", "try", "typeof",
    "var", "void", "while", "with", "implements", "interface", "let", "package", "private",
    "protected", "public", "static", "yield",
];

/// A token as captured from the upstream lexer, rebased to file offsets
#[derive(Debug, Clone, Copy)]
pub(crate) struct UpstreamTokenSpan {
    pub token: UpstreamToken,
    pub range: Range,
}

/// Build the token stream
///
/// `markup_text` are the `JSXText` ranges of the tree and `comments` the
/// comment ranges, including a hashbang line.
pub(crate) fn tokenize(
    index: &LineIndex,
    upstream: &[UpstreamTokenSpan],
    markup_text: &[Range],
    comments: &[Range],
) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(upstream.len());
    let mut i = 0;
    while i < upstream.len() {
        let current = upstream[i];
        i += 1;
        if current.range.is_empty() {
            continue;
        }
        let text = index.slice(current.range);
        if current.token == UpstreamToken::Hash {
            if let Some(name) = upstream
                .get(i)
                .filter(|next| next.token.is_word() && next.range.start == current.range.end)
            {
                i += 1;
                push(&mut tokens, index, TokenKind::PrivateIdentifier, current.range.cover(&name.range));
                continue;
            }
        }
        let Some(kind) = kind_of(current.token, text) else {
            continue;
        };
        if kind == TokenKind::Punctuator && text == "</" {
            let split = current.range.start + 1;
            push(&mut tokens, index, kind, Range::new(current.range.start, split));
            push(&mut tokens, index, kind, Range::new(split, current.range.end));
        } else {
            push(&mut tokens, index, kind, current.range);
        }
    }

    tokens.sort_by_key(|t| (t.range.start, std::cmp::Reverse(t.range.end)));
    let mut end = 0;
    tokens.retain(|t| {
        let keep = t.range.start >= end;
        if keep {
            end = t.range.end;
        }
        keep
    });

    let filler = fill_uncovered(index, &tokens, markup_text, comments);
    if !filler.is_empty() {
        tokens.extend(filler);
        tokens.sort_by_key(|t| t.range.start);
    }
    tokens
}

fn push(tokens: &mut Vec<Token>, index: &LineIndex, kind: TokenKind, range: Range) {
    tokens.push(Token {
        kind,
        value: index.slice(range).to_string(),
        range,
        loc: index.location(range),
    });
}

fn kind_of(token: UpstreamToken, text: &str) -> Option<TokenKind> {
    use UpstreamToken as T;
    let kind = match token {
        T::Shebang | T::Error | T::Eof => return None,
        T::Str => TokenKind::String,
        T::Num => TokenKind::Numeric,
        T::BigInt => TokenKind::BigInt,
        T::Regex => TokenKind::RegularExpression,
        T::Template
        | T::NoSubstitutionTemplateLiteral
        | T::TemplateHead
        | T::TemplateMiddle
        | T::TemplateTail
        | T::BackQuote => TokenKind::Template,
        T::JSXText => TokenKind::JSXText,
        T::JSXName => TokenKind::Identifier,
        t if t.is_word() => classify_word(text),
        _ => TokenKind::Punctuator,
    };
    Some(kind)
}

fn classify_word(word: &str) -> TokenKind {
    match word {
        "true" | "false" => TokenKind::Boolean,
        "null" => TokenKind::Null,
        _ if KEYWORDS.contains(&word) => TokenKind::Keyword,
        _ => TokenKind::Identifier,
    }
}

/// Tokens for source text neither a captured token nor a comment covers
fn fill_uncovered(
    index: &LineIndex,
    tokens: &[Token],
    markup_text: &[Range],
    comments: &[Range],
) -> Vec<Token> {
    let mut covered: Vec<Range> = tokens.iter().map(|t| t.range).chain(comments.iter().copied()).collect();
    covered.sort_by_key(|r| r.start);

    let mut filler = Vec::new();
    let mut cursor = 0;
    for range in covered.iter().copied().chain(std::iter::once(Range::new(index.len(), index.len()))) {
        if range.start > cursor {
            fill_gap(index, Range::new(cursor, range.start), markup_text, &mut filler);
        }
        cursor = cursor.max(range.end);
    }
    filler
}

fn fill_gap(index: &LineIndex, gap: Range, markup_text: &[Range], out: &mut Vec<Token>) {
    let text = index.slice(gap);
    let mut offset = gap.start;
    for c in text.chars() {
        let width = c.len_utf8() as u32;
        let here = offset;
        offset += width;
        if out.last().is_some_and(|t: &Token| t.range.end > here) {
            continue;
        }
        if let Some(markup) = markup_text.iter().find(|r| r.start == here && gap.contains(r) && !r.is_empty()) {
            push(out, index, TokenKind::JSXText, *markup);
            continue;
        }
        if c.is_whitespace() || c == '\u{feff}' {
            continue;
        }
        push(out, index, TokenKind::Punctuator, Range::new(here, here + width));
    }
}

fn first_at_or_after(tokens: &[Token], offset: u32) -> usize {
    tokens.partition_point(|t| t.range.start < offset)
}

/// First token starting at or after `offset`
pub fn token_after(tokens: &[Token], offset: u32) -> Option<&Token> {
    tokens.get(first_at_or_after(tokens, offset))
}

/// Last token ending at or before `offset`
pub fn token_before(tokens: &[Token], offset: u32) -> Option<&Token> {
    let idx = tokens.partition_point(|t| t.range.end <= offset);
    idx.checked_sub(1).map(|i| &tokens[i])
}

/// Tokens lying entirely inside `range`
pub fn tokens_in(tokens: &[Token], range: Range) -> &[Token] {
    let start = first_at_or_after(tokens, range.start);
    let end = start + tokens[start..].partition_point(|t| t.range.end <= range.end);
    &tokens[start..end]
}

/// First token inside `range` matching `pred`
pub fn first_token_in(
    tokens: &[Token],
    range: Range,
    pred: impl Fn(&Token) -> bool,
) -> Option<&Token> {
    tokens_in(tokens, range).iter().find(|t| pred(t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;

    fn lex(text: &str, file: &str) -> Vec<Token> {
        let options = ParseOptions {
            tokens: true,
            comments: true,
            ..ParseOptions::for_file(file)
        };
        crate::parse(text, &options).unwrap().tokens.unwrap()
    }

    fn pairs(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
        tokens.iter().map(|t| (t.kind, t.value.as_str())).collect()
    }

    fn values(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.value.as_str()).collect()
    }

    #[test]
    fn test_words_and_punctuators() {
        let tokens = lex("let x = a?.b >>>= null;", "a.ts");
        assert_eq!(
            values(&tokens),
            vec!["let", "x", "=", "a", "?.", "b", ">>>=", "null", ";"]
        );
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[7].kind, TokenKind::Null);
    }

    #[test]
    fn test_literals_and_comments() {
        let tokens = lex("const s = \"a b\" + .5 + /x y/g; // done", "a.ts");
        assert_eq!(
            pairs(&tokens),
            vec![
                (TokenKind::Keyword, "const"),
                (TokenKind::Identifier, "s"),
                (TokenKind::Punctuator, "="),
                (TokenKind::String, "\"a b\""),
                (TokenKind::Punctuator, "+"),
                (TokenKind::Numeric, ".5"),
                (TokenKind::Punctuator, "+"),
                (TokenKind::RegularExpression, "/x y/g"),
                (TokenKind::Punctuator, ";"),
            ]
        );
        assert_eq!(tokens[3].range, Range::new(10, 15));
    }

    #[test]
    fn test_template_chunks_keep_delimiters() {
        let tokens = lex("`a${b}c${d}e`;", "a.ts");
        assert_eq!(
            pairs(&tokens),
            vec![
                (TokenKind::Template, "`a${"),
                (TokenKind::Identifier, "b"),
                (TokenKind::Template, "}c${"),
                (TokenKind::Identifier, "d"),
                (TokenKind::Template, "}e`"),
                (TokenKind::Punctuator, ";"),
            ]
        );

        let tokens = lex("x = `${y}`", "a.ts");
        assert_eq!(values(&tokens), vec!["x", "=", "`${", "y", "}`"]);
        let tokens = lex("x = `plain`", "a.ts");
        assert_eq!(pairs(&tokens)[2], (TokenKind::Template, "`plain`"));
    }

    #[test]
    fn test_private_names() {
        let tokens = lex("class A { #x = 1; m() { return this.#x; } }", "a.ts");
        let private: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::PrivateIdentifier)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(private, vec!["#x", "#x"]);
        assert!(tokens.iter().all(|t| t.value != "#"));
    }

    #[test]
    fn test_markup_tokens() {
        let tokens = lex("const a = <div id=\"x\">hi {b}</div>;", "a.tsx");
        assert_eq!(
            values(&tokens),
            vec!["const", "a", "=", "<", "div", "id", "=", "\"x\"", ">", "hi ", "{", "b", "}", "<", "/", "div", ">", ";"]
        );
        let text = tokens.iter().find(|t| t.value == "hi ").unwrap();
        assert_eq!(text.kind, TokenKind::JSXText);
    }

    #[test]
    fn test_hashbang_is_not_tokenized() {
        let tokens = lex("#!/usr/bin/env node\nlet a;", "a.js");
        assert_eq!(values(&tokens), vec!["let", "a", ";"]);
    }

    #[test]
    fn test_queries() {
        let tokens = lex("foo(bar, baz)", "a.ts");
        assert_eq!(token_after(&tokens, 3).map(|t| t.value.as_str()), Some("("));
        assert_eq!(token_after(&tokens, 4).map(|t| t.value.as_str()), Some("bar"));
        assert_eq!(token_before(&tokens, 4).map(|t| t.value.as_str()), Some("("));
        assert_eq!(token_before(&tokens, 0), None);
        assert_eq!(token_after(&tokens, 13), None);
        let inner = tokens_in(&tokens, Range::new(4, 12));
        assert_eq!(values(inner), vec!["bar", ",", "baz"]);
        let comma = first_token_in(&tokens, Range::new(0, 13), |t| t.is_punctuator(","));
        assert_eq!(comma.map(|t| t.range), Some(Range::new(7, 8)));
    }

    #[test]
    fn test_tokens_are_sorted_and_disjoint() {
        let tokens = lex("const f = <T,>(a: Array<Array<T>>) => { return a ?? `${a}`; }", "a.ts");
        for pair in tokens.windows(2) {
            assert!(pair[0].range.end <= pair[1].range.start, "{:?}", pair);
        }
    }
}
