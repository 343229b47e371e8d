//! Integration tests for parsing and conversion

use std::fs;
use std::path::PathBuf;
use tsestree_core::ast::NodeKind;
use tsestree_core::comments::leading_comments;
use tsestree_core::visitor_keys::visitor_key_table;
use tsestree_core::{
    parse, parse_and_analyze, visitor_keys, AnalyzeOptions, CommentKind, NodeType, ParseError,
    ParseOptions, ParsedFile, SourceType, TokenKind,
};

const FIXTURES: &[&str] = &[
    "simple.ts",
    "classes.ts",
    "component.tsx",
    "legacy.js",
    "types.ts",
    "unicode.ts",
    "cli.js",
];

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn parse_fixture(name: &str, mut options: ParseOptions) -> ParsedFile {
    let source = fs::read_to_string(fixture_path(name)).unwrap();
    options.file_path = Some(name.to_string());
    parse(&source, &options).unwrap_or_else(|e| panic!("{name}: {e}"))
}

#[test]
fn test_all_fixtures_parse() {
    for name in FIXTURES {
        let parsed = parse_fixture(name, ParseOptions::default());
        assert_eq!(parsed.ast.node_type(parsed.ast.root()), NodeType::Program, "{name}");
        assert!(parsed.ast.len() > 1, "{name}");
    }
}

#[test]
fn test_source_type_detection() {
    assert_eq!(parse_fixture("simple.ts", ParseOptions::default()).source_type(), SourceType::Module);
    assert_eq!(parse_fixture("legacy.js", ParseOptions::default()).source_type(), SourceType::Script);
}

#[test]
fn test_positions_round_trip() {
    for name in FIXTURES {
        let parsed = parse_fixture(name, ParseOptions::default());
        for (id, node) in parsed.ast.iter() {
            assert_eq!(
                parsed.line_index.location(node.range),
                node.loc,
                "{name}: {:?} {:?}",
                id,
                node.node_type()
            );
        }
    }
}

#[test]
fn test_children_inside_parent_and_in_source_order() {
    for name in FIXTURES {
        let parsed = parse_fixture(name, ParseOptions::default());
        let ast = &parsed.ast;
        for (id, node) in ast.iter() {
            let children = ast.children(id);
            for child in &children {
                assert!(node.range.contains(&ast.range(*child)), "{name}: {:?} escapes parent", child);
                assert_eq!(ast.parent(*child), Some(id));
            }
            // Templates list every quasi before every expression, and a
            // shorthand property repeats its key as its value
            let exempt = matches!(
                node.kind,
                NodeKind::TemplateLiteral { .. }
                    | NodeKind::TSTemplateLiteralType { .. }
                    | NodeKind::Property { shorthand: true, .. }
            );
            if exempt {
                continue;
            }
            // Children come in visitor-key order, which must follow the source
            for pair in children.windows(2) {
                let (earlier, later) = (ast.range(pair[0]), ast.range(pair[1]));
                assert!(
                    earlier.end <= later.start || earlier == later,
                    "{name}: {:?} child {:?} is listed before {:?}",
                    node.node_type(),
                    earlier,
                    later
                );
            }
        }
    }
}

#[test]
fn test_template_children_interleave_by_position() {
    let parsed = parse("`a${b}c${d}e`;", &ParseOptions::for_file("t.ts")).unwrap();
    let ast = &parsed.ast;
    let (template, _) = ast
        .iter()
        .find(|(_, node)| node.node_type() == NodeType::TemplateLiteral)
        .unwrap();
    let NodeKind::TemplateLiteral { quasis, expressions } = ast.kind(template) else {
        unreachable!()
    };
    assert_eq!((quasis.len(), expressions.len()), (3, 2));
    // quasi[i] < expression[i] < quasi[i + 1]
    for (i, expression) in expressions.iter().enumerate() {
        assert!(ast.range(quasis[i]).end <= ast.range(*expression).start);
        assert!(ast.range(*expression).end <= ast.range(quasis[i + 1]).start);
    }
}

#[test]
fn test_visitor_keys_cover_every_node_type() {
    let table = visitor_key_table();
    assert_eq!(table.len(), NodeType::ALL.len());
    for node_type in NodeType::ALL {
        assert!(visitor_keys(node_type.as_str()).is_some(), "{:?}", node_type);
    }
    assert_eq!(visitor_keys("Program"), Some(&["body"][..]));
    assert!(visitor_keys("NotANode").is_none());
}

#[test]
fn test_json_carries_every_visitor_key() {
    fn check(value: &serde_json::Value) {
        match value {
            serde_json::Value::Object(map) => {
                if let Some(serde_json::Value::String(node_type)) = map.get("type") {
                    if let Some(keys) = visitor_keys(node_type) {
                        for key in keys {
                            assert!(map.contains_key(*key), "{node_type} lacks {key}");
                        }
                        assert!(map.contains_key("range") && map.contains_key("loc"));
                    }
                }
                map.values().for_each(check);
            }
            serde_json::Value::Array(items) => items.iter().for_each(check),
            _ => {}
        }
    }
    for name in FIXTURES {
        let json = parse_fixture(name, ParseOptions::default()).to_estree_json();
        assert_eq!(json["type"], "Program");
        check(&json);
    }
}

#[test]
fn test_conversion_is_idempotent() {
    let options = ParseOptions {
        tokens: true,
        comments: true,
        ..ParseOptions::default()
    };
    for name in FIXTURES {
        let first = parse_fixture(name, options.clone());
        let second = parse_fixture(name, options.clone());
        assert_eq!(first.ast, second.ast, "{name}");
        assert_eq!(
            serde_json::to_string(&first.to_estree_json()).unwrap(),
            serde_json::to_string(&second.to_estree_json()).unwrap(),
            "{name}"
        );
    }
}

#[test]
fn test_scope_graph_is_idempotent() {
    let source = fs::read_to_string(fixture_path("classes.ts")).unwrap();
    let options = ParseOptions::for_file("classes.ts");
    let analyze = AnalyzeOptions::default();
    let first = parse_and_analyze(&source, &options, &analyze).unwrap();
    let second = parse_and_analyze(&source, &options, &analyze).unwrap();
    let shape = |result: &tsestree_core::ParseResult| {
        result
            .scope_manager
            .scopes()
            .map(|(_, s)| {
                let names: Vec<_> = s
                    .variables
                    .iter()
                    .map(|v| result.scope_manager.variable(*v).name.clone())
                    .collect();
                format!("{:?} {:?} {:?} {:?} {:?}", s.kind, s.upper, names, s.references, s.through)
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&first), shape(&second));
    assert_eq!(
        format!("{:?}", first.scope_manager.references().collect::<Vec<_>>()),
        format!("{:?}", second.scope_manager.references().collect::<Vec<_>>())
    );
}

#[test]
fn test_tokens_and_comments_only_when_asked() {
    let bare = parse_fixture("simple.ts", ParseOptions::default());
    assert!(bare.tokens.is_none() && bare.comments.is_none());
    assert!(bare.to_estree_json().get("tokens").is_none());

    let full = parse_fixture(
        "simple.ts",
        ParseOptions {
            tokens: true,
            comments: true,
            ..ParseOptions::default()
        },
    );
    let tokens = full.tokens.as_ref().unwrap();
    let comments = full.comments.as_ref().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].kind, CommentKind::Line);
    assert_eq!(comments[0].value, " Counter helpers");

    // Tokens never cover comment text
    assert!(tokens.iter().all(|t| !t.range.overlaps(&comments[0].range)));
    assert!(tokens[0].is_word("export"));
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Numeric && t.value == "1"));

    let body = match full.ast.kind(full.ast.root()) {
        NodeKind::Program { body, .. } => body.clone(),
        _ => unreachable!(),
    };
    let leading = leading_comments(tokens, comments, full.ast.range(body[0]));
    assert_eq!(leading.len(), 1);
}

#[test]
fn test_hashbang_fixture() {
    let parsed = parse_fixture(
        "cli.js",
        ParseOptions {
            tokens: true,
            comments: true,
            ..ParseOptions::default()
        },
    );
    let comments = parsed.comments.as_ref().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].kind, CommentKind::Line);
    assert_eq!(comments[0].value, "/usr/bin/env node");
    assert_eq!(comments[0].loc.start.line, 1);
    assert_eq!(comments[1].value, " Print a greeting");

    let tokens = parsed.tokens.as_ref().unwrap();
    assert!(tokens[0].is_word("const"));
    assert_eq!(tokens[0].loc.start.line, 3);
    let templates: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Template)
        .map(|t| t.value.as_str())
        .collect();
    assert_eq!(templates, vec!["`hello ${", "}, ${", "} chars`"]);
}

#[test]
fn test_utf16_columns() {
    let parsed = parse_fixture("unicode.ts", ParseOptions::default());
    let (_, literal) = parsed
        .ast
        .iter()
        .find(|(_, node)| node.node_type() == NodeType::Literal)
        .unwrap();
    assert_eq!(literal.loc.start.column, 17);
    // The emoji is one code point but two UTF-16 units
    assert_eq!(literal.loc.end.column, 27);
    assert_eq!(literal.range.len(), 13);
}

#[test]
fn test_syntax_error_yields_no_tree() {
    let source = fs::read_to_string(fixture_path("broken.ts")).unwrap();
    let err = parse(&source, &ParseOptions::for_file("broken.ts")).unwrap_err();
    match err {
        ParseError::Syntax { file, line, .. } => {
            assert_eq!(file, "broken.ts");
            assert!(line >= 1);
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn test_invalid_options_rejected() {
    let options = AnalyzeOptions {
        jsx_pragma: Some(String::new()),
        ..AnalyzeOptions::default()
    };
    let err = parse_and_analyze("let a;", &ParseOptions::default(), &options).unwrap_err();
    assert!(matches!(err, ParseError::InvalidOptions(_)));
}

#[test]
fn test_node_maps_round_trip() {
    let with_maps = parse_fixture(
        "classes.ts",
        ParseOptions {
            preserve_node_maps: true,
            ..ParseOptions::default()
        },
    );
    let services = &with_maps.services;
    assert!(services.has_node_maps());
    let mut mapped = 0;
    for (id, _) in with_maps.ast.iter() {
        if let Some(upstream) = services.estree_to_upstream(id) {
            mapped += 1;
            assert!(services.upstream_to_estree(&upstream).is_some());
        }
    }
    assert!(mapped > 0);

    let without = parse_fixture("classes.ts", ParseOptions::default());
    assert!(!without.services.has_node_maps());
    assert!(without.services.estree_to_upstream(without.ast.root()).is_none());
}

#[test]
fn test_typescript_constructs_are_kept() {
    let parsed = parse_fixture("types.ts", ParseOptions::default());
    let mut seen = std::collections::BTreeSet::new();
    parsed.ast.walk(|_, node| {
        seen.insert(node.node_type().as_str());
    });
    for expected in [
        "TSConditionalType",
        "TSInferType",
        "TSMappedType",
        "TSNamedTupleMember",
        "TSDeclareFunction",
        "TSTypePredicate",
        "TSAsExpression",
        "TSSatisfiesExpression",
        "TSNonNullExpression",
        "TSTypeQuery",
        "TemplateLiteral",
        "ChainExpression",
    ] {
        assert!(seen.contains(expected), "missing {expected}");
    }
}
