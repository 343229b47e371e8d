//! Tests for the upstream parse boundary

#[cfg(test)]
mod parser_tests {
    use crate::ast::SourceType;
    use crate::config::ParseOptions;
    use crate::error::ParseError;
    use crate::parser::{self, UpstreamParse};
    use crate::position::LineIndex;
    use swc_ecma_parser::unstable::Token;
    use swc_ecma_ast::Program;

    fn parse_with(src: &str, options: &ParseOptions) -> Result<UpstreamParse, ParseError> {
        let index = LineIndex::new(src);
        parser::parse_upstream(src, options, &index)
    }

    fn parse_test(src: &str, filename: &str) -> Result<UpstreamParse, ParseError> {
        parse_with(src, &ParseOptions::for_file(filename))
    }

    #[test]
    fn test_parse_simple_function_typescript() {
        let result = parse_test("function foo() { return 42; }", "test.ts");
        assert!(result.is_ok(), "Should parse simple TypeScript function");
    }

    #[test]
    fn test_parse_typescript_types() {
        let src = "function foo(x: number): number { return x * 2; }";
        assert!(parse_test(src, "test.ts").is_ok(), "Should parse TypeScript types");
        assert!(parse_test(src, "test.js").is_err(), "Type annotations are not JavaScript");
    }

    #[test]
    fn test_parse_rejects_jsx_in_plain_typescript() {
        let src = "function foo() { return <div>hello</div>; }";
        let result = parse_test(src, "test.ts");
        assert!(
            matches!(result, Err(ParseError::Syntax { .. })),
            "JSX syntax should cause parse error in .ts files (use .tsx instead)"
        );
    }

    #[test]
    fn test_parse_accepts_jsx_in_markup_extensions() {
        let src = "function foo() { return <div>hello</div>; }";
        for filename in ["test.tsx", "test.jsx", "test.js", "test.mjs"] {
            let result = parse_test(src, filename);
            assert!(result.is_ok(), "JSX should parse in {}", filename);
            assert!(result.map(|p| p.jsx).unwrap_or(false));
        }
    }

    #[test]
    fn test_jsx_option_only_applies_to_unknown_extensions() {
        let src = "const a = <b/>;";
        let unknown = ParseOptions {
            jsx: Some(true),
            ..ParseOptions::for_file("component.vue")
        };
        assert!(parse_with(src, &unknown).is_ok());

        let forced_ts = ParseOptions {
            jsx: Some(true),
            ..ParseOptions::for_file("component.ts")
        };
        assert!(!parser::markup_enabled(&forced_ts));

        let no_path = ParseOptions::default();
        assert!(!parser::markup_enabled(&no_path));
    }

    #[test]
    fn test_source_type_detection() {
        let module = parse_test("import a from 'a';", "test.ts").unwrap();
        assert!(matches!(module.program, Program::Module(_)));

        let script = parse_test("var a = 1;", "test.ts").unwrap();
        assert!(matches!(script.program, Program::Script(_)));

        let forced = parse_with(
            "var a = 1;",
            &ParseOptions {
                source_type: Some(SourceType::Module),
                ..ParseOptions::for_file("test.ts")
            },
        )
        .unwrap();
        assert!(matches!(forced.program, Program::Module(_)));

        let mjs = parse_test("var a = 1;", "test.mjs").unwrap();
        assert!(matches!(mjs.program, Program::Module(_)));
    }

    #[test]
    fn test_syntax_error_carries_position() {
        let err = parse_test("let a = 1;\nlet b = ;", "broken.ts")
            .err()
            .expect("should fail");
        match err {
            ParseError::Syntax {
                file, line, offset, ..
            } => {
                assert_eq!(file, "broken.ts");
                assert_eq!(line, 2);
                assert!(offset >= 11);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_lexer_tokens_are_captured() {
        let src = "const s = `a${b}c` + /re/g;";
        let parsed = parse_test(src, "test.ts").unwrap();
        let captured: Vec<(Token, &str)> = parsed
            .tokens
            .iter()
            .map(|t| (t.token, &src[t.range.start as usize..t.range.end as usize]))
            .collect();
        assert!(captured.contains(&(Token::TemplateHead, "`a${")));
        assert!(captured.contains(&(Token::TemplateTail, "}c`")));
        assert!(captured.contains(&(Token::Regex, "/re/g")));
        assert!(parsed.tokens.windows(2).all(|w| w[0].range.end <= w[1].range.start));
        assert!(parsed.hashbang.is_none());
    }

    #[test]
    fn test_hashbang_line_is_located() {
        let parsed = parse_test("#!/usr/bin/env node\nlet a;", "cli.js").unwrap();
        let hashbang = parsed.hashbang.expect("hashbang range");
        assert_eq!((hashbang.start, hashbang.end), (0, 19));
    }

    #[test]
    fn test_markup_text_spans_are_collected() {
        let src = "const a = <p>hi</p>;";
        let parsed = parse_test(src, "test.tsx").unwrap();
        assert_eq!(parsed.markup_text.len(), 1);
        let text = parsed.markup_text[0];
        assert_eq!(&src[text.start as usize..text.end as usize], "hi");
    }

    #[test]
    fn test_comments_are_collected() {
        let parsed = parse_test("// lead\nlet a = 1; /* tail */", "test.ts").unwrap();
        let (leading, trailing) = parsed.comments.borrow_all();
        let total: usize = leading.values().chain(trailing.values()).map(Vec::len).sum();
        assert_eq!(total, 2);
    }
}
