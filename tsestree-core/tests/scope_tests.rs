//! Integration tests for scope analysis through the public pipeline

use std::fs;
use std::path::PathBuf;
use tsestree_core::{
    parse_and_analyze, AnalyzeOptions, DefinitionKind, LibName, ParseOptions, ParseResult,
    ScopeKind,
};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn analyze_fixture(name: &str, options: &AnalyzeOptions) -> ParseResult {
    let source = fs::read_to_string(fixture_path(name)).unwrap();
    parse_and_analyze(&source, &ParseOptions::for_file(name), options).unwrap()
}

fn unresolved(result: &ParseResult) -> Vec<String> {
    result.scope_manager.unresolved().map(|r| r.name.clone()).collect()
}

#[test]
fn test_classes_fixture_resolves_locals() {
    let result = analyze_fixture("classes.ts", &AnalyzeOptions::default());
    let manager = &result.scope_manager;
    assert!(manager.is_module());

    let mut names = unresolved(&result);
    names.sort();
    names.dedup();
    assert!(names.is_empty(), "unexpected unresolved names: {names:?}");

    let module = manager.scopes().nth(1).map(|(id, _)| id).unwrap();
    let store_type = manager.find_variable(module, "Store", true).unwrap();
    let store_value = manager.find_variable(module, "Store", false).unwrap();
    assert_ne!(store_type, store_value);
    let logger = manager.find_variable(module, "Logger", true).unwrap();
    assert!(manager.find_variable(module, "Logger", false).is_none());
    assert!(!manager.variable(logger).references.is_empty());
    assert_eq!(
        manager.variable(logger).defs[0].kind,
        DefinitionKind::ImportBinding
    );
}

#[test]
fn test_component_fixture_marks_pragma() {
    let result = analyze_fixture("component.tsx", &AnalyzeOptions::default());
    let manager = &result.scope_manager;
    let module = manager.scopes().nth(1).map(|(id, _)| id).unwrap();
    let react = manager.variable(manager.find_variable(module, "React", false).unwrap());
    assert!(react.eslint_used);
    assert!(react.references.is_empty());

    // `Footer` is used before its declaration, inside a function
    let footer = manager.variable(manager.find_variable(module, "Footer", false).unwrap());
    assert_eq!(footer.references.len(), 2);
    assert!(unresolved(&result).is_empty());
}

#[test]
fn test_legacy_fixture_with_implicit_globals() {
    let options = AnalyzeOptions {
        implicit_globals: true,
        lib: vec![LibName::Es5, LibName::Dom],
        ..AnalyzeOptions::default()
    };
    let result = analyze_fixture("legacy.js", &options);
    let manager = &result.scope_manager;
    let global = manager.global_scope();

    let counter = manager.variable(manager.find_variable(global, "counter", false).unwrap());
    assert_eq!(counter.defs[0].kind, DefinitionKind::ImplicitGlobalVariable);
    // The read inside `with` is handed out to the global scope and binds too
    assert_eq!(counter.references.len(), 2);
    assert!(manager.find_variable(global, "enabled", false).is_some());
    let console = manager.variable(manager.find_variable(global, "console", false).unwrap());
    assert!(console.is_implicit());

    let with = manager
        .scopes()
        .find(|(_, s)| s.kind == ScopeKind::With)
        .map(|(_, s)| s)
        .unwrap();
    assert!(with.variables.is_empty());
    assert!(!with.through.is_empty());

    let mut names = unresolved(&result);
    names.sort();
    names.dedup();
    // `var` names in a script may be rebound by the host
    assert_eq!(names, vec!["config", "total"]);
}

#[test]
fn test_catch_and_labels() {
    let result = analyze_fixture("legacy.js", &AnalyzeOptions::default());
    let manager = &result.scope_manager;
    let catch = manager
        .scopes()
        .find(|(_, s)| s.kind == ScopeKind::Catch)
        .map(|(_, s)| s)
        .unwrap();
    let err = manager.variable(catch.variables[0]);
    assert_eq!(err.name, "err");
    assert_eq!(err.defs[0].kind, DefinitionKind::CatchClause);
    assert_eq!(err.references.len(), 1);
    // Labels are not variables
    assert!(manager.variables().all(|(_, v)| v.name != "label"));
}

#[test]
fn test_types_fixture() {
    let result = analyze_fixture(
        "types.ts",
        &AnalyzeOptions {
            lib: vec![LibName::Es2020],
            ..AnalyzeOptions::default()
        },
    );
    let manager = &result.scope_manager;
    assert!(unresolved(&result).is_empty(), "{:?}", unresolved(&result));

    let kinds: Vec<_> = manager.scopes().map(|(_, s)| s.kind).collect();
    for expected in [
        ScopeKind::ConditionalType,
        ScopeKind::MappedType,
        ScopeKind::Type,
        ScopeKind::Function,
    ] {
        assert!(kinds.contains(&expected), "missing {expected:?}");
    }

    // `typeof config.retries` reads the value `config`
    let global = manager.global_scope();
    let config = manager.variable(manager.find_variable(global, "config", false).unwrap());
    assert!(config
        .references
        .iter()
        .all(|r| manager.reference(*r).is_value_reference()));
    assert_eq!(config.references.len(), 4);
}
