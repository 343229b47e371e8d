use super::*;
use crate::ast::NodeType;
use crate::config::LibName;
use crate::{parse, ParseOptions, ParsedFile};

fn analyze_with(file: &str, source: &str, options: &AnalyzeOptions) -> (ParsedFile, ScopeManager) {
    let parsed = parse(source, &ParseOptions::for_file(file)).unwrap();
    let manager = ScopeManager::analyze(&parsed.ast, options);
    (parsed, manager)
}

fn analyze(source: &str) -> (ParsedFile, ScopeManager) {
    analyze_with("t.ts", source, &AnalyzeOptions::default())
}

fn names(manager: &ScopeManager, scope: ScopeId) -> Vec<&str> {
    manager
        .scope(scope)
        .variables
        .iter()
        .map(|v| manager.variable(*v).name.as_str())
        .collect()
}

fn unresolved_names(manager: &ScopeManager) -> Vec<&str> {
    manager.unresolved().map(|r| r.name.as_str()).collect()
}

fn first_of(parsed: &ParsedFile, node_type: NodeType) -> NodeId {
    let mut found = None;
    parsed.ast.walk(|id, node| {
        if found.is_none() && node.node_type() == node_type {
            found = Some(id);
        }
    });
    found.unwrap()
}

#[test]
fn test_arguments_in_function_expression() {
    let (_, manager) = analyze("(function(){ arguments; }());");
    assert_eq!(manager.scope_count(), 2);
    assert_eq!(manager.scope(ScopeId(0)).kind, ScopeKind::Global);

    let function = manager.scope(ScopeId(1));
    assert_eq!(function.kind, ScopeKind::Function);
    assert_eq!(names(&manager, ScopeId(1)), vec!["arguments"]);

    let arguments = manager.variable(function.variables[0]);
    assert!(arguments.defs.is_empty());
    assert_eq!(arguments.references.len(), 1);
    let reference = manager.reference(arguments.references[0]);
    assert_eq!(reference.resolved, Some(function.variables[0]));
    assert!(reference.is_read_only());
}

#[test]
fn test_rest_parameter_follows_arguments() {
    let (_, manager) = analyze("function foo(...bar){ return bar; }");
    assert_eq!(manager.scope_count(), 2);
    assert_eq!(names(&manager, ScopeId(0)), vec!["foo"]);
    assert_eq!(names(&manager, ScopeId(1)), vec!["arguments", "bar"]);

    let bar = manager.variable(manager.scope(ScopeId(1)).variables[1]);
    assert_eq!(bar.defs.len(), 1);
    assert_eq!(bar.defs[0].kind, DefinitionKind::Parameter);
    assert!(bar.defs[0].rest);
    assert_eq!(bar.references.len(), 1);
    assert!(manager.reference(bar.references[0]).is_resolved());
}

#[test]
fn test_named_function_expression_has_name_scope() {
    let (parsed, manager) = analyze("(function name(){}());");
    assert_eq!(manager.scope_count(), 3);

    let name_scope = manager.scope(ScopeId(1));
    assert_eq!(name_scope.kind, ScopeKind::FunctionExpressionName);
    assert!(name_scope.is_function_expression_scope());
    assert_eq!(names(&manager, ScopeId(1)), vec!["name"]);

    let function = manager.scope(ScopeId(2));
    assert_eq!(function.kind, ScopeKind::Function);
    assert_eq!(function.upper, Some(ScopeId(1)));
    assert_eq!(name_scope.child_scopes, vec![ScopeId(2)]);

    // Both scopes belong to the same node; the name scope is skipped
    let node = first_of(&parsed, NodeType::FunctionExpression);
    assert_eq!(manager.scopes_of(node), &[ScopeId(1), ScopeId(2)]);
    assert_eq!(manager.acquire(node, false), Some(ScopeId(2)));
}

#[test]
fn test_update_of_undeclared_name() {
    let (_, manager) = analyze("b++;");
    assert_eq!(manager.scope_count(), 1);
    let global = manager.scope(manager.global_scope());
    assert!(global.variables.is_empty());
    assert_eq!(global.through.len(), 1);

    let reference = manager.reference(global.through[0]);
    assert_eq!(reference.name, "b");
    assert!(reference.is_read_write());
    assert!(!reference.is_resolved());
}

#[test]
fn test_class_binds_value_and_type() {
    let (_, manager) = analyze("class C {}\nlet x: C = new C();");
    let global = manager.scope(manager.global_scope());
    let value = global.variable("C", false).unwrap();
    let ty = global.variable("C", true).unwrap();
    assert_ne!(value, ty);

    let value_refs = &manager.variable(value).references;
    assert_eq!(value_refs.len(), 1);
    assert!(manager.reference(value_refs[0]).is_value_reference());

    let type_refs = &manager.variable(ty).references;
    assert_eq!(type_refs.len(), 1);
    assert!(manager.reference(type_refs[0]).is_type_reference());
    assert!(manager.unresolved().next().is_none());
}

#[test]
fn test_value_reference_never_binds_type_alias() {
    let (_, manager) = analyze("type T = number;\nconst v = T;");
    let global = manager.scope(manager.global_scope());
    assert!(global.variable("T", false).is_none());
    assert!(manager.variable(global.variable("T", true).unwrap()).references.is_empty());
    assert_eq!(unresolved_names(&manager), vec!["T"]);
}

#[test]
fn test_type_reference_never_binds_value() {
    let (_, manager) = analyze("let x = 1;\ntype T = x;\nexport {};");
    assert!(manager.is_module());
    let module = manager.scopes().nth(1).map(|(id, _)| id).unwrap();
    assert_eq!(manager.scope(module).kind, ScopeKind::Module);
    assert!(manager.find_variable(module, "x", true).is_none());

    let x = manager.variable(manager.find_variable(module, "x", false).unwrap());
    assert_eq!(x.references.len(), 1);
    let init = manager.reference(x.references[0]);
    assert!(init.is_write_only() && init.is_value_reference());

    let unresolved: Vec<_> = manager.unresolved().collect();
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].name, "x");
    assert!(unresolved[0].is_type_reference());
    assert!(!unresolved[0].is_value_reference());
}

#[test]
fn test_type_parameters_live_in_type_scope() {
    let (_, manager) = analyze("type Box<T> = { value: T };");
    let kinds: Vec<ScopeKind> = manager.scopes().map(|(_, s)| s.kind).collect();
    assert_eq!(kinds, vec![ScopeKind::Global, ScopeKind::Type]);

    let t = manager.scope(ScopeId(1)).variable("T", true).unwrap();
    assert_eq!(manager.variable(t).references.len(), 1);
}

#[test]
fn test_infer_declares_in_conditional_scope() {
    let (_, manager) =
        analyze("type Unwrap<P> = P extends Promise<infer U> ? U : never;");
    let conditional = manager
        .scopes()
        .find(|(_, s)| s.kind == ScopeKind::ConditionalType)
        .map(|(id, _)| id)
        .unwrap();
    let u = manager.scope(conditional).variable("U", true).unwrap();
    assert_eq!(manager.variable(u).references.len(), 1);
    assert_eq!(unresolved_names(&manager), vec!["Promise"]);
}

#[test]
fn test_block_scoped_and_hoisted_declarations() {
    let (_, manager) = analyze("function f() { { let a; var b; } }");
    let kinds: Vec<ScopeKind> = manager.scopes().map(|(_, s)| s.kind).collect();
    assert_eq!(kinds, vec![ScopeKind::Global, ScopeKind::Function, ScopeKind::Block]);
    assert_eq!(names(&manager, ScopeId(1)), vec!["arguments", "b"]);
    assert_eq!(names(&manager, ScopeId(2)), vec!["a"]);
    assert_eq!(manager.scope(ScopeId(2)).variable_scope, ScopeId(1));
}

#[test]
fn test_initializer_is_write_and_init() {
    let (_, manager) = analyze("let a = 1; a = 2; a += 3;");
    let a = manager.scope(manager.global_scope()).variable("a", false).unwrap();
    let refs: Vec<&Reference> = manager
        .variable(a)
        .references
        .iter()
        .map(|r| manager.reference(*r))
        .collect();
    assert_eq!(refs.len(), 3);
    assert!(refs[0].is_write_only() && refs[0].is_init);
    assert!(refs[1].is_write_only() && !refs[1].is_init);
    assert!(refs[2].is_read_write());
    assert!(refs.iter().all(|r| r.write_expr().is_some()));
}

#[test]
fn test_global_var_in_script_stays_unresolved() {
    let (_, manager) = analyze("var a = 1; a;");
    let a = manager.scope(manager.global_scope()).variable("a", false).unwrap();
    assert!(manager.variable(a).references.is_empty());
    assert_eq!(unresolved_names(&manager), vec!["a", "a"]);
}

#[test]
fn test_global_var_in_module_resolves() {
    let (_, manager) = analyze("var a = 1; a;\nexport {};");
    assert!(manager.is_module());
    assert_eq!(manager.scope(ScopeId(1)).kind, ScopeKind::Module);
    assert!(manager.scope(ScopeId(1)).is_strict);
    let a = manager.scope(ScopeId(1)).variable("a", false).unwrap();
    assert_eq!(manager.variable(a).references.len(), 2);
    assert!(manager.unresolved().next().is_none());
}

#[test]
fn test_parameter_default_cannot_see_body_declaration() {
    let (_, manager) = analyze("function f(a = b) { var b; }\nfunction g(a, c = a) {}");
    assert_eq!(unresolved_names(&manager), vec!["b"]);

    let g = manager
        .scopes()
        .filter(|(_, s)| s.kind == ScopeKind::Function)
        .map(|(id, _)| id)
        .nth(1)
        .unwrap();
    let a = manager.scope(g).variable("a", false).unwrap();
    assert_eq!(manager.variable(a).references.len(), 1);
}

#[test]
fn test_with_hands_names_to_enclosing_scope() {
    let (_, manager) = analyze_with(
        "t.js",
        "function f(o) { var a; with (o) { a; } }",
        &AnalyzeOptions::default(),
    );
    let with = manager
        .scopes()
        .find(|(_, s)| s.kind == ScopeKind::With)
        .map(|(id, _)| id)
        .unwrap();
    assert_eq!(manager.scope(with).through.len(), 1);

    let function = manager.scope(with).upper.unwrap();
    let a = manager.scope(function).variable("a", false).unwrap();
    assert_eq!(manager.variable(a).references.len(), 1);
    assert!(manager.unresolved().next().is_none());
}

#[test]
fn test_implicit_globals_from_sloppy_assignment() {
    let options = AnalyzeOptions {
        implicit_globals: true,
        ..AnalyzeOptions::default()
    };
    let (_, manager) = analyze_with("t.js", "x = 1; x;", &options);
    let global = manager.scope(manager.global_scope());
    let x = manager.variable(global.variable("x", false).unwrap());
    assert!(!x.is_implicit());
    assert_eq!(x.defs[0].kind, DefinitionKind::ImplicitGlobalVariable);
    assert_eq!(x.references.len(), 2);
    assert!(manager.unresolved().next().is_none());

    let (_, without) = analyze_with("t.js", "x = 1; x;", &AnalyzeOptions::default());
    assert_eq!(unresolved_names(&without), vec!["x", "x"]);
}

#[test]
fn test_no_implicit_globals_in_strict_code() {
    let options = AnalyzeOptions {
        implicit_globals: true,
        ..AnalyzeOptions::default()
    };
    let (_, manager) = analyze_with("t.js", "'use strict'; x = 1;", &options);
    assert!(manager.scope(manager.global_scope()).is_strict);
    assert!(manager.scope(manager.global_scope()).variables.is_empty());
    assert_eq!(unresolved_names(&manager), vec!["x"]);
}

#[test]
fn test_lib_globals_resolve() {
    let source = "Promise.resolve(1);\nlet p: Promise<number>;";
    let options = AnalyzeOptions {
        lib: vec![LibName::Es2015],
        ..AnalyzeOptions::default()
    };
    let (_, manager) = analyze_with("t.ts", source, &options);
    assert!(manager.unresolved().next().is_none());
    let promise = manager.scope(manager.global_scope()).variable("Promise", false).unwrap();
    assert!(manager.variable(promise).defs.is_empty());

    let (_, bare) = analyze(source);
    assert_eq!(unresolved_names(&bare), vec!["Promise", "Promise"]);
}

#[test]
fn test_import_bindings() {
    let (parsed, manager) = analyze("import a, { type B, c } from 'm';\nlet x: B = a(c);");
    let module = ScopeId(1);
    let scope = manager.scope(module);
    assert!(scope.variable("a", false).is_some());
    assert!(scope.variable("a", true).is_some());
    assert!(scope.variable("B", false).is_none());
    assert!(scope.variable("B", true).is_some());
    assert!(manager.unresolved().next().is_none());

    let import = first_of(&parsed, NodeType::ImportDeclaration);
    assert!(manager.get_declared_variables(import).is_empty());
    let specifier = first_of(&parsed, NodeType::ImportDefaultSpecifier);
    assert_eq!(manager.get_declared_variables(specifier).len(), 2);
}

#[test]
fn test_jsx_pragma_marked_used() {
    let source = "import React from 'react';\nexport const a = <div />;";
    let (_, manager) = analyze_with("t.tsx", source, &AnalyzeOptions::default());
    let react = manager.scope(ScopeId(1)).variable("React", false).unwrap();
    let react = manager.variable(react);
    assert!(react.eslint_used);
    // Marking creates no reference, and intrinsic tags reference nothing
    assert!(react.references.is_empty());
    assert!(manager.unresolved().next().is_none());
}

#[test]
fn test_jsx_component_reference() {
    let (_, manager) = analyze_with("t.tsx", "const a = <Foo.Bar x={y} />;", &AnalyzeOptions::default());
    assert_eq!(unresolved_names(&manager), vec!["Foo", "y"]);
}

#[test]
fn test_enum_and_namespace_bind_both() {
    let (_, manager) = analyze("enum E { A, B = A }\nnamespace N.M { }\nlet e: E = E.A;");
    let global = manager.scope(manager.global_scope());
    for name in ["E", "N"] {
        assert!(global.variable(name, false).is_some(), "{name} value");
        assert!(global.variable(name, true).is_some(), "{name} type");
    }
    let enum_scope = manager
        .scopes()
        .find(|(_, s)| s.kind == ScopeKind::TsEnum)
        .map(|(id, _)| id)
        .unwrap();
    let a = manager.scope(enum_scope).variable("A", false).unwrap();
    assert_eq!(manager.variable(a).references.len(), 1);
    assert!(manager.unresolved().next().is_none());
}

#[test]
fn test_class_field_initializer_scope() {
    let (_, manager) = analyze("class K { x = this; static { let y; } }");
    let kinds: Vec<ScopeKind> = manager.scopes().map(|(_, s)| s.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ScopeKind::Global,
            ScopeKind::Class,
            ScopeKind::ClassFieldInitializer,
            ScopeKind::ClassStaticBlock,
        ]
    );
    assert!(manager.scopes().skip(1).all(|(_, s)| s.is_strict));
}

#[test]
fn test_global_return_adds_function_scope() {
    let options = AnalyzeOptions {
        global_return: true,
        ..AnalyzeOptions::default()
    };
    let (_, manager) = analyze_with("t.js", "var a; a;", &options);
    assert_eq!(manager.scope(ScopeId(1)).kind, ScopeKind::Function);
    assert_eq!(names(&manager, ScopeId(1)), vec!["arguments", "a"]);
    assert!(manager.unresolved().next().is_none());
}

#[test]
fn test_find_variable_walks_outward() {
    let (_, manager) = analyze("let a; function f() { let b; }");
    let function = ScopeId(1);
    assert!(manager.find_variable(function, "b", false).is_some());
    let a = manager.find_variable(function, "a", false).unwrap();
    assert_eq!(manager.variable(a).scope, manager.global_scope());
    assert!(manager.find_variable(function, "a", true).is_none());
}
