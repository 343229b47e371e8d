//! Scope builder
//!
//! One pre-order pass over the tree. Scope-introducing nodes open a frame on
//! entry and close it on exit; declarations are registered in the current
//! frame (or its variable scope for `var` and function names) and every
//! identifier use becomes an unresolved reference in the frame it occurs in.
//!
//! Value positions go through `visit`, type positions through `visit_type`.
//! The same `Identifier` kind is a value reference in one and a type
//! reference in the other.

use super::lib_globals;
use super::pattern::{self, PatternParts};
use super::{
    Definition, DefinitionKind, Reference, ReferenceFlag, ReferenceMode, ScopeId, ScopeKind,
    ScopeManager,
};
use crate::ast::{
    Ast, ImportExportKind, LiteralValue, ModuleKind, NodeId, NodeKind, NodeType, SourceType,
    VariableKind,
};
use crate::config::AnalyzeOptions;

/// A reference about to be recorded
struct RefInfo {
    flag: ReferenceFlag,
    mode: ReferenceMode,
    write_expr: Option<NodeId>,
    is_init: bool,
    implicit_global: Option<NodeId>,
}

impl RefInfo {
    fn read(mode: ReferenceMode) -> Self {
        Self {
            flag: ReferenceFlag::Read,
            mode,
            write_expr: None,
            is_init: false,
            implicit_global: None,
        }
    }

    fn write(write_expr: NodeId, is_init: bool) -> Self {
        Self {
            flag: ReferenceFlag::Write,
            mode: ReferenceMode::Value,
            write_expr: Some(write_expr),
            is_init,
            implicit_global: None,
        }
    }
}

/// Which binding universes a declaration lands in
#[derive(Clone, Copy)]
enum Binds {
    Value,
    Type,
    Both,
}

impl Binds {
    fn modes(self) -> &'static [bool] {
        match self {
            Binds::Value => &[false],
            Binds::Type => &[true],
            Binds::Both => &[false, true],
        }
    }
}

fn definition(kind: DefinitionKind, name: NodeId, node: NodeId) -> Definition {
    Definition {
        kind,
        name,
        node,
        parent: None,
        index: None,
        declaration_kind: None,
        rest: false,
    }
}

pub(super) struct ScopeBuilder<'a> {
    ast: &'a Ast,
    options: &'a AnalyzeOptions,
    manager: ScopeManager,
    stack: Vec<ScopeId>,
    jsx_pragma_marked: bool,
    jsx_fragment_marked: bool,
}

impl<'a> ScopeBuilder<'a> {
    pub(super) fn new(ast: &'a Ast, options: &'a AnalyzeOptions, source_type: SourceType) -> Self {
        Self {
            ast,
            options,
            manager: ScopeManager::new(source_type),
            stack: Vec::new(),
            jsx_pragma_marked: false,
            jsx_fragment_marked: false,
        }
    }

    pub(super) fn build(mut self) -> ScopeManager {
        self.program(self.ast.root());
        self.manager
    }

    // Frames

    fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or(ScopeId(0))
    }

    fn variable_scope(&self) -> ScopeId {
        self.manager.scope(self.current()).variable_scope
    }

    fn open(&mut self, kind: ScopeKind, block: NodeId, strict_directive: bool) -> ScopeId {
        let upper = self.stack.last().copied();
        let id = self.manager.push_scope(kind, block, upper, strict_directive);
        tracing::trace!(scope = id.0, kind = kind.as_str(), node = block.0, "open scope");
        self.stack.push(id);
        id
    }

    fn close(&mut self) {
        if let Some(id) = self.stack.pop() {
            tracing::trace!(scope = id.0, "close scope");
        }
    }

    fn has_use_strict(&self, statements: &[NodeId]) -> bool {
        statements
            .iter()
            .map_while(|s| match self.ast.kind(*s) {
                NodeKind::ExpressionStatement {
                    directive: Some(d), ..
                } => Some(d.as_str()),
                _ => None,
            })
            .any(|d| d == "use strict")
    }

    // Declarations and references

    fn name_of(&self, id: NodeId) -> Option<&'a str> {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Literal {
                value: LiteralValue::String(s),
                ..
            } => Some(s.as_str()),
            _ => ast.identifier_name(id),
        }
    }

    fn declare(&mut self, scope: ScopeId, binds: Binds, def: Definition) {
        let Some(name) = self.name_of(def.name) else {
            return;
        };
        for &type_mode in binds.modes() {
            self.manager.define(scope, name, type_mode, Some(def.clone()));
        }
    }

    fn reference(&mut self, identifier: NodeId, info: RefInfo) {
        let Some(name) = self.ast.identifier_name(identifier) else {
            return;
        };
        let from = self.current();
        self.manager.push_reference(Reference {
            identifier,
            name: name.to_string(),
            from,
            resolved: None,
            flag: info.flag,
            mode: info.mode,
            is_init: info.is_init,
            write_expr: info.write_expr,
            maybe_implicit_global: info.implicit_global,
        });
    }

    /// Leftmost identifier of `a.b.c`
    fn leftmost(&self, mut id: NodeId) -> Option<NodeId> {
        loop {
            match self.ast.kind(id) {
                NodeKind::TSQualifiedName { left, .. } => id = *left,
                NodeKind::MemberExpression { object, .. } => id = *object,
                NodeKind::Identifier { .. } => return Some(id),
                _ => return None,
            }
        }
    }

    fn visit_all(&mut self, ids: &[NodeId]) {
        for id in ids {
            self.visit(*id);
        }
    }

    fn visit_opt(&mut self, id: Option<NodeId>) {
        if let Some(id) = id {
            self.visit(id);
        }
    }

    fn visit_type_opt(&mut self, id: Option<NodeId>) {
        if let Some(id) = id {
            self.visit_type(id);
        }
    }

    fn visit_children(&mut self, id: NodeId) {
        for child in self.ast.children(id) {
            self.visit(child);
        }
    }

    fn visit_pattern_extras(&mut self, parts: &PatternParts) {
        for id in &parts.right_hand {
            self.visit(*id);
        }
        for id in &parts.type_annotations {
            self.visit_type(*id);
        }
    }

    // Program

    fn program(&mut self, root: NodeId) {
        let ast = self.ast;
        let body: &[NodeId] = match ast.kind(root) {
            NodeKind::Program { body, .. } => body,
            _ => &[],
        };
        let script = !self.manager.is_module();
        let directive = script && self.has_use_strict(body);
        let global = self.open(ScopeKind::Global, root, self.options.implied_strict || directive);

        let options = self.options;
        for lib in &options.lib {
            for g in lib_globals::globals(*lib) {
                if g.value {
                    self.manager.define(global, g.name, false, None);
                }
                if g.type_mode {
                    self.manager.define(global, g.name, true, None);
                }
            }
        }

        let mut opened = 1;
        if self.options.global_return {
            let scope = self.open(ScopeKind::Function, root, directive);
            self.manager.define(scope, "arguments", false, None);
            opened += 1;
        }
        if !script {
            self.open(ScopeKind::Module, root, false);
            opened += 1;
        }
        self.visit_all(body);
        for _ in 0..opened {
            self.close();
        }
    }

    // Value positions

    fn visit(&mut self, id: NodeId) {
        let ast = self.ast;
        let kind = ast.kind(id);
        if kind.node_type().is_type_node() {
            return self.visit_type(id);
        }
        match kind {
            NodeKind::Identifier { .. } => self.reference(id, RefInfo::read(ReferenceMode::Value)),

            NodeKind::FunctionDeclaration { .. }
            | NodeKind::FunctionExpression { .. }
            | NodeKind::ArrowFunctionExpression { .. }
            | NodeKind::TSDeclareFunction { .. }
            | NodeKind::TSEmptyBodyFunctionExpression { .. } => self.function(id),

            NodeKind::ClassDeclaration { .. } | NodeKind::ClassExpression { .. } => self.class(id),

            NodeKind::BlockStatement { body } => {
                self.open(ScopeKind::Block, id, false);
                self.visit_all(body);
                self.close();
            }
            NodeKind::StaticBlock { body } => {
                self.open(ScopeKind::ClassStaticBlock, id, false);
                self.visit_all(body);
                self.close();
            }
            NodeKind::CatchClause { param, body } => {
                self.open(ScopeKind::Catch, id, false);
                if let Some(param) = param {
                    let parts = pattern::collect(ast, *param);
                    let scope = self.current();
                    for target in &parts.targets {
                        self.declare(scope, Binds::Value, definition(DefinitionKind::CatchClause, target.identifier, id));
                        for default in &target.defaults {
                            self.reference(target.identifier, RefInfo::write(*default, true));
                        }
                    }
                    self.visit_pattern_extras(&parts);
                }
                self.visit(*body);
                self.close();
            }
            NodeKind::ForStatement {
                init,
                test,
                update,
                body,
            } => {
                let scoped = init.is_some_and(|i| self.is_lexical_declaration(i));
                if scoped {
                    self.open(ScopeKind::For, id, false);
                }
                self.visit_opt(*init);
                self.visit_opt(*test);
                self.visit_opt(*update);
                self.visit(*body);
                if scoped {
                    self.close();
                }
            }
            NodeKind::ForInStatement { left, right, body }
            | NodeKind::ForOfStatement {
                left, right, body, ..
            } => self.for_in(id, *left, *right, *body),
            NodeKind::SwitchStatement {
                discriminant,
                cases,
            } => {
                self.visit(*discriminant);
                self.open(ScopeKind::Switch, id, false);
                self.visit_all(cases);
                self.close();
            }
            NodeKind::WithStatement { object, body } => {
                self.visit(*object);
                self.open(ScopeKind::With, id, false);
                self.visit(*body);
                self.close();
            }
            NodeKind::LabeledStatement { body, .. } => self.visit(*body),
            NodeKind::BreakStatement { .. } | NodeKind::ContinueStatement { .. } => {}

            NodeKind::VariableDeclaration { declarations, kind, .. } => {
                self.variable_declaration(id, declarations, *kind)
            }
            NodeKind::AssignmentExpression {
                operator,
                left,
                right,
            } => self.assignment(id, operator, *left, *right),
            NodeKind::UpdateExpression { argument, .. } => {
                if matches!(ast.kind(*argument), NodeKind::Identifier { .. }) {
                    self.reference(
                        *argument,
                        RefInfo {
                            flag: ReferenceFlag::ReadWrite,
                            ..RefInfo::read(ReferenceMode::Value)
                        },
                    );
                } else {
                    self.visit(*argument);
                }
            }
            NodeKind::MemberExpression {
                object,
                property,
                computed,
                ..
            } => {
                self.visit(*object);
                if *computed {
                    self.visit(*property);
                }
            }
            NodeKind::Property {
                key,
                value,
                computed,
                ..
            } => {
                if *computed {
                    self.visit(*key);
                }
                self.visit(*value);
            }
            NodeKind::MethodDefinition {
                decorators,
                key,
                value,
                computed,
                ..
            }
            | NodeKind::TSAbstractMethodDefinition {
                decorators,
                key,
                value,
                computed,
                ..
            } => {
                self.visit_all(decorators);
                if *computed {
                    self.visit(*key);
                }
                self.visit(*value);
            }
            NodeKind::PropertyDefinition {
                decorators,
                key,
                type_annotation,
                value,
                computed,
                ..
            }
            | NodeKind::TSAbstractPropertyDefinition {
                decorators,
                key,
                type_annotation,
                value,
                computed,
                ..
            }
            | NodeKind::AccessorProperty {
                decorators,
                key,
                type_annotation,
                value,
                computed,
                ..
            }
            | NodeKind::TSAbstractAccessorProperty {
                decorators,
                key,
                type_annotation,
                value,
                computed,
                ..
            } => {
                self.visit_all(decorators);
                if *computed {
                    self.visit(*key);
                }
                self.visit_type_opt(*type_annotation);
                if let Some(value) = value {
                    self.open(ScopeKind::ClassFieldInitializer, *value, false);
                    self.visit(*value);
                    self.close();
                }
            }
            NodeKind::TSIndexSignature { .. }
            | NodeKind::TSTypeAliasDeclaration { .. }
            | NodeKind::TSInterfaceDeclaration { .. } => self.visit_type(id),
            NodeKind::MetaProperty { .. } => {}

            NodeKind::ImportDeclaration {
                specifiers,
                import_kind,
                ..
            } => self.import_declaration(id, specifiers, *import_kind),
            NodeKind::ExportNamedDeclaration {
                declaration,
                specifiers,
                source,
                export_kind,
                ..
            } => {
                if let Some(declaration) = declaration {
                    self.visit(*declaration);
                } else if source.is_none() {
                    for specifier in specifiers {
                        if let NodeKind::ExportSpecifier {
                            local,
                            export_kind: specifier_kind,
                            ..
                        } = ast.kind(*specifier)
                        {
                            let type_only = *export_kind == ImportExportKind::Type
                                || *specifier_kind == ImportExportKind::Type;
                            let mode = if type_only {
                                ReferenceMode::Type
                            } else {
                                ReferenceMode::Both
                            };
                            self.reference(*local, RefInfo::read(mode));
                        }
                    }
                }
            }
            NodeKind::ExportDefaultDeclaration { declaration, .. }
            | NodeKind::TSExportAssignment {
                expression: declaration,
            } => {
                if matches!(ast.kind(*declaration), NodeKind::Identifier { .. }) {
                    self.reference(*declaration, RefInfo::read(ReferenceMode::Both));
                } else {
                    self.visit(*declaration);
                }
            }
            NodeKind::ExportAllDeclaration { .. } | NodeKind::TSNamespaceExportDeclaration { .. } => {}

            NodeKind::TSEnumDeclaration { id: name, body, .. } => {
                let scope = self.current();
                self.declare(scope, Binds::Both, definition(DefinitionKind::TsEnumName, *name, id));
                self.open(ScopeKind::TsEnum, id, false);
                self.visit(*body);
                self.close();
            }
            NodeKind::TSEnumMember {
                id: name,
                initializer,
                ..
            } => {
                let scope = self.current();
                self.declare(scope, Binds::Both, definition(DefinitionKind::TsEnumMember, *name, id));
                self.visit_opt(*initializer);
            }
            NodeKind::TSModuleDeclaration {
                id: name,
                body,
                kind,
                ..
            } => {
                if *kind != ModuleKind::Global {
                    if let Some(first) = self.leftmost(*name) {
                        let scope = self.current();
                        self.declare(scope, Binds::Both, definition(DefinitionKind::TsModuleName, first, id));
                    }
                }
                self.open(ScopeKind::TsModule, id, false);
                self.visit_opt(*body);
                self.close();
            }
            NodeKind::TSImportEqualsDeclaration {
                id: name,
                module_reference,
                import_kind,
            } => {
                let binds = if *import_kind == ImportExportKind::Type {
                    Binds::Type
                } else {
                    Binds::Both
                };
                let scope = self.current();
                self.declare(scope, binds, definition(DefinitionKind::ImportBinding, *name, id));
                if let Some(first) = self.leftmost(*module_reference) {
                    self.reference(first, RefInfo::read(ReferenceMode::Value));
                }
            }

            NodeKind::JSXOpeningElement {
                name,
                type_arguments,
                attributes,
                ..
            } => {
                self.mark_jsx_pragma();
                let intrinsic = match ast.kind(*name) {
                    NodeKind::JSXIdentifier { name } => {
                        name.chars().next().is_some_and(|c| c.is_lowercase()) || name == "this"
                    }
                    _ => false,
                };
                if !intrinsic {
                    self.visit(*name);
                }
                self.visit_type_opt(*type_arguments);
                self.visit_all(attributes);
            }
            NodeKind::JSXFragment { children, .. } => {
                self.mark_jsx_pragma();
                self.mark_jsx_fragment();
                self.visit_all(children);
            }
            NodeKind::JSXIdentifier { .. } => self.reference(id, RefInfo::read(ReferenceMode::Value)),
            NodeKind::JSXMemberExpression { object, .. } => {
                let is_this = matches!(ast.kind(*object), NodeKind::JSXIdentifier { name } if name == "this");
                if !is_this {
                    self.visit(*object);
                }
            }
            NodeKind::JSXAttribute { value, .. } => self.visit_opt(*value),
            NodeKind::JSXClosingElement { .. } | NodeKind::JSXNamespacedName { .. } => {}

            _ => self.visit_children(id),
        }
    }

    fn is_lexical_declaration(&self, id: NodeId) -> bool {
        matches!(self.ast.kind(id), NodeKind::VariableDeclaration { kind, .. } if kind.is_block_scoped())
    }

    fn variable_declaration(&mut self, id: NodeId, declarations: &[NodeId], kind: VariableKind) {
        let ast = self.ast;
        let scope = if kind.is_block_scoped() {
            self.current()
        } else {
            self.variable_scope()
        };
        for (index, declarator) in declarations.iter().enumerate() {
            let NodeKind::VariableDeclarator { id: target, init, .. } = ast.kind(*declarator) else {
                continue;
            };
            let parts = pattern::collect(ast, *target);
            for t in &parts.targets {
                let def = Definition {
                    parent: Some(id),
                    index: Some(index),
                    declaration_kind: Some(kind),
                    ..definition(DefinitionKind::Variable, t.identifier, *declarator)
                };
                self.declare(scope, Binds::Value, def);
                for default in &t.defaults {
                    self.reference(t.identifier, RefInfo::write(*default, true));
                }
                if let Some(init) = init {
                    self.reference(t.identifier, RefInfo::write(*init, true));
                }
            }
            self.visit_pattern_extras(&parts);
            self.visit_opt(*init);
        }
    }

    fn assignment(&mut self, id: NodeId, operator: &str, left: NodeId, right: NodeId) {
        let ast = self.ast;
        let mut target = left;
        loop {
            match ast.kind(target) {
                NodeKind::TSAsExpression {
                    expression,
                    type_annotation,
                }
                | NodeKind::TSSatisfiesExpression {
                    expression,
                    type_annotation,
                }
                | NodeKind::TSTypeAssertion {
                    expression,
                    type_annotation,
                } => {
                    self.visit_type(*type_annotation);
                    target = *expression;
                }
                NodeKind::TSNonNullExpression { expression } => target = *expression,
                _ => break,
            }
        }

        if pattern::is_pattern(ast, target) {
            if operator == "=" {
                let sloppy = !self.manager.scope(self.current()).is_strict;
                let parts = pattern::collect(ast, target);
                for t in &parts.targets {
                    let implicit_global = sloppy.then_some(id);
                    for default in &t.defaults {
                        self.reference(
                            t.identifier,
                            RefInfo {
                                implicit_global,
                                ..RefInfo::write(*default, false)
                            },
                        );
                    }
                    self.reference(
                        t.identifier,
                        RefInfo {
                            implicit_global,
                            ..RefInfo::write(right, false)
                        },
                    );
                }
                self.visit_pattern_extras(&parts);
            } else if matches!(ast.kind(target), NodeKind::Identifier { .. }) {
                self.reference(
                    target,
                    RefInfo {
                        flag: ReferenceFlag::ReadWrite,
                        ..RefInfo::write(right, false)
                    },
                );
            } else {
                self.visit(target);
            }
        } else {
            self.visit(target);
        }
        self.visit(right);
    }

    fn for_in(&mut self, id: NodeId, left: NodeId, right: NodeId, body: NodeId) {
        let ast = self.ast;
        let scoped = self.is_lexical_declaration(left);
        if scoped {
            self.open(ScopeKind::For, id, false);
        }
        if let NodeKind::VariableDeclaration { declarations, .. } = ast.kind(left) {
            self.visit(left);
            if let Some(NodeKind::VariableDeclarator { id: target, .. }) =
                declarations.first().map(|d| ast.kind(*d))
            {
                for t in pattern::collect(ast, *target).targets {
                    self.reference(t.identifier, RefInfo::write(right, true));
                }
            }
        } else {
            let sloppy = !self.manager.scope(self.current()).is_strict;
            let implicit_global = sloppy.then_some(id);
            let parts = pattern::collect(ast, left);
            for t in &parts.targets {
                for default in &t.defaults {
                    self.reference(
                        t.identifier,
                        RefInfo {
                            implicit_global,
                            ..RefInfo::write(*default, false)
                        },
                    );
                }
                self.reference(
                    t.identifier,
                    RefInfo {
                        implicit_global,
                        ..RefInfo::write(right, false)
                    },
                );
            }
            self.visit_pattern_extras(&parts);
        }
        self.visit(right);
        self.visit(body);
        if scoped {
            self.close();
        }
    }

    fn function(&mut self, id: NodeId) {
        let ast = self.ast;
        let (name, type_parameters, params, return_type, body) = match ast.kind(id) {
            NodeKind::FunctionDeclaration {
                id: name,
                type_parameters,
                params,
                return_type,
                body,
                ..
            }
            | NodeKind::FunctionExpression {
                id: name,
                type_parameters,
                params,
                return_type,
                body,
                ..
            } => (*name, *type_parameters, params.as_slice(), *return_type, Some(*body)),
            NodeKind::ArrowFunctionExpression {
                type_parameters,
                params,
                return_type,
                body,
                ..
            } => (None, *type_parameters, params.as_slice(), *return_type, Some(*body)),
            NodeKind::TSDeclareFunction {
                id: name,
                type_parameters,
                params,
                return_type,
                ..
            }
            | NodeKind::TSEmptyBodyFunctionExpression {
                id: name,
                type_parameters,
                params,
                return_type,
                ..
            } => (*name, *type_parameters, params.as_slice(), *return_type, None),
            _ => return,
        };
        let node_type = ast.node_type(id);

        let mut name_scope = false;
        if let Some(name) = name {
            match node_type {
                NodeType::FunctionDeclaration | NodeType::TSDeclareFunction => {
                    let scope = self.variable_scope();
                    self.declare(scope, Binds::Value, definition(DefinitionKind::FunctionName, name, id));
                }
                NodeType::FunctionExpression => {
                    let scope = self.open(ScopeKind::FunctionExpressionName, id, false);
                    self.declare(scope, Binds::Value, definition(DefinitionKind::FunctionName, name, id));
                    name_scope = true;
                }
                _ => {}
            }
        }

        let block_body = body.and_then(|b| match ast.kind(b) {
            NodeKind::BlockStatement { body } => Some(body.as_slice()),
            _ => None,
        });
        let directive = block_body.is_some_and(|stmts| self.has_use_strict(stmts));
        let scope = self.open(ScopeKind::Function, id, directive);
        if node_type != NodeType::ArrowFunctionExpression {
            self.manager.define(scope, "arguments", false, None);
        }

        for param in params {
            let parts = pattern::collect(ast, *param);
            for t in &parts.targets {
                let def = Definition {
                    rest: t.rest,
                    ..definition(DefinitionKind::Parameter, t.identifier, id)
                };
                self.declare(scope, Binds::Value, def);
                for default in &t.defaults {
                    self.reference(t.identifier, RefInfo::write(*default, true));
                }
            }
            self.visit_pattern_extras(&parts);
        }
        self.visit_type_opt(return_type);
        self.visit_type_opt(type_parameters);

        match (block_body, body) {
            (Some(stmts), _) => self.visit_all(stmts),
            (None, Some(expression)) => self.visit(expression),
            (None, None) => {}
        }

        self.close();
        if name_scope {
            self.close();
        }
    }

    fn class(&mut self, id: NodeId) {
        let ast = self.ast;
        let (decorators, name, type_parameters, super_class, super_type_arguments, implements, body) =
            match ast.kind(id) {
                NodeKind::ClassDeclaration {
                    decorators,
                    id: name,
                    type_parameters,
                    super_class,
                    super_type_arguments,
                    implements,
                    body,
                    ..
                }
                | NodeKind::ClassExpression {
                    decorators,
                    id: name,
                    type_parameters,
                    super_class,
                    super_type_arguments,
                    implements,
                    body,
                    ..
                } => (
                    decorators,
                    *name,
                    *type_parameters,
                    *super_class,
                    *super_type_arguments,
                    implements,
                    *body,
                ),
                _ => return,
            };

        if let (Some(name), NodeType::ClassDeclaration) = (name, ast.node_type(id)) {
            let scope = self.current();
            self.declare(scope, Binds::Both, definition(DefinitionKind::ClassName, name, id));
        }
        self.visit_all(decorators);

        let scope = self.open(ScopeKind::Class, id, false);
        // The inner name keeps references inside the body off the outer binding
        if let Some(name) = name {
            self.declare(scope, Binds::Both, definition(DefinitionKind::ClassName, name, id));
        }
        self.visit_opt(super_class);
        self.visit_type_opt(type_parameters);
        self.visit_type_opt(super_type_arguments);
        for implemented in implements {
            self.visit_type(*implemented);
        }
        self.visit(body);
        self.close();
    }

    fn import_declaration(&mut self, id: NodeId, specifiers: &[NodeId], import_kind: ImportExportKind) {
        let ast = self.ast;
        let scope = self.current();
        for specifier in specifiers {
            let (local, type_only) = match ast.kind(*specifier) {
                NodeKind::ImportSpecifier {
                    local, import_kind: k, ..
                } => (*local, *k == ImportExportKind::Type),
                NodeKind::ImportDefaultSpecifier { local } | NodeKind::ImportNamespaceSpecifier { local } => {
                    (*local, false)
                }
                _ => continue,
            };
            let binds = if type_only || import_kind == ImportExportKind::Type {
                Binds::Type
            } else {
                Binds::Both
            };
            let def = Definition {
                parent: Some(id),
                ..definition(DefinitionKind::ImportBinding, local, *specifier)
            };
            self.declare(scope, binds, def);
        }
    }

    fn mark_jsx_pragma(&mut self) {
        if !self.jsx_pragma_marked {
            let name = self.options.jsx_pragma().to_string();
            self.jsx_pragma_marked = self.mark_used(&name);
        }
    }

    fn mark_jsx_fragment(&mut self) {
        if self.jsx_fragment_marked {
            return;
        }
        if let Some(name) = self.options.jsx_fragment_name.clone() {
            self.jsx_fragment_marked = self.mark_used(&name);
        }
    }

    /// Flag the nearest value variable `name` as used without creating a
    /// reference
    fn mark_used(&mut self, name: &str) -> bool {
        match self.manager.find_variable(self.current(), name, false) {
            Some(variable) => {
                self.manager.variables[variable.index()].eslint_used = true;
                true
            }
            None => false,
        }
    }

    // Type positions

    fn visit_type(&mut self, id: NodeId) {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Identifier { .. } => self.reference(id, RefInfo::read(ReferenceMode::Type)),
            NodeKind::TSQualifiedName { left, .. } => self.visit_type(*left),
            NodeKind::MemberExpression { object, .. } => self.visit_type(*object),
            NodeKind::TSTypeReference {
                type_name,
                type_arguments,
            } => {
                // `x as const` names no type
                let const_assertion = ast.identifier_name(*type_name) == Some("const")
                    && ast.parent(id).is_some_and(|p| {
                        matches!(ast.node_type(p), NodeType::TSAsExpression | NodeType::TSTypeAssertion)
                    });
                if !const_assertion {
                    self.visit_type(*type_name);
                }
                self.visit_type_opt(*type_arguments);
            }
            NodeKind::TSTypeQuery {
                expr_name,
                type_arguments,
            } => {
                match ast.kind(*expr_name) {
                    NodeKind::TSImportType { .. } => self.visit_type(*expr_name),
                    _ => {
                        if let Some(first) = self.leftmost(*expr_name) {
                            self.reference(first, RefInfo::read(ReferenceMode::Value));
                        }
                    }
                }
                self.visit_type_opt(*type_arguments);
            }
            NodeKind::TSTypeParameter {
                name,
                constraint,
                default,
                ..
            } => {
                let scope = self.current();
                self.declare(scope, Binds::Type, definition(DefinitionKind::Type, *name, id));
                self.visit_type_opt(*constraint);
                self.visit_type_opt(*default);
            }
            NodeKind::TSFunctionType {
                type_parameters,
                params,
                return_type,
            }
            | NodeKind::TSConstructorType {
                type_parameters,
                params,
                return_type,
                ..
            }
            | NodeKind::TSCallSignatureDeclaration {
                type_parameters,
                params,
                return_type,
            }
            | NodeKind::TSConstructSignatureDeclaration {
                type_parameters,
                params,
                return_type,
            } => self.function_type(id, *type_parameters, params, *return_type),
            NodeKind::TSMethodSignature {
                key,
                type_parameters,
                params,
                return_type,
                computed,
                ..
            } => {
                if *computed {
                    self.visit(*key);
                }
                self.function_type(id, *type_parameters, params, *return_type);
            }
            NodeKind::TSPropertySignature {
                key,
                type_annotation,
                computed,
                ..
            } => {
                if *computed {
                    self.visit(*key);
                }
                self.visit_type_opt(*type_annotation);
            }
            NodeKind::TSIndexSignature {
                parameters,
                type_annotation,
                ..
            } => {
                for parameter in parameters {
                    if let NodeKind::Identifier { type_annotation, .. } = ast.kind(*parameter) {
                        self.visit_type_opt(*type_annotation);
                    }
                }
                self.visit_type_opt(*type_annotation);
            }
            NodeKind::TSConditionalType {
                check_type,
                extends_type,
                true_type,
                false_type,
            } => {
                // Names inferred in the condition are visible in the true branch only
                self.open(ScopeKind::ConditionalType, id, false);
                self.visit_type(*check_type);
                self.visit_type(*extends_type);
                self.visit_type(*true_type);
                self.close();
                self.visit_type(*false_type);
            }
            NodeKind::TSInferType { type_parameter } => {
                let scope = self.infer_scope();
                if let NodeKind::TSTypeParameter { name, constraint, .. } = ast.kind(*type_parameter) {
                    self.declare(scope, Binds::Type, definition(DefinitionKind::Type, *name, *type_parameter));
                    self.visit_type_opt(*constraint);
                }
            }
            NodeKind::TSMappedType {
                key,
                constraint,
                name_type,
                type_annotation,
                ..
            } => {
                let scope = self.open(ScopeKind::MappedType, id, false);
                self.declare(scope, Binds::Type, definition(DefinitionKind::Type, *key, id));
                self.visit_type(*constraint);
                self.visit_type_opt(*name_type);
                self.visit_type_opt(*type_annotation);
                self.close();
            }
            NodeKind::TSTypeAliasDeclaration {
                id: name,
                type_parameters,
                type_annotation,
                ..
            } => {
                let scope = self.current();
                self.declare(scope, Binds::Type, definition(DefinitionKind::Type, *name, id));
                if let Some(type_parameters) = type_parameters {
                    self.open(ScopeKind::Type, id, false);
                    self.visit_type(*type_parameters);
                }
                self.visit_type(*type_annotation);
                if type_parameters.is_some() {
                    self.close();
                }
            }
            NodeKind::TSInterfaceDeclaration {
                id: name,
                type_parameters,
                extends,
                body,
                ..
            } => {
                let scope = self.current();
                self.declare(scope, Binds::Type, definition(DefinitionKind::Type, *name, id));
                if let Some(type_parameters) = type_parameters {
                    self.open(ScopeKind::Type, id, false);
                    self.visit_type(*type_parameters);
                }
                for heritage in extends {
                    self.visit_type(*heritage);
                }
                self.visit_type(*body);
                if type_parameters.is_some() {
                    self.close();
                }
            }
            NodeKind::TSTypePredicate {
                parameter_name,
                type_annotation,
                ..
            } => {
                if matches!(ast.kind(*parameter_name), NodeKind::Identifier { .. }) {
                    self.reference(*parameter_name, RefInfo::read(ReferenceMode::Value));
                }
                self.visit_type_opt(*type_annotation);
            }
            NodeKind::TSImportType { type_arguments, .. } => self.visit_type_opt(*type_arguments),
            NodeKind::TSNamedTupleMember { element_type, .. } => self.visit_type(*element_type),
            NodeKind::TSLiteralType { .. } | NodeKind::Literal { .. } | NodeKind::TemplateElement { .. } => {}
            _ => {
                for child in ast.children(id) {
                    self.visit_type(child);
                }
            }
        }
    }

    fn function_type(&mut self, id: NodeId, type_parameters: Option<NodeId>, params: &[NodeId], return_type: Option<NodeId>) {
        let scope = self.open(ScopeKind::FunctionType, id, false);
        self.visit_type_opt(type_parameters);
        for param in params {
            let parts = pattern::collect(self.ast, *param);
            for t in &parts.targets {
                let def = Definition {
                    rest: t.rest,
                    ..definition(DefinitionKind::Parameter, t.identifier, id)
                };
                self.declare(scope, Binds::Value, def);
            }
            self.visit_pattern_extras(&parts);
        }
        self.visit_type_opt(return_type);
        self.close();
    }

    /// `infer U` declares `U` in the enclosing conditional type, looking
    /// through function and mapped types nested inside the condition
    fn infer_scope(&self) -> ScopeId {
        let current = self.current();
        let mut scope = current;
        while matches!(
            self.manager.scope(scope).kind,
            ScopeKind::FunctionType | ScopeKind::MappedType
        ) {
            match self.manager.scope(scope).upper {
                Some(upper) => scope = upper,
                None => return current,
            }
        }
        if self.manager.scope(scope).kind == ScopeKind::ConditionalType {
            scope
        } else {
            current
        }
    }
}
