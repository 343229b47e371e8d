//! Scope graph
//!
//! Scopes, variables and references live in three arenas owned by the
//! `ScopeManager` and point at each other by index. The builder creates all
//! of them in one pass over the tree; the resolver then sets `resolved` and
//! fills the `through` lists, and nothing changes afterwards.
//!
//! Value-level and type-level bindings are separate variables: a class `C`
//! registers one value-mode `C` and one type-mode `C` in the same scope.

mod builder;
mod lib_globals;
mod pattern;
mod resolve;

pub use lib_globals::LibGlobal;

use crate::ast::{Ast, NodeId, SourceType, VariableKind};
use crate::config::AnalyzeOptions;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReferenceId(pub u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl VariableId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl ReferenceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Global,
    Module,
    Function,
    FunctionExpressionName,
    Block,
    Class,
    ClassFieldInitializer,
    ClassStaticBlock,
    Switch,
    Catch,
    For,
    With,
    TsModule,
    TsEnum,
    Type,
    FunctionType,
    ConditionalType,
    MappedType,
}

impl ScopeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Module => "module",
            ScopeKind::Function => "function",
            ScopeKind::FunctionExpressionName => "function-expression-name",
            ScopeKind::Block => "block",
            ScopeKind::Class => "class",
            ScopeKind::ClassFieldInitializer => "class-field-initializer",
            ScopeKind::ClassStaticBlock => "class-static-block",
            ScopeKind::Switch => "switch",
            ScopeKind::Catch => "catch",
            ScopeKind::For => "for",
            ScopeKind::With => "with",
            ScopeKind::TsModule => "tsModule",
            ScopeKind::TsEnum => "tsEnum",
            ScopeKind::Type => "type",
            ScopeKind::FunctionType => "functionType",
            ScopeKind::ConditionalType => "conditionalType",
            ScopeKind::MappedType => "mappedType",
        }
    }

    /// Scopes that receive `var` declarations and hoisted functions
    pub fn is_variable_scope(self) -> bool {
        matches!(
            self,
            ScopeKind::Global
                | ScopeKind::Module
                | ScopeKind::Function
                | ScopeKind::TsModule
                | ScopeKind::ClassFieldInitializer
                | ScopeKind::ClassStaticBlock
        )
    }

    /// Code in these scopes is always strict
    fn is_always_strict(self) -> bool {
        matches!(
            self,
            ScopeKind::Module | ScopeKind::Class | ScopeKind::ClassFieldInitializer | ScopeKind::ClassStaticBlock
        )
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Node that introduced the scope
    pub block: NodeId,
    pub upper: Option<ScopeId>,
    pub child_scopes: Vec<ScopeId>,
    /// Nearest enclosing scope (possibly this one) that receives `var`s
    pub variable_scope: ScopeId,
    pub is_strict: bool,
    /// Name resolution through this scope is decided at run time
    pub dynamic: bool,
    pub variables: Vec<VariableId>,
    /// References created directly in this scope, in source order
    pub references: Vec<ReferenceId>,
    /// References not resolved in this scope or any of its children
    pub through: Vec<ReferenceId>,
    set: HashMap<(String, bool), VariableId>,
}

impl Scope {
    fn new(kind: ScopeKind, block: NodeId, upper: Option<ScopeId>, variable_scope: ScopeId, is_strict: bool) -> Self {
        Self {
            kind,
            block,
            upper,
            child_scopes: Vec::new(),
            variable_scope,
            is_strict,
            dynamic: matches!(kind, ScopeKind::Global | ScopeKind::With),
            variables: Vec::new(),
            references: Vec::new(),
            through: Vec::new(),
            set: HashMap::new(),
        }
    }

    /// Variable declared directly in this scope
    pub fn variable(&self, name: &str, type_mode: bool) -> Option<VariableId> {
        self.set.get(&(name.to_string(), type_mode)).copied()
    }

    pub fn is_function_expression_scope(&self) -> bool {
        self.kind == ScopeKind::FunctionExpressionName
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DefinitionKind {
    CatchClause,
    ClassName,
    FunctionName,
    ImplicitGlobalVariable,
    ImportBinding,
    Parameter,
    TsEnumName,
    TsEnumMember,
    TsModuleName,
    Type,
    Variable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    pub kind: DefinitionKind,
    /// Identifier naming the binding
    pub name: NodeId,
    /// Declaring node (declarator, function, class, specifier, ...)
    pub node: NodeId,
    /// Enclosing statement for declarators and imports
    pub parent: Option<NodeId>,
    /// Position of the declarator inside its declaration
    pub index: Option<usize>,
    pub declaration_kind: Option<VariableKind>,
    /// Parameter bound through a rest element
    pub rest: bool,
}

#[derive(Debug, Clone)]
pub struct Variable {
    pub name: String,
    pub scope: ScopeId,
    pub type_mode: bool,
    pub defs: Vec<Definition>,
    /// Declaring identifiers, one per definition
    pub identifiers: Vec<NodeId>,
    pub references: Vec<ReferenceId>,
    /// Marked used without a reference (JSX factory names)
    pub eslint_used: bool,
}

impl Variable {
    /// Library globals and `arguments` carry no definitions
    pub fn is_implicit(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Binding universe a reference can resolve into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceMode {
    Value,
    Type,
    /// Export specifiers and `export =` name either kind of binding
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceFlag {
    Read,
    Write,
    ReadWrite,
}

#[derive(Debug, Clone)]
pub struct Reference {
    pub identifier: NodeId,
    pub name: String,
    /// Scope the reference occurs in
    pub from: ScopeId,
    pub resolved: Option<VariableId>,
    pub flag: ReferenceFlag,
    pub mode: ReferenceMode,
    /// Binding-establishing write of a declaration
    pub is_init: bool,
    write_expr: Option<NodeId>,
    /// Sloppy-mode assignment that would create a global at run time
    pub(crate) maybe_implicit_global: Option<NodeId>,
}

impl Reference {
    pub fn is_read(&self) -> bool {
        matches!(self.flag, ReferenceFlag::Read | ReferenceFlag::ReadWrite)
    }

    pub fn is_write(&self) -> bool {
        matches!(self.flag, ReferenceFlag::Write | ReferenceFlag::ReadWrite)
    }

    pub fn is_read_only(&self) -> bool {
        self.flag == ReferenceFlag::Read
    }

    pub fn is_write_only(&self) -> bool {
        self.flag == ReferenceFlag::Write
    }

    pub fn is_read_write(&self) -> bool {
        self.flag == ReferenceFlag::ReadWrite
    }

    pub fn is_type_reference(&self) -> bool {
        matches!(self.mode, ReferenceMode::Type | ReferenceMode::Both)
    }

    pub fn is_value_reference(&self) -> bool {
        matches!(self.mode, ReferenceMode::Value | ReferenceMode::Both)
    }

    /// Expression whose value is written, if any
    pub fn write_expr(&self) -> Option<NodeId> {
        self.write_expr
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// The scope graph of one file
#[derive(Debug, Clone)]
pub struct ScopeManager {
    scopes: Vec<Scope>,
    variables: Vec<Variable>,
    references: Vec<Reference>,
    node_scopes: HashMap<NodeId, Vec<ScopeId>>,
    declared: HashMap<NodeId, Vec<VariableId>>,
    source_type: SourceType,
}

impl ScopeManager {
    fn new(source_type: SourceType) -> Self {
        Self {
            scopes: Vec::new(),
            variables: Vec::new(),
            references: Vec::new(),
            node_scopes: HashMap::new(),
            declared: HashMap::new(),
            source_type,
        }
    }

    /// Build and resolve the scope graph of `ast`
    pub fn analyze(ast: &Ast, options: &AnalyzeOptions) -> Self {
        let source_type = options.source_type.unwrap_or_else(|| ast.source_type());
        let mut manager = builder::ScopeBuilder::new(ast, options, source_type).build();
        resolve::resolve(&mut manager, ast, options.implicit_globals);
        manager
    }

    /// Root scope. The arena is never empty once analysis ran.
    pub fn global_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn is_module(&self) -> bool {
        self.source_type == SourceType::Module
    }

    pub fn source_type(&self) -> SourceType {
        self.source_type
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id.index()]
    }

    pub fn reference(&self, id: ReferenceId) -> &Reference {
        &self.references[id.index()]
    }

    /// All scopes in creation order (parents before children)
    pub fn scopes(&self) -> impl Iterator<Item = (ScopeId, &Scope)> {
        self.scopes
            .iter()
            .enumerate()
            .map(|(i, scope)| (ScopeId(i as u32), scope))
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(i, variable)| (VariableId(i as u32), variable))
    }

    pub fn references(&self) -> impl Iterator<Item = (ReferenceId, &Reference)> {
        self.references
            .iter()
            .enumerate()
            .map(|(i, reference)| (ReferenceId(i as u32), reference))
    }

    /// Scope introduced by `node`. A named function expression owns two
    /// scopes; the name scope is skipped unless it is the only one, and
    /// `inner` picks the innermost of what remains.
    pub fn acquire(&self, node: NodeId, inner: bool) -> Option<ScopeId> {
        let scopes = self.node_scopes.get(&node)?;
        if scopes.len() == 1 {
            return scopes.first().copied();
        }
        let mut candidates = scopes
            .iter()
            .copied()
            .filter(|id| !self.scope(*id).is_function_expression_scope());
        if inner {
            candidates.last()
        } else {
            candidates.next()
        }
    }

    /// Every scope introduced by `node`, outermost first
    pub fn scopes_of(&self, node: NodeId) -> &[ScopeId] {
        self.node_scopes.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Variables whose definitions were created by `node`
    pub fn get_declared_variables(&self, node: NodeId) -> &[VariableId] {
        self.declared.get(&node).map_or(&[], Vec::as_slice)
    }

    /// Look a name up from `scope` outwards, the way an unqualified
    /// reference would before any dynamic rule applies
    pub fn find_variable(&self, scope: ScopeId, name: &str, type_mode: bool) -> Option<VariableId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = self.scope(id);
            if let Some(variable) = scope.variable(name, type_mode) {
                return Some(variable);
            }
            current = scope.upper;
        }
        None
    }

    /// References that no scope could resolve
    pub fn unresolved(&self) -> impl Iterator<Item = &Reference> {
        self.scope(self.global_scope())
            .through
            .iter()
            .map(|id| self.reference(*id))
    }

    // Construction, used by the builder and resolver

    fn push_scope(&mut self, kind: ScopeKind, block: NodeId, upper: Option<ScopeId>, strict_directive: bool) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        let (variable_scope, inherited_strict) = match upper {
            Some(upper) => {
                let parent = self.scope(upper);
                let variable_scope = if kind.is_variable_scope() {
                    id
                } else {
                    parent.variable_scope
                };
                (variable_scope, parent.is_strict)
            }
            None => (id, false),
        };
        let is_strict = inherited_strict || strict_directive || kind.is_always_strict();
        self.scopes
            .push(Scope::new(kind, block, upper, variable_scope, is_strict));
        if let Some(upper) = upper {
            self.scopes[upper.index()].child_scopes.push(id);
        }
        self.node_scopes.entry(block).or_default().push(id);
        id
    }

    /// Add a definition to the variable `name` in `scope`, creating the
    /// variable on first sight
    fn define(&mut self, scope: ScopeId, name: &str, type_mode: bool, def: Option<Definition>) -> VariableId {
        let key = (name.to_string(), type_mode);
        let id = match self.scopes[scope.index()].set.get(&key) {
            Some(id) => *id,
            None => {
                let id = VariableId(self.variables.len() as u32);
                self.variables.push(Variable {
                    name: name.to_string(),
                    scope,
                    type_mode,
                    defs: Vec::new(),
                    identifiers: Vec::new(),
                    references: Vec::new(),
                    eslint_used: false,
                });
                let target = &mut self.scopes[scope.index()];
                target.set.insert(key, id);
                target.variables.push(id);
                id
            }
        };
        if let Some(def) = def {
            let declared = self.declared.entry(def.node).or_default();
            if !declared.contains(&id) {
                declared.push(id);
            }
            let variable = &mut self.variables[id.index()];
            variable.identifiers.push(def.name);
            variable.defs.push(def);
        }
        id
    }

    fn push_reference(&mut self, reference: Reference) -> ReferenceId {
        let id = ReferenceId(self.references.len() as u32);
        self.scopes[reference.from.index()].references.push(id);
        self.references.push(reference);
        id
    }
}

#[cfg(test)]
mod tests;
