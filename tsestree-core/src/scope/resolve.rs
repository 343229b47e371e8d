//! Reference resolution
//!
//! Scopes are closed children first. Closing a scope tries each pending
//! reference against the scope's own variables; a miss goes onto the
//! scope's `through` list and into the parent's pending set. A `with` body
//! never binds anything itself, and a global script closes dynamically for
//! names the runtime may rebind.

use super::{Definition, DefinitionKind, ReferenceId, ScopeId, ScopeKind, ScopeManager, VariableId};
use crate::ast::{Ast, NodeKind, VariableKind};

pub(super) fn resolve(manager: &mut ScopeManager, ast: &Ast, implicit_globals: bool) {
    let mut pending: Vec<Vec<ReferenceId>> = manager
        .scopes
        .iter()
        .map(|scope| scope.references.clone())
        .collect();

    // Children always have larger ids than their parents
    for index in (0..manager.scopes.len()).rev() {
        let scope = ScopeId(index as u32);
        let mut left = std::mem::take(&mut pending[index]);
        left.sort_unstable();
        for reference in left {
            close_reference(manager, ast, scope, reference, &mut pending);
        }
    }

    if implicit_globals && !manager.is_module() {
        define_implicit_globals(manager);
    }

    let unresolved = manager.scope(manager.global_scope()).through.len();
    tracing::trace!(
        references = manager.references.len(),
        unresolved,
        "references resolved"
    );
}

fn close_reference(
    manager: &mut ScopeManager,
    ast: &Ast,
    scope: ScopeId,
    reference: ReferenceId,
    pending: &mut [Vec<ReferenceId>],
) {
    match manager.scope(scope).kind {
        // The object's properties may shadow anything, so the name is only
        // ever handed on to the enclosing scope
        ScopeKind::With => return pass_through(manager, scope, reference, pending),
        ScopeKind::Global if !resolves_statically_in_global(manager, reference) => {
            // Every enclosing scope sees the name pass through
            let mut current = Some(scope);
            while let Some(id) = current {
                manager.scopes[id.index()].through.push(reference);
                current = manager.scope(id).upper;
            }
            return;
        }
        _ => {}
    }

    match candidate(manager, ast, scope, reference) {
        Some(variable) => {
            manager.references[reference.index()].resolved = Some(variable);
            manager.variables[variable.index()].references.push(reference);
        }
        None => pass_through(manager, scope, reference, pending),
    }
}

fn pass_through(manager: &mut ScopeManager, scope: ScopeId, reference: ReferenceId, pending: &mut [Vec<ReferenceId>]) {
    manager.scopes[scope.index()].through.push(reference);
    if let Some(upper) = manager.scope(scope).upper {
        pending[upper.index()].push(reference);
    }
}

/// Variable in `scope` that `reference` may bind to
fn candidate(manager: &ScopeManager, ast: &Ast, scope: ScopeId, reference: ReferenceId) -> Option<VariableId> {
    let r = manager.reference(reference);
    let s = manager.scope(scope);
    let mut modes = Vec::with_capacity(2);
    if r.is_value_reference() {
        modes.push(false);
    }
    if r.is_type_reference() {
        modes.push(true);
    }
    modes
        .into_iter()
        .filter_map(|type_mode| s.variable(&r.name, type_mode))
        .find(|variable| is_valid_resolution(manager, ast, scope, reference, *variable))
}

/// A parameter default cannot see a variable declared only in the body
fn is_valid_resolution(
    manager: &ScopeManager,
    ast: &Ast,
    scope: ScopeId,
    reference: ReferenceId,
    variable: VariableId,
) -> bool {
    let s = manager.scope(scope);
    if s.kind != ScopeKind::Function {
        return true;
    }
    let body_start = match ast.kind(s.block) {
        NodeKind::FunctionDeclaration { body, .. }
        | NodeKind::FunctionExpression { body, .. }
        | NodeKind::ArrowFunctionExpression { body, .. } => ast.range(*body).start,
        _ => return true,
    };
    let reference_start = ast.range(manager.reference(reference).identifier).start;
    let defs = &manager.variable(variable).defs;
    let in_body_only = !defs.is_empty() && defs.iter().all(|d| ast.range(d.name).start >= body_start);
    !(reference_start < body_start && in_body_only)
}

/// In modules every global name binds statically. In scripts a `var` may
/// be shadowed by a host global of the same name, so only names without
/// `var` definitions bind.
fn resolves_statically_in_global(manager: &ScopeManager, reference: ReferenceId) -> bool {
    let global = manager.scope(manager.global_scope());
    let r = manager.reference(reference);
    let variable = [false, true]
        .into_iter()
        .filter(|type_mode| if *type_mode { r.is_type_reference() } else { r.is_value_reference() })
        .find_map(|type_mode| global.variable(&r.name, type_mode));
    let Some(variable) = variable else {
        return false;
    };
    if manager.is_module() {
        return true;
    }
    manager
        .variable(variable)
        .defs
        .iter()
        .all(|d| !(d.kind == DefinitionKind::Variable && d.declaration_kind == Some(VariableKind::Var)))
}

/// Turn sloppy-mode assignments to unknown names into global variables and
/// bind every remaining value reference of those names to them
fn define_implicit_globals(manager: &mut ScopeManager) {
    let global = manager.global_scope();
    let through = manager.scope(global).through.clone();

    for id in &through {
        let r = manager.reference(*id);
        let Some(node) = r.maybe_implicit_global else {
            continue;
        };
        if manager.scope(global).variable(&r.name, false).is_some() {
            continue;
        }
        let name = r.name.clone();
        let def = Definition {
            kind: DefinitionKind::ImplicitGlobalVariable,
            name: r.identifier,
            node,
            parent: None,
            index: None,
            declaration_kind: None,
            rest: false,
        };
        manager.define(global, &name, false, Some(def));
    }

    let mut still_through = Vec::with_capacity(through.len());
    for id in through {
        let r = manager.reference(id);
        let implicit = r
            .is_value_reference()
            .then(|| manager.scope(global).variable(&r.name, false))
            .flatten()
            .filter(|v| {
                let defs = &manager.variable(*v).defs;
                !defs.is_empty() && defs.iter().all(|d| d.kind == DefinitionKind::ImplicitGlobalVariable)
            });
        match implicit {
            Some(variable) => {
                manager.references[id.index()].resolved = Some(variable);
                manager.variables[variable.index()].references.push(id);
            }
            None => still_through.push(id),
        }
    }
    manager.scopes[global.index()].through = still_through;
}
