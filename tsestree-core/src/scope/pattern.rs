//! Binding-pattern traversal
//!
//! Splits a binding or assignment target into the identifiers it binds, the
//! expressions that must be visited as ordinary reads (defaults, computed
//! keys, member-expression targets) and the type annotations along the way.

use crate::ast::{Ast, NodeId, NodeKind};

/// One identifier bound by a pattern
#[derive(Debug, Clone, PartialEq)]
pub(super) struct PatternTarget {
    pub identifier: NodeId,
    /// Reached through a rest element
    pub rest: bool,
    /// Default values enclosing the identifier, outermost first
    pub defaults: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub(super) struct PatternParts {
    pub targets: Vec<PatternTarget>,
    pub right_hand: Vec<NodeId>,
    pub type_annotations: Vec<NodeId>,
}

pub(super) fn collect(ast: &Ast, root: NodeId) -> PatternParts {
    let mut collector = Collector {
        ast,
        parts: PatternParts::default(),
        defaults: Vec::new(),
    };
    collector.visit(root, false);
    collector.parts
}

/// Whether `id` can be the target of a destructuring assignment
pub(super) fn is_pattern(ast: &Ast, id: NodeId) -> bool {
    matches!(
        ast.kind(id),
        NodeKind::Identifier { .. }
            | NodeKind::ObjectPattern { .. }
            | NodeKind::ArrayPattern { .. }
            | NodeKind::RestElement { .. }
            | NodeKind::AssignmentPattern { .. }
    )
}

struct Collector<'a> {
    ast: &'a Ast,
    parts: PatternParts,
    defaults: Vec<NodeId>,
}

impl Collector<'_> {
    fn visit(&mut self, id: NodeId, rest: bool) {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Identifier {
                type_annotation,
                decorators,
                ..
            } => {
                self.parts.targets.push(PatternTarget {
                    identifier: id,
                    rest,
                    defaults: self.defaults.clone(),
                });
                self.annotate(*type_annotation);
                self.parts.right_hand.extend(decorators.iter().copied());
            }
            NodeKind::ArrayPattern {
                decorators,
                elements,
                type_annotation,
                ..
            } => {
                self.parts.right_hand.extend(decorators.iter().copied());
                for element in elements.iter().flatten() {
                    self.visit(*element, rest);
                }
                self.annotate(*type_annotation);
            }
            NodeKind::ObjectPattern {
                decorators,
                properties,
                type_annotation,
                ..
            } => {
                self.parts.right_hand.extend(decorators.iter().copied());
                for property in properties {
                    match ast.kind(*property) {
                        NodeKind::Property {
                            key, value, computed, ..
                        } => {
                            if *computed {
                                self.parts.right_hand.push(*key);
                            }
                            self.visit(*value, rest);
                        }
                        _ => self.visit(*property, rest),
                    }
                }
                self.annotate(*type_annotation);
            }
            NodeKind::RestElement {
                decorators,
                argument,
                type_annotation,
                ..
            } => {
                self.parts.right_hand.extend(decorators.iter().copied());
                self.visit(*argument, true);
                self.annotate(*type_annotation);
            }
            NodeKind::AssignmentPattern {
                decorators,
                left,
                right,
            } => {
                self.parts.right_hand.extend(decorators.iter().copied());
                self.defaults.push(*right);
                self.visit(*left, rest);
                self.defaults.pop();
                self.parts.right_hand.push(*right);
            }
            NodeKind::TSParameterProperty {
                decorators,
                parameter,
                ..
            } => {
                self.parts.right_hand.extend(decorators.iter().copied());
                self.visit(*parameter, rest);
            }
            NodeKind::MemberExpression {
                object,
                property,
                computed,
                ..
            } => {
                if *computed {
                    self.parts.right_hand.push(*property);
                }
                self.parts.right_hand.push(*object);
            }
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
                self.parts.type_annotations.push(*type_annotation);
                self.visit(*expression, rest);
            }
            NodeKind::TSNonNullExpression { expression } => self.visit(*expression, rest),
            _ => self.parts.right_hand.push(id),
        }
    }

    fn annotate(&mut self, annotation: Option<NodeId>) {
        self.parts.type_annotations.extend(annotation);
    }
}
