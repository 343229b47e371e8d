//! Binding and assignment pattern conversion

use super::Converter;
use crate::ast::{NodeId, NodeKind, PropertyKind};
use crate::position::Range;
use swc_ecma_ast::{
    ArrayPat, AssignPat, AssignTarget, AssignTargetPat, BindingIdent, Decorator, ObjectPat,
    ObjectPatProp, Param, Pat, RestPat, SimpleAssignTarget,
};

impl Converter<'_> {
    pub(super) fn pat(&mut self, p: &Pat) -> NodeId {
        self.pat_decorated(p, &[])
    }

    pub(super) fn param(&mut self, p: &Param) -> NodeId {
        self.pat_decorated(&p.pat, &p.decorators)
    }

    /// Patterns in parameter position may carry decorators
    pub(super) fn pat_decorated(&mut self, p: &Pat, decorators: &[Decorator]) -> NodeId {
        let decorators = self.decorators(decorators);
        match p {
            Pat::Ident(b) => self.binding_ident(b, decorators),
            Pat::Array(a) => self.array_pat(a, decorators),
            Pat::Rest(r) => self.rest_pat(r, decorators),
            Pat::Object(o) => self.object_pat(o, decorators),
            Pat::Assign(a) => self.assign_pat(a, decorators),
            Pat::Expr(e) => self.expr(e),
            Pat::Invalid(i) => self.unsupported("Invalid", i.span),
        }
    }

    pub(super) fn binding_ident(&mut self, b: &BindingIdent, decorators: Vec<NodeId>) -> NodeId {
        let type_annotation = b.type_ann.as_deref().map(|t| self.type_ann(t));
        let mut range = self.span_range(b.id.span);
        if b.id.optional {
            if let Some(r) = range {
                if let Some(q) = self.token_after(r.end).filter(|t| t.is_punctuator("?")) {
                    range = Some(Range::new(r.start, q.range.end));
                }
            }
        }
        self.make_at(
            NodeKind::Identifier {
                name: b.id.sym.to_string(),
                optional: b.id.optional,
                type_annotation,
                decorators,
            },
            range,
            Some("BindingIdent"),
        )
    }

    pub(super) fn array_pat(&mut self, a: &ArrayPat, decorators: Vec<NodeId>) -> NodeId {
        let elements = a
            .elems
            .iter()
            .map(|el| el.as_ref().map(|p| self.pat(p)))
            .collect();
        let type_annotation = a.type_ann.as_deref().map(|t| self.type_ann(t));
        self.make(
            NodeKind::ArrayPattern {
                decorators,
                elements,
                type_annotation,
                optional: a.optional,
            },
            a.span,
            "ArrayPat",
        )
    }

    pub(super) fn rest_pat(&mut self, r: &RestPat, decorators: Vec<NodeId>) -> NodeId {
        let argument = self.pat(&r.arg);
        let type_annotation = r.type_ann.as_deref().map(|t| self.type_ann(t));
        self.make(
            NodeKind::RestElement {
                decorators,
                argument,
                type_annotation,
                optional: false,
            },
            r.span,
            "RestPat",
        )
    }

    pub(super) fn object_pat(&mut self, o: &ObjectPat, decorators: Vec<NodeId>) -> NodeId {
        let properties = o
            .props
            .iter()
            .map(|prop| match prop {
                ObjectPatProp::KeyValue(kv) => {
                    let (key, computed) = self.prop_name(&kv.key);
                    let value = self.pat(&kv.value);
                    self.make_at(
                        NodeKind::Property {
                            key,
                            value,
                            kind: PropertyKind::Init,
                            method: false,
                            shorthand: false,
                            computed,
                            optional: false,
                        },
                        None,
                        Some("KeyValuePatProp"),
                    )
                }
                ObjectPatProp::Assign(a) => {
                    // `{ a }` and `{ a = 1 }` need distinct key and value nodes
                    let key = self.ident(&a.key.id);
                    let binding = self.binding_ident(&a.key, Vec::new());
                    let value = match a.value.as_deref() {
                        Some(default) => {
                            let right = self.expr(default);
                            self.make_at(
                                NodeKind::AssignmentPattern {
                                    decorators: Vec::new(),
                                    left: binding,
                                    right,
                                },
                                None,
                                None,
                            )
                        }
                        None => binding,
                    };
                    let range = self.span_range(a.span);
                    self.make_at(
                        NodeKind::Property {
                            key,
                            value,
                            kind: PropertyKind::Init,
                            method: false,
                            shorthand: true,
                            computed: false,
                            optional: false,
                        },
                        range,
                        Some("AssignPatProp"),
                    )
                }
                ObjectPatProp::Rest(r) => self.rest_pat(r, Vec::new()),
            })
            .collect();
        let type_annotation = o.type_ann.as_deref().map(|t| self.type_ann(t));
        self.make(
            NodeKind::ObjectPattern {
                decorators,
                properties,
                type_annotation,
                optional: o.optional,
            },
            o.span,
            "ObjectPat",
        )
    }

    pub(super) fn assign_pat(&mut self, a: &AssignPat, decorators: Vec<NodeId>) -> NodeId {
        let left = self.pat(&a.left);
        let right = self.expr(&a.right);
        self.make(
            NodeKind::AssignmentPattern {
                decorators,
                left,
                right,
            },
            a.span,
            "AssignPat",
        )
    }

    /// Left-hand side of an assignment expression
    pub(super) fn assign_target(&mut self, target: &AssignTarget) -> NodeId {
        match target {
            AssignTarget::Simple(simple) => match simple {
                SimpleAssignTarget::Ident(b) => self.binding_ident(b, Vec::new()),
                SimpleAssignTarget::Member(m) => self.member_expr(m),
                SimpleAssignTarget::SuperProp(s) => self.super_prop(s),
                SimpleAssignTarget::Paren(p) => self.expr(&p.expr),
                SimpleAssignTarget::OptChain(o) => self.opt_chain(o),
                SimpleAssignTarget::TsAs(a) => self.ts_as(a),
                SimpleAssignTarget::TsSatisfies(s) => self.ts_satisfies(s),
                SimpleAssignTarget::TsNonNull(n) => self.ts_non_null(n),
                SimpleAssignTarget::TsTypeAssertion(t) => self.ts_type_assertion(t),
                SimpleAssignTarget::TsInstantiation(i) => self.ts_instantiation(i),
                SimpleAssignTarget::Invalid(i) => self.unsupported("Invalid", i.span),
            },
            AssignTarget::Pat(pat) => match pat {
                AssignTargetPat::Array(a) => self.array_pat(a, Vec::new()),
                AssignTargetPat::Object(o) => self.object_pat(o, Vec::new()),
                AssignTargetPat::Invalid(i) => self.unsupported("Invalid", i.span),
            },
        }
    }
}
