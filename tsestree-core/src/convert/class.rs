//! Class and decorator conversion

use super::expr::FunctionParts;
use super::Converter;
use crate::ast::{Accessibility, MethodKind, NodeId, NodeKind};
use crate::position::Range;
use swc_common::Span;
use swc_ecma_ast::{
    AutoAccessor, Class, ClassDecl, ClassExpr, ClassMember, ClassProp, Constructor, Decorator,
    Function, Ident, Key, ParamOrTsParamProp, PrivateProp, TsParamProp, TsParamPropParam,
};

pub(super) fn accessibility(a: Option<swc_ecma_ast::Accessibility>) -> Option<Accessibility> {
    a.map(|a| match a {
        swc_ecma_ast::Accessibility::Public => Accessibility::Public,
        swc_ecma_ast::Accessibility::Protected => Accessibility::Protected,
        swc_ecma_ast::Accessibility::Private => Accessibility::Private,
    })
}

/// Modifiers shared by methods, properties and accessors
#[derive(Default, Clone, Copy)]
struct Modifiers {
    is_static: bool,
    is_abstract: bool,
    optional: bool,
    is_override: bool,
    readonly: bool,
    declare: bool,
    definite: bool,
    accessibility: Option<Accessibility>,
}

impl Converter<'_> {
    pub(super) fn decorators(&mut self, decorators: &[Decorator]) -> Vec<NodeId> {
        decorators
            .iter()
            .map(|d| {
                let expression = self.expr(&d.expr);
                self.make(NodeKind::Decorator { expression }, d.span, "Decorator")
            })
            .collect()
    }

    pub(super) fn class_decl(&mut self, c: &ClassDecl) -> NodeId {
        self.class_node(&c.class, Some(&c.ident), true, c.declare)
    }

    pub(super) fn class_expr(&mut self, c: &ClassExpr) -> NodeId {
        self.class_node(&c.class, c.ident.as_ref(), false, false)
    }

    /// Build a class declaration or expression; default exports are
    /// declarations even without a name
    pub(super) fn class_node(&mut self, class: &Class, ident: Option<&Ident>, declaration: bool, declare: bool) -> NodeId {
        let decorators = self.decorators(&class.decorators);
        let id = ident.map(|i| self.ident(i));
        let type_parameters = class.type_params.as_deref().map(|t| self.type_param_decl(t));
        let super_class = class.super_class.as_deref().map(|e| self.expr(e));
        let super_type_arguments = class.super_type_params.as_deref().map(|t| self.type_args(t));
        let implements = class
            .implements
            .iter()
            .map(|i| self.expr_with_type_args(i, false))
            .collect::<Vec<_>>();

        let mut range = self.span_range(class.span);
        if let Some(r) = range {
            let r = if class.is_abstract {
                self.with_leading_word(r, "abstract")
            } else {
                r
            };
            range = Some(if declare {
                self.with_leading_word(r, "declare")
            } else {
                r
            });
        }

        let header_end = [id, type_parameters, super_class, super_type_arguments]
            .into_iter()
            .flatten()
            .chain(implements.iter().copied())
            .chain(decorators.iter().copied())
            .map(|child| self.range_of(child).end)
            .fold(range.map_or(0, |r| r.start), u32::max);
        let body = self.class_body(&class.body, header_end, range.map_or(header_end, |r| r.end));

        let kind = if declaration {
            NodeKind::ClassDeclaration {
                decorators,
                id,
                type_parameters,
                super_class,
                super_type_arguments,
                implements,
                body,
                is_abstract: class.is_abstract,
                declare,
            }
        } else {
            NodeKind::ClassExpression {
                decorators,
                id,
                type_parameters,
                super_class,
                super_type_arguments,
                implements,
                body,
                is_abstract: class.is_abstract,
            }
        };
        self.make_at(kind, range, Some(if declaration { "ClassDecl" } else { "ClassExpr" }))
    }

    fn class_body(&mut self, members: &[ClassMember], header_end: u32, end: u32) -> NodeId {
        let body = members.iter().filter_map(|m| self.class_member(m)).collect();
        let start = self
            .first_token_in(Range::new(header_end, end), |t| t.is_punctuator("{"))
            .map_or(header_end, |t| t.range.start);
        self.make_at(NodeKind::ClassBody { body }, Some(Range::new(start, end)), None)
    }

    fn class_member(&mut self, member: &ClassMember) -> Option<NodeId> {
        let id = match member {
            ClassMember::Constructor(c) => self.constructor(c),
            ClassMember::Method(m) => {
                let (key, computed) = self.prop_name(&m.key);
                let modifiers = Modifiers {
                    is_static: m.is_static,
                    is_abstract: m.is_abstract,
                    optional: m.is_optional,
                    is_override: m.is_override,
                    accessibility: accessibility(m.accessibility),
                    ..Default::default()
                };
                self.class_method(key, computed, &m.function, method_kind(m.kind), modifiers, m.span)
            }
            ClassMember::PrivateMethod(m) => {
                let key = self.private_name(&m.key);
                let modifiers = Modifiers {
                    is_static: m.is_static,
                    is_abstract: m.is_abstract,
                    optional: m.is_optional,
                    is_override: m.is_override,
                    accessibility: accessibility(m.accessibility),
                    ..Default::default()
                };
                self.class_method(key, false, &m.function, method_kind(m.kind), modifiers, m.span)
            }
            ClassMember::ClassProp(p) => self.class_prop(p),
            ClassMember::PrivateProp(p) => self.private_prop(p),
            ClassMember::TsIndexSignature(s) => self.index_signature(s),
            ClassMember::Empty(_) => return None,
            ClassMember::StaticBlock(b) => {
                let body = self.statements(&b.body.stmts, false);
                self.make(NodeKind::StaticBlock { body }, b.span, "StaticBlock")
            }
            ClassMember::AutoAccessor(a) => self.auto_accessor(a),
        };
        Some(id)
    }

    fn class_method(
        &mut self,
        key: NodeId,
        computed: bool,
        function: &Function,
        kind: MethodKind,
        m: Modifiers,
        span: Span,
    ) -> NodeId {
        let decorators = self.decorators(&function.decorators);
        let value = self.method_value(function, key);
        let kind = if m.is_abstract {
            NodeKind::TSAbstractMethodDefinition {
                decorators,
                key,
                value,
                kind,
                computed,
                is_static: m.is_static,
                optional: m.optional,
                is_override: m.is_override,
                accessibility: m.accessibility,
            }
        } else {
            NodeKind::MethodDefinition {
                decorators,
                key,
                value,
                kind,
                computed,
                is_static: m.is_static,
                optional: m.optional,
                is_override: m.is_override,
                accessibility: m.accessibility,
            }
        };
        let range = self.span_range(span);
        self.make_at(kind, range, Some("ClassMethod"))
    }

    fn constructor(&mut self, c: &Constructor) -> NodeId {
        let (key, computed) = self.prop_name(&c.key);
        let params = c
            .params
            .iter()
            .map(|p| match p {
                ParamOrTsParamProp::Param(p) => self.param(p),
                ParamOrTsParamProp::TsParamProp(p) => self.ts_param_prop(p),
            })
            .collect();
        let body = c.body.as_ref().map(|b| self.function_body(b));
        let range = self.method_range(key, c.span);
        let parts = FunctionParts {
            type_parameters: None,
            params,
            return_type: None,
            body,
        };
        let value = self.method_value_from_parts(parts, false, false, range);
        self.make(
            NodeKind::MethodDefinition {
                decorators: Vec::new(),
                key,
                value,
                kind: MethodKind::Constructor,
                computed,
                is_static: false,
                optional: c.is_optional,
                is_override: false,
                accessibility: accessibility(c.accessibility),
            },
            c.span,
            "Constructor",
        )
    }

    fn ts_param_prop(&mut self, p: &TsParamProp) -> NodeId {
        let decorators = self.decorators(&p.decorators);
        let parameter = match &p.param {
            TsParamPropParam::Ident(b) => self.binding_ident(b, Vec::new()),
            TsParamPropParam::Assign(a) => self.assign_pat(a, Vec::new()),
        };
        self.make(
            NodeKind::TSParameterProperty {
                decorators,
                parameter,
                accessibility: accessibility(p.accessibility),
                readonly: p.readonly,
                is_override: p.is_override,
            },
            p.span,
            "TsParamProp",
        )
    }

    fn property_definition(
        &mut self,
        decorators: Vec<NodeId>,
        (key, computed): (NodeId, bool),
        type_annotation: Option<NodeId>,
        value: Option<NodeId>,
        m: Modifiers,
        span: Span,
    ) -> NodeId {
        let kind = if m.is_abstract {
            NodeKind::TSAbstractPropertyDefinition {
                decorators,
                key,
                type_annotation,
                value,
                computed,
                is_static: m.is_static,
                declare: m.declare,
                readonly: m.readonly,
                optional: m.optional,
                definite: m.definite,
                is_override: m.is_override,
                accessibility: m.accessibility,
            }
        } else {
            NodeKind::PropertyDefinition {
                decorators,
                key,
                type_annotation,
                value,
                computed,
                is_static: m.is_static,
                declare: m.declare,
                readonly: m.readonly,
                optional: m.optional,
                definite: m.definite,
                is_override: m.is_override,
                accessibility: m.accessibility,
            }
        };
        let range = self.span_range(span).map(|r| self.with_semicolon(r));
        self.make_at(kind, range, Some("ClassProp"))
    }

    fn class_prop(&mut self, p: &ClassProp) -> NodeId {
        let decorators = self.decorators(&p.decorators);
        let key = self.prop_name(&p.key);
        let type_annotation = p.type_ann.as_deref().map(|t| self.type_ann(t));
        let value = p.value.as_deref().map(|e| self.expr(e));
        let modifiers = Modifiers {
            is_static: p.is_static,
            is_abstract: p.is_abstract,
            optional: p.is_optional,
            is_override: p.is_override,
            readonly: p.readonly,
            declare: p.declare,
            definite: p.definite,
            accessibility: accessibility(p.accessibility),
        };
        self.property_definition(decorators, key, type_annotation, value, modifiers, p.span)
    }

    fn private_prop(&mut self, p: &PrivateProp) -> NodeId {
        let decorators = self.decorators(&p.decorators);
        let key = self.private_name(&p.key);
        let type_annotation = p.type_ann.as_deref().map(|t| self.type_ann(t));
        let value = p.value.as_deref().map(|e| self.expr(e));
        let modifiers = Modifiers {
            is_static: p.is_static,
            optional: p.is_optional,
            is_override: p.is_override,
            readonly: p.readonly,
            definite: p.definite,
            accessibility: accessibility(p.accessibility),
            ..Default::default()
        };
        self.property_definition(decorators, (key, false), type_annotation, value, modifiers, p.span)
    }

    fn auto_accessor(&mut self, a: &AutoAccessor) -> NodeId {
        let decorators = self.decorators(&a.decorators);
        let (key, computed) = match &a.key {
            Key::Private(p) => (self.private_name(p), false),
            Key::Public(k) => self.prop_name(k),
        };
        let type_annotation = a.type_ann.as_deref().map(|t| self.type_ann(t));
        let value = a.value.as_deref().map(|e| self.expr(e));
        let accessibility = accessibility(a.accessibility);
        let kind = if a.is_abstract {
            NodeKind::TSAbstractAccessorProperty {
                decorators,
                key,
                type_annotation,
                value,
                computed,
                is_static: a.is_static,
                definite: a.definite,
                is_override: a.is_override,
                accessibility,
            }
        } else {
            NodeKind::AccessorProperty {
                decorators,
                key,
                type_annotation,
                value,
                computed,
                is_static: a.is_static,
                definite: a.definite,
                is_override: a.is_override,
                accessibility,
            }
        };
        let range = self.span_range(a.span).map(|r| self.with_semicolon(r));
        self.make_at(kind, range, Some("AutoAccessor"))
    }
}

fn method_kind(kind: swc_ecma_ast::MethodKind) -> MethodKind {
    match kind {
        swc_ecma_ast::MethodKind::Method => MethodKind::Method,
        swc_ecma_ast::MethodKind::Getter => MethodKind::Get,
        swc_ecma_ast::MethodKind::Setter => MethodKind::Set,
    }
}
