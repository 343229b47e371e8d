//! Expression, literal and function conversion

use super::Converter;
use crate::ast::{LiteralValue, NodeId, NodeKind, PropertyKind, RegExpValue, TemplateValue};
use crate::position::Range;
use crate::tokens;
use swc_common::Span;
use swc_ecma_ast::{
    BigInt, BinaryOp, BlockStmtOrExpr, CallExpr, Callee, Expr, ExprOrSpread, FnExpr, Function,
    Lit, MemberExpr, MemberProp, MetaPropExpr, MetaPropKind, ObjectLit, OptChainBase,
    OptChainExpr, PrivateName, Prop, PropName, PropOrSpread, SpreadElement, Str, SuperProp,
    SuperPropExpr, Tpl, TplElement, TsAsExpr, TsConstAssertion, TsInstantiation, TsNonNullExpr,
    TsSatisfiesExpr, TsTypeAssertion, TsTypeParamInstantiation,
};

/// Converted pieces shared by every function-like node
pub(super) struct FunctionParts {
    pub type_parameters: Option<NodeId>,
    pub params: Vec<NodeId>,
    pub return_type: Option<NodeId>,
    pub body: Option<NodeId>,
}

/// Whether an expression is an optional chain or a link inside one
fn chain_has_optional(e: &Expr) -> bool {
    match e {
        Expr::OptChain(_) => true,
        Expr::Member(m) => chain_has_optional(&m.obj),
        Expr::Call(c) => match &c.callee {
            Callee::Expr(callee) => chain_has_optional(callee),
            _ => false,
        },
        _ => false,
    }
}

impl Converter<'_> {
    pub(super) fn expr(&mut self, e: &Expr) -> NodeId {
        match e {
            Expr::This(t) => self.make(NodeKind::ThisExpression {}, t.span, "ThisExpr"),
            Expr::Array(a) => {
                let elements = a
                    .elems
                    .iter()
                    .map(|el| el.as_ref().map(|x| self.expr_or_spread(x)))
                    .collect();
                self.make(NodeKind::ArrayExpression { elements }, a.span, "ArrayLit")
            }
            Expr::Object(o) => self.object_lit(o),
            Expr::Fn(f) => self.fn_expr(f),
            Expr::Unary(u) => {
                let argument = self.expr(&u.arg);
                self.make(
                    NodeKind::UnaryExpression {
                        operator: u.op.as_str(),
                        prefix: true,
                        argument,
                    },
                    u.span,
                    "UnaryExpr",
                )
            }
            Expr::Update(u) => {
                let argument = self.expr(&u.arg);
                self.make(
                    NodeKind::UpdateExpression {
                        operator: u.op.as_str(),
                        prefix: u.prefix,
                        argument,
                    },
                    u.span,
                    "UpdateExpr",
                )
            }
            Expr::Bin(b) => {
                let left = self.expr(&b.left);
                let right = self.expr(&b.right);
                let operator = b.op.as_str();
                let kind = match b.op {
                    BinaryOp::LogicalAnd | BinaryOp::LogicalOr | BinaryOp::NullishCoalescing => {
                        NodeKind::LogicalExpression {
                            operator,
                            left,
                            right,
                        }
                    }
                    _ => NodeKind::BinaryExpression {
                        operator,
                        left,
                        right,
                    },
                };
                self.make(kind, b.span, "BinExpr")
            }
            Expr::Assign(a) => {
                let left = self.assign_target(&a.left);
                let right = self.expr(&a.right);
                self.make(
                    NodeKind::AssignmentExpression {
                        operator: a.op.as_str(),
                        left,
                        right,
                    },
                    a.span,
                    "AssignExpr",
                )
            }
            Expr::Member(m) => self.member_expr(m),
            Expr::SuperProp(s) => self.super_prop(s),
            Expr::Cond(c) => {
                let test = self.expr(&c.test);
                let consequent = self.expr(&c.cons);
                let alternate = self.expr(&c.alt);
                self.make(
                    NodeKind::ConditionalExpression {
                        test,
                        consequent,
                        alternate,
                    },
                    c.span,
                    "CondExpr",
                )
            }
            Expr::Call(c) => self.call_expr(c),
            Expr::New(n) => {
                let callee = self.expr(&n.callee);
                let type_arguments = n.type_args.as_deref().map(|t| self.type_args(t));
                let arguments = n
                    .args
                    .iter()
                    .flatten()
                    .map(|a| self.expr_or_spread(a))
                    .collect();
                self.make(
                    NodeKind::NewExpression {
                        callee,
                        type_arguments,
                        arguments,
                    },
                    n.span,
                    "NewExpr",
                )
            }
            Expr::Seq(s) => {
                let expressions = s.exprs.iter().map(|e| self.expr(e)).collect();
                self.make(NodeKind::SequenceExpression { expressions }, s.span, "SeqExpr")
            }
            Expr::Ident(i) => self.ident(i),
            Expr::Lit(l) => self.lit(l),
            Expr::Tpl(t) => self.tpl(t),
            Expr::TaggedTpl(t) => {
                let tag = self.expr(&t.tag);
                let type_arguments = t.type_params.as_deref().map(|p| self.type_args(p));
                let quasi = self.tpl(&t.tpl);
                self.make(
                    NodeKind::TaggedTemplateExpression {
                        tag,
                        type_arguments,
                        quasi,
                    },
                    t.span,
                    "TaggedTpl",
                )
            }
            Expr::Arrow(a) => {
                let type_parameters = a.type_params.as_deref().map(|t| self.type_param_decl(t));
                let params = a.params.iter().map(|p| self.pat(p)).collect();
                let return_type = a.return_type.as_deref().map(|t| self.type_ann(t));
                let (body, expression) = match &*a.body {
                    BlockStmtOrExpr::BlockStmt(b) => (self.function_body(b), false),
                    BlockStmtOrExpr::Expr(e) => (self.expr(e), true),
                };
                self.make(
                    NodeKind::ArrowFunctionExpression {
                        type_parameters,
                        params,
                        return_type,
                        body,
                        generator: a.is_generator,
                        is_async: a.is_async,
                        expression,
                    },
                    a.span,
                    "ArrowExpr",
                )
            }
            Expr::Class(c) => self.class_expr(c),
            Expr::Yield(y) => {
                let argument = y.arg.as_deref().map(|e| self.expr(e));
                self.make(
                    NodeKind::YieldExpression {
                        argument,
                        delegate: y.delegate,
                    },
                    y.span,
                    "YieldExpr",
                )
            }
            Expr::MetaProp(m) => self.meta_prop(m),
            Expr::Await(a) => {
                let argument = self.expr(&a.arg);
                self.make(NodeKind::AwaitExpression { argument }, a.span, "AwaitExpr")
            }
            // ESTree has no parenthesized expression node
            Expr::Paren(p) => self.expr(&p.expr),
            Expr::JSXMember(m) => self.jsx_member(m),
            Expr::JSXNamespacedName(n) => self.jsx_namespaced_name(n),
            Expr::JSXEmpty(e) => self.make(NodeKind::JSXEmptyExpression {}, e.span, "JSXEmptyExpr"),
            Expr::JSXElement(el) => self.jsx_element(el),
            Expr::JSXFragment(f) => self.jsx_fragment(f),
            Expr::TsTypeAssertion(t) => self.ts_type_assertion(t),
            Expr::TsConstAssertion(c) => self.ts_const_assertion(c),
            Expr::TsNonNull(n) => self.ts_non_null(n),
            Expr::TsAs(a) => self.ts_as(a),
            Expr::TsInstantiation(i) => self.ts_instantiation(i),
            Expr::TsSatisfies(s) => self.ts_satisfies(s),
            Expr::PrivateName(p) => self.private_name(p),
            Expr::OptChain(o) => self.opt_chain(o),
            Expr::Invalid(i) => self.unsupported("Invalid", i.span),
        }
    }

    pub(super) fn expr_or_spread(&mut self, a: &ExprOrSpread) -> NodeId {
        let argument = self.expr(&a.expr);
        match a.spread {
            Some(dot3) => {
                let end = self.range_of(argument).end;
                let range = self.span_range(dot3).map(|r| Range::new(r.start, end));
                self.make_at(NodeKind::SpreadElement { argument }, range, Some("ExprOrSpread"))
            }
            None => argument,
        }
    }

    pub(super) fn spread_element(&mut self, s: &SpreadElement) -> NodeId {
        let argument = self.expr(&s.expr);
        let end = self.range_of(argument).end;
        let range = self.span_range(s.dot3_token).map(|r| Range::new(r.start, end));
        self.make_at(NodeKind::SpreadElement { argument }, range, Some("SpreadElement"))
    }

    pub(super) fn private_name(&mut self, p: &PrivateName) -> NodeId {
        self.make(
            NodeKind::PrivateIdentifier {
                name: p.name.to_string(),
            },
            p.span,
            "PrivateName",
        )
    }

    // Member expressions and optional chains

    pub(super) fn member_expr(&mut self, m: &MemberExpr) -> NodeId {
        if chain_has_optional(&m.obj) {
            let link = self.chain_member(m, false);
            let range = self.range_of(link);
            return self.make_at(NodeKind::ChainExpression { expression: link }, Some(range), None);
        }
        let object = self.expr(&m.obj);
        self.member_parts(object, &m.prop, m.span, false)
    }

    fn member_parts(&mut self, object: NodeId, prop: &MemberProp, span: Span, optional: bool) -> NodeId {
        let (property, computed) = match prop {
            MemberProp::Ident(i) => (self.ident_name(i), false),
            MemberProp::PrivateName(p) => (self.private_name(p), false),
            MemberProp::Computed(c) => (self.expr(&c.expr), true),
        };
        self.make(
            NodeKind::MemberExpression {
                object,
                property,
                computed,
                optional,
            },
            span,
            "MemberExpr",
        )
    }

    pub(super) fn super_prop(&mut self, s: &SuperPropExpr) -> NodeId {
        let object = self.make(NodeKind::Super {}, s.obj.span, "Super");
        let (property, computed) = match &s.prop {
            SuperProp::Ident(i) => (self.ident_name(i), false),
            SuperProp::Computed(c) => (self.expr(&c.expr), true),
        };
        self.make(
            NodeKind::MemberExpression {
                object,
                property,
                computed,
                optional: false,
            },
            s.span,
            "SuperPropExpr",
        )
    }

    pub(super) fn opt_chain(&mut self, o: &OptChainExpr) -> NodeId {
        let link = self.opt_chain_link(o);
        let range = self.span_range(o.span);
        self.make_at(NodeKind::ChainExpression { expression: link }, range, Some("OptChainExpr"))
    }

    /// One link of a chain, converted without its own `ChainExpression`
    fn opt_chain_link(&mut self, o: &OptChainExpr) -> NodeId {
        match &*o.base {
            OptChainBase::Member(m) => self.chain_member(m, o.optional),
            OptChainBase::Call(c) => {
                self.chain_call(&c.callee, &c.args, c.type_args.as_deref(), c.span, o.optional)
            }
        }
    }

    fn chain_member(&mut self, m: &MemberExpr, optional: bool) -> NodeId {
        let object = self.chain_object(&m.obj);
        self.member_parts(object, &m.prop, m.span, optional)
    }

    fn chain_call(
        &mut self,
        callee: &Expr,
        args: &[ExprOrSpread],
        type_args: Option<&TsTypeParamInstantiation>,
        span: Span,
        optional: bool,
    ) -> NodeId {
        let callee = self.chain_object(callee);
        let type_arguments = type_args.map(|t| self.type_args(t));
        let arguments = args.iter().map(|a| self.expr_or_spread(a)).collect();
        self.make(
            NodeKind::CallExpression {
                callee,
                type_arguments,
                arguments,
                optional,
            },
            span,
            "CallExpr",
        )
    }

    /// Object or callee of a chain link; a parenthesized chain ends the chain
    fn chain_object(&mut self, e: &Expr) -> NodeId {
        match e {
            Expr::OptChain(o) => self.opt_chain_link(o),
            Expr::Member(m) if chain_has_optional(&m.obj) => self.chain_member(m, false),
            Expr::Call(c) => match &c.callee {
                Callee::Expr(callee) if chain_has_optional(callee) => {
                    self.chain_call(callee, &c.args, c.type_args.as_deref(), c.span, false)
                }
                _ => self.expr(e),
            },
            _ => self.expr(e),
        }
    }

    fn call_expr(&mut self, c: &CallExpr) -> NodeId {
        let callee = match &c.callee {
            Callee::Import(_) => {
                let Some(first) = c.args.first() else {
                    return self.unsupported("Import", c.span);
                };
                let source = self.expr(&first.expr);
                let options = c.args.get(1).map(|a| self.expr(&a.expr));
                return self.make(NodeKind::ImportExpression { source, options }, c.span, "CallExpr");
            }
            Callee::Super(s) => self.make(NodeKind::Super {}, s.span, "Super"),
            Callee::Expr(callee) if chain_has_optional(callee) => {
                let link = self.chain_call(callee, &c.args, c.type_args.as_deref(), c.span, false);
                let range = self.range_of(link);
                return self.make_at(NodeKind::ChainExpression { expression: link }, Some(range), None);
            }
            Callee::Expr(callee) => self.expr(callee),
        };
        let type_arguments = c.type_args.as_deref().map(|t| self.type_args(t));
        let arguments = c.args.iter().map(|a| self.expr_or_spread(a)).collect();
        self.make(
            NodeKind::CallExpression {
                callee,
                type_arguments,
                arguments,
                optional: false,
            },
            c.span,
            "CallExpr",
        )
    }

    fn meta_prop(&mut self, m: &MetaPropExpr) -> NodeId {
        let (meta, property) = match m.kind {
            MetaPropKind::NewTarget => ("new", "target"),
            MetaPropKind::ImportMeta => ("import", "meta"),
        };
        let range = self.span_range(m.span);
        let meta_range = range.map(|r| Range::new(r.start, r.start + meta.len() as u32));
        let property_range =
            range.map(|r| Range::new(r.end.saturating_sub(property.len() as u32), r.end));
        let meta = self.identifier_at(meta.to_string(), meta_range, None);
        let property = self.identifier_at(property.to_string(), property_range, None);
        self.make_at(NodeKind::MetaProperty { meta, property }, range, Some("MetaPropExpr"))
    }

    // Objects

    fn object_lit(&mut self, o: &ObjectLit) -> NodeId {
        let properties = o
            .props
            .iter()
            .map(|p| match p {
                PropOrSpread::Spread(s) => self.spread_element(s),
                PropOrSpread::Prop(prop) => self.prop(prop),
            })
            .collect();
        self.make(NodeKind::ObjectExpression { properties }, o.span, "ObjectLit")
    }

    /// Key of a property or class member, plus its `computed` flag
    pub(super) fn prop_name(&mut self, key: &PropName) -> (NodeId, bool) {
        match key {
            PropName::Ident(i) => (self.ident_name(i), false),
            PropName::Str(s) => (self.str_lit(s), false),
            PropName::Num(n) => (self.literal(LiteralValue::Number(n.value), n.span, "Number"), false),
            PropName::BigInt(b) => (self.bigint_lit(b), false),
            PropName::Computed(c) => (self.expr(&c.expr), true),
        }
    }

    fn property(
        &mut self,
        key: NodeId,
        value: NodeId,
        kind: PropertyKind,
        flags: (bool, bool, bool),
        range: Option<Range>,
        upstream: &'static str,
    ) -> NodeId {
        let (method, shorthand, computed) = flags;
        self.make_at(
            NodeKind::Property {
                key,
                value,
                kind,
                method,
                shorthand,
                computed,
                optional: false,
            },
            range,
            Some(upstream),
        )
    }

    fn prop(&mut self, prop: &Prop) -> NodeId {
        match prop {
            Prop::Shorthand(i) => {
                let key = self.ident(i);
                let value = self.ident(i);
                let range = self.span_range(i.span);
                self.property(key, value, PropertyKind::Init, (false, true, false), range, "Shorthand")
            }
            Prop::KeyValue(kv) => {
                let (key, computed) = self.prop_name(&kv.key);
                let value = self.expr(&kv.value);
                self.property(key, value, PropertyKind::Init, (false, false, computed), None, "KeyValueProp")
            }
            Prop::Assign(a) => {
                let key = self.ident(&a.key);
                let left = self.ident(&a.key);
                let right = self.expr(&a.value);
                let value = self.make_at(
                    NodeKind::AssignmentPattern {
                        decorators: Vec::new(),
                        left,
                        right,
                    },
                    None,
                    None,
                );
                let range = self.span_range(a.span);
                self.property(key, value, PropertyKind::Init, (false, true, false), range, "AssignProp")
            }
            Prop::Getter(g) => {
                let (key, computed) = self.prop_name(&g.key);
                let return_type = g.type_ann.as_deref().map(|t| self.type_ann(t));
                let body = g.body.as_ref().map(|b| self.function_body(b));
                let range = self.method_range(key, g.span);
                let parts = FunctionParts {
                    type_parameters: None,
                    params: Vec::new(),
                    return_type,
                    body,
                };
                let value = self.method_value_from_parts(parts, false, false, range);
                let range = self.span_range(g.span);
                self.property(key, value, PropertyKind::Get, (false, false, computed), range, "GetterProp")
            }
            Prop::Setter(s) => {
                let (key, computed) = self.prop_name(&s.key);
                let mut params: Vec<NodeId> = s.this_param.iter().map(|p| self.pat(p)).collect();
                params.push(self.pat(&s.param));
                let body = s.body.as_ref().map(|b| self.function_body(b));
                let range = self.method_range(key, s.span);
                let parts = FunctionParts {
                    type_parameters: None,
                    params,
                    return_type: None,
                    body,
                };
                let value = self.method_value_from_parts(parts, false, false, range);
                let range = self.span_range(s.span);
                self.property(key, value, PropertyKind::Set, (false, false, computed), range, "SetterProp")
            }
            Prop::Method(m) => {
                let (key, computed) = self.prop_name(&m.key);
                let value = self.method_value(&m.function, key);
                self.property(key, value, PropertyKind::Init, (true, false, computed), None, "MethodProp")
            }
        }
    }

    // Functions

    pub(super) fn function_parts(&mut self, f: &Function) -> FunctionParts {
        let type_parameters = f.type_params.as_deref().map(|t| self.type_param_decl(t));
        let params = f.params.iter().map(|p| self.param(p)).collect();
        let return_type = f.return_type.as_deref().map(|t| self.type_ann(t));
        let body = f.body.as_ref().map(|b| self.function_body(b));
        FunctionParts {
            type_parameters,
            params,
            return_type,
            body,
        }
    }

    fn fn_expr(&mut self, f: &FnExpr) -> NodeId {
        let id = f.ident.as_ref().map(|i| self.ident(i));
        let parts = self.function_parts(&f.function);
        let Some(body) = parts.body else {
            return self.unsupported("FnExpr", f.function.span);
        };
        self.make(
            NodeKind::FunctionExpression {
                id,
                type_parameters: parts.type_parameters,
                params: parts.params,
                return_type: parts.return_type,
                body,
                generator: f.function.is_generator,
                is_async: f.function.is_async,
                expression: false,
                declare: false,
            },
            f.function.span,
            "FnExpr",
        )
    }

    /// Range of a method's function value: from its type parameters or
    /// parameter list to the end of the member
    pub(super) fn method_range(&self, key: NodeId, member: Span) -> Range {
        let after = self.range_of(key).end;
        let end = self.span_range(member).map_or(after, |r| r.end.max(after));
        let start = self
            .first_token_in(Range::new(after, end), |t| {
                t.is_punctuator("(") || t.is_punctuator("<")
            })
            .map_or(after, |t| t.range.start);
        Range::new(start, end)
    }

    /// Function value of a class or object method
    pub(super) fn method_value(&mut self, function: &Function, key: NodeId) -> NodeId {
        let parts = self.function_parts(function);
        let range = self.method_range(key, function.span);
        self.method_value_from_parts(parts, function.is_generator, function.is_async, range)
    }

    /// Body-less methods are overload or abstract signatures
    pub(super) fn method_value_from_parts(
        &mut self,
        parts: FunctionParts,
        generator: bool,
        is_async: bool,
        range: Range,
    ) -> NodeId {
        let kind = match parts.body {
            Some(body) => NodeKind::FunctionExpression {
                id: None,
                type_parameters: parts.type_parameters,
                params: parts.params,
                return_type: parts.return_type,
                body,
                generator,
                is_async,
                expression: false,
                declare: false,
            },
            None => NodeKind::TSEmptyBodyFunctionExpression {
                id: None,
                type_parameters: parts.type_parameters,
                params: parts.params,
                return_type: parts.return_type,
                generator,
                is_async,
                expression: false,
                declare: false,
            },
        };
        self.make_at(kind, Some(range), Some("Function"))
    }

    // Literals

    pub(super) fn lit(&mut self, l: &Lit) -> NodeId {
        match l {
            Lit::Str(s) => self.str_lit(s),
            Lit::Bool(b) => self.literal(LiteralValue::Boolean(b.value), b.span, "Bool"),
            Lit::Null(n) => self.literal(LiteralValue::Null, n.span, "Null"),
            Lit::Num(n) => self.literal(LiteralValue::Number(n.value), n.span, "Number"),
            Lit::BigInt(b) => self.bigint_lit(b),
            Lit::Regex(r) => self.literal(
                LiteralValue::RegExp {
                    regex: RegExpValue {
                        pattern: r.exp.to_string(),
                        flags: r.flags.to_string(),
                    },
                },
                r.span,
                "Regex",
            ),
            Lit::JSXText(t) => self.jsx_text(t),
        }
    }

    pub(super) fn literal(&mut self, value: LiteralValue, span: Span, upstream: &'static str) -> NodeId {
        let range = self.span_range(span);
        let raw = range.map(|r| self.text(r).to_string()).unwrap_or_default();
        self.make_at(NodeKind::Literal { value, raw }, range, Some(upstream))
    }

    pub(super) fn str_lit(&mut self, s: &Str) -> NodeId {
        // Wtf8Atom to String via to_atom_lossy (lone surrogates become U+FFFD)
        let value = s.value.to_atom_lossy().to_string();
        self.literal(LiteralValue::String(value), s.span, "Str")
    }

    pub(super) fn bigint_lit(&mut self, b: &BigInt) -> NodeId {
        let raw = self.span_range(b.span).map(|r| self.text(r)).unwrap_or("");
        let bigint = raw.trim_end_matches('n').replace('_', "");
        self.literal(LiteralValue::BigInt { bigint }, b.span, "BigInt")
    }

    pub(super) fn tpl(&mut self, t: &Tpl) -> NodeId {
        let quasis = self.tpl_elements(&t.quasis);
        let expressions = t.exprs.iter().map(|e| self.expr(e)).collect();
        self.make(NodeKind::TemplateLiteral { quasis, expressions }, t.span, "Tpl")
    }

    pub(super) fn tpl_elements(&mut self, quasis: &[TplElement]) -> Vec<NodeId> {
        quasis.iter().map(|q| self.tpl_element(q)).collect()
    }

    /// Template chunks include their delimiters: the opening `` ` `` or `}`,
    /// and the closing `` ` `` or `${`
    fn tpl_element(&mut self, q: &TplElement) -> NodeId {
        let len = self.index.len();
        let range = self.span_range(q.span).map(|r| {
            let closing = if q.tail { 1 } else { 2 };
            Range::new(r.start.saturating_sub(1), (r.end + closing).min(len))
        });
        let raw = q.raw.to_string();
        let cooked = cook_template(&raw);
        self.make_at(
            NodeKind::TemplateElement {
                value: TemplateValue { raw, cooked },
                tail: q.tail,
            },
            range,
            Some("TplElement"),
        )
    }

    // TypeScript expressions

    pub(super) fn ts_as(&mut self, a: &TsAsExpr) -> NodeId {
        let expression = self.expr(&a.expr);
        let type_annotation = self.ts_type(&a.type_ann);
        self.make(
            NodeKind::TSAsExpression {
                expression,
                type_annotation,
            },
            a.span,
            "TsAsExpr",
        )
    }

    pub(super) fn ts_satisfies(&mut self, s: &TsSatisfiesExpr) -> NodeId {
        let expression = self.expr(&s.expr);
        let type_annotation = self.ts_type(&s.type_ann);
        self.make(
            NodeKind::TSSatisfiesExpression {
                expression,
                type_annotation,
            },
            s.span,
            "TsSatisfiesExpr",
        )
    }

    pub(super) fn ts_type_assertion(&mut self, t: &TsTypeAssertion) -> NodeId {
        let type_annotation = self.ts_type(&t.type_ann);
        let expression = self.expr(&t.expr);
        self.make(
            NodeKind::TSTypeAssertion {
                type_annotation,
                expression,
            },
            t.span,
            "TsTypeAssertion",
        )
    }

    pub(super) fn ts_non_null(&mut self, n: &TsNonNullExpr) -> NodeId {
        let expression = self.expr(&n.expr);
        self.make(NodeKind::TSNonNullExpression { expression }, n.span, "TsNonNullExpr")
    }

    pub(super) fn ts_instantiation(&mut self, i: &TsInstantiation) -> NodeId {
        let expression = self.expr(&i.expr);
        let type_arguments = self.type_args(&i.type_args);
        self.make(
            NodeKind::TSInstantiationExpression {
                expression,
                type_arguments,
            },
            i.span,
            "TsInstantiation",
        )
    }

    /// `x as const` and `<const>x` both name the type `const`
    fn ts_const_assertion(&mut self, c: &TsConstAssertion) -> NodeId {
        let range = self.span_range(c.span);
        // Angle-bracket assertions don't exist in markup files
        let angle = !self.jsx && range.is_some_and(|r| self.text(r).starts_with('<'));
        let expression = self.expr(&c.expr);
        let const_token = range.and_then(|r| {
            let inside = tokens::tokens_in(self.tokens, r);
            if angle {
                inside.iter().find(|t| t.is_word("const"))
            } else {
                inside.iter().rev().find(|t| t.is_word("const"))
            }
        });
        let const_range = const_token.map(|t| t.range);
        let type_name = self.identifier_at("const".to_string(), const_range, None);
        let type_annotation = self.make_at(
            NodeKind::TSTypeReference {
                type_name,
                type_arguments: None,
            },
            const_range,
            None,
        );
        let kind = if angle {
            NodeKind::TSTypeAssertion {
                type_annotation,
                expression,
            }
        } else {
            NodeKind::TSAsExpression {
                expression,
                type_annotation,
            }
        };
        self.make_at(kind, range, Some("TsConstAssertion"))
    }
}

/// Evaluate the escapes of a template chunk
///
/// Returns `None` for chunks with invalid escapes, which only tagged
/// templates may contain.
pub(super) fn cook_template(raw: &str) -> Option<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
            continue;
        }
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(char::is_ascii_digit) => out.push('\0'),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            'x' => {
                let code = read_hex(&mut chars, 2)?;
                out.push(char::from_u32(code)?);
            }
            'u' => {
                let code = if chars.peek() == Some(&'{') {
                    chars.next();
                    let mut digits = String::new();
                    loop {
                        match chars.next()? {
                            '}' => break,
                            d => digits.push(d),
                        }
                    }
                    u32::from_str_radix(&digits, 16).ok().filter(|c| *c <= 0x10ffff)?
                } else {
                    read_hex(&mut chars, 4)?
                };
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            d if d.is_ascii_digit() => return None,
            other => out.push(other),
        }
    }
    Some(out)
}

fn read_hex(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, n: usize) -> Option<u32> {
    let mut digits = String::with_capacity(n);
    for _ in 0..n {
        digits.push(chars.next()?);
    }
    u32::from_str_radix(&digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::cook_template;

    #[test]
    fn test_cook_simple_escapes() {
        assert_eq!(cook_template("a\\nb").as_deref(), Some("a\nb"));
        assert_eq!(cook_template("\\x41\\u0042\\u{43}").as_deref(), Some("ABC"));
        assert_eq!(cook_template("line\\\ncontinued").as_deref(), Some("linecontinued"));
        assert_eq!(cook_template("a\r\nb").as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_cook_invalid_escapes() {
        assert_eq!(cook_template("\\unicode"), None);
        assert_eq!(cook_template("\\01"), None);
        assert_eq!(cook_template("\\xZZ"), None);
    }
}
