//! TypeScript type and declaration conversion

use super::Converter;
use crate::ast::{LiteralValue, MappedModifier, MethodKind, ModuleKind, NodeId, NodeKind};
use crate::position::Range;
use swc_ecma_ast::{
    TruePlusMinus, TsEntityName, TsEnumDecl, TsEnumMemberId, TsExprWithTypeArgs, TsFnOrConstructorType,
    TsFnParam, TsIndexSignature, TsInterfaceDecl, TsKeywordTypeKind, TsLit, TsLitType, TsModuleDecl,
    TsModuleName, TsNamespaceBody, TsThisTypeOrIdent, TsTupleElement, TsType, TsTypeAliasDecl, TsTypeAnn,
    TsTypeElement, TsTypeOperatorOp, TsTypeParam, TsTypeParamDecl, TsTypeParamInstantiation,
    TsTypeQueryExpr, TsUnionOrIntersectionType,
};

fn mapped_modifier(m: Option<TruePlusMinus>) -> Option<MappedModifier> {
    m.map(|m| match m {
        TruePlusMinus::True => MappedModifier::True,
        TruePlusMinus::Plus => MappedModifier::Plus,
        TruePlusMinus::Minus => MappedModifier::Minus,
    })
}

fn keyword_kind(kind: TsKeywordTypeKind) -> NodeKind {
    match kind {
        TsKeywordTypeKind::TsAnyKeyword => NodeKind::TSAnyKeyword {},
        TsKeywordTypeKind::TsUnknownKeyword => NodeKind::TSUnknownKeyword {},
        TsKeywordTypeKind::TsNumberKeyword => NodeKind::TSNumberKeyword {},
        TsKeywordTypeKind::TsObjectKeyword => NodeKind::TSObjectKeyword {},
        TsKeywordTypeKind::TsBooleanKeyword => NodeKind::TSBooleanKeyword {},
        TsKeywordTypeKind::TsBigIntKeyword => NodeKind::TSBigIntKeyword {},
        TsKeywordTypeKind::TsStringKeyword => NodeKind::TSStringKeyword {},
        TsKeywordTypeKind::TsSymbolKeyword => NodeKind::TSSymbolKeyword {},
        TsKeywordTypeKind::TsVoidKeyword => NodeKind::TSVoidKeyword {},
        TsKeywordTypeKind::TsUndefinedKeyword => NodeKind::TSUndefinedKeyword {},
        TsKeywordTypeKind::TsNullKeyword => NodeKind::TSNullKeyword {},
        TsKeywordTypeKind::TsNeverKeyword => NodeKind::TSNeverKeyword {},
        TsKeywordTypeKind::TsIntrinsicKeyword => NodeKind::TSIntrinsicKeyword {},
    }
}

impl Converter<'_> {
    pub(super) fn type_ann(&mut self, t: &TsTypeAnn) -> NodeId {
        let type_annotation = self.ts_type(&t.type_ann);
        self.make(NodeKind::TSTypeAnnotation { type_annotation }, t.span, "TsTypeAnn")
    }

    pub(super) fn type_param_decl(&mut self, t: &TsTypeParamDecl) -> NodeId {
        let params = t.params.iter().map(|p| self.type_param(p)).collect();
        self.make(NodeKind::TSTypeParameterDeclaration { params }, t.span, "TsTypeParamDecl")
    }

    fn type_param(&mut self, p: &TsTypeParam) -> NodeId {
        let name = self.ident(&p.name);
        let constraint = p.constraint.as_deref().map(|t| self.ts_type(t));
        let default = p.default.as_deref().map(|t| self.ts_type(t));
        self.make(
            NodeKind::TSTypeParameter {
                name,
                constraint,
                default,
                is_in: p.is_in,
                out: p.is_out,
                is_const: p.is_const,
            },
            p.span,
            "TsTypeParam",
        )
    }

    pub(super) fn type_args(&mut self, t: &TsTypeParamInstantiation) -> NodeId {
        let params = t.params.iter().map(|p| self.ts_type(p)).collect();
        self.make(
            NodeKind::TSTypeParameterInstantiation { params },
            t.span,
            "TsTypeParamInstantiation",
        )
    }

    /// `a`, `a.b.c`; qualified names take their range from their parts
    pub(super) fn entity_name(&mut self, name: &TsEntityName) -> NodeId {
        match name {
            TsEntityName::Ident(i) => self.ident(i),
            TsEntityName::TsQualifiedName(q) => {
                let left = self.entity_name(&q.left);
                let right = self.ident_name(&q.right);
                self.make_at(NodeKind::TSQualifiedName { left, right }, None, Some("TsQualifiedName"))
            }
        }
    }

    /// `extends` entries of interfaces and `implements` entries of classes
    pub(super) fn expr_with_type_args(&mut self, e: &TsExprWithTypeArgs, heritage: bool) -> NodeId {
        let expression = self.expr(&e.expr);
        let type_arguments = e.type_args.as_deref().map(|t| self.type_args(t));
        let kind = if heritage {
            NodeKind::TSInterfaceHeritage {
                expression,
                type_arguments,
            }
        } else {
            NodeKind::TSClassImplements {
                expression,
                type_arguments,
            }
        };
        self.make(kind, e.span, "TsExprWithTypeArgs")
    }

    fn fn_param(&mut self, p: &TsFnParam) -> NodeId {
        match p {
            TsFnParam::Ident(b) => self.binding_ident(b, Vec::new()),
            TsFnParam::Array(a) => self.array_pat(a, Vec::new()),
            TsFnParam::Rest(r) => self.rest_pat(r, Vec::new()),
            TsFnParam::Object(o) => self.object_pat(o, Vec::new()),
        }
    }

    fn fn_params(&mut self, params: &[TsFnParam]) -> Vec<NodeId> {
        params.iter().map(|p| self.fn_param(p)).collect()
    }

    pub(super) fn ts_type(&mut self, t: &TsType) -> NodeId {
        match t {
            TsType::TsKeywordType(k) => self.make(keyword_kind(k.kind), k.span, "TsKeywordType"),
            TsType::TsThisType(t) => self.make(NodeKind::TSThisType {}, t.span, "TsThisType"),
            TsType::TsFnOrConstructorType(f) => match f {
                TsFnOrConstructorType::TsFnType(f) => {
                    let type_parameters = f.type_params.as_deref().map(|t| self.type_param_decl(t));
                    let params = self.fn_params(&f.params);
                    let return_type = Some(self.type_ann(&f.type_ann));
                    self.make(
                        NodeKind::TSFunctionType {
                            type_parameters,
                            params,
                            return_type,
                        },
                        f.span,
                        "TsFnType",
                    )
                }
                TsFnOrConstructorType::TsConstructorType(c) => {
                    let type_parameters = c.type_params.as_deref().map(|t| self.type_param_decl(t));
                    let params = self.fn_params(&c.params);
                    let return_type = Some(self.type_ann(&c.type_ann));
                    self.make(
                        NodeKind::TSConstructorType {
                            type_parameters,
                            params,
                            return_type,
                            is_abstract: c.is_abstract,
                        },
                        c.span,
                        "TsConstructorType",
                    )
                }
            },
            TsType::TsTypeRef(r) => {
                let type_name = self.entity_name(&r.type_name);
                let type_arguments = r.type_params.as_deref().map(|t| self.type_args(t));
                self.make(
                    NodeKind::TSTypeReference {
                        type_name,
                        type_arguments,
                    },
                    r.span,
                    "TsTypeRef",
                )
            }
            TsType::TsTypeQuery(q) => {
                let expr_name = match &q.expr_name {
                    TsTypeQueryExpr::TsEntityName(name) => self.entity_name(name),
                    TsTypeQueryExpr::Import(i) => self.import_type(i),
                };
                let type_arguments = q.type_args.as_deref().map(|t| self.type_args(t));
                self.make(
                    NodeKind::TSTypeQuery {
                        expr_name,
                        type_arguments,
                    },
                    q.span,
                    "TsTypeQuery",
                )
            }
            TsType::TsTypeLit(l) => {
                let members = l.members.iter().map(|m| self.type_element(m)).collect();
                self.make(NodeKind::TSTypeLiteral { members }, l.span, "TsTypeLit")
            }
            TsType::TsArrayType(a) => {
                let element_type = self.ts_type(&a.elem_type);
                self.make(NodeKind::TSArrayType { element_type }, a.span, "TsArrayType")
            }
            TsType::TsTupleType(t) => {
                let element_types = t.elem_types.iter().map(|e| self.tuple_element(e)).collect();
                self.make(NodeKind::TSTupleType { element_types }, t.span, "TsTupleType")
            }
            TsType::TsOptionalType(o) => {
                let type_annotation = self.ts_type(&o.type_ann);
                self.make(NodeKind::TSOptionalType { type_annotation }, o.span, "TsOptionalType")
            }
            TsType::TsRestType(r) => {
                let type_annotation = self.ts_type(&r.type_ann);
                self.make(NodeKind::TSRestType { type_annotation }, r.span, "TsRestType")
            }
            TsType::TsUnionOrIntersectionType(u) => match u {
                TsUnionOrIntersectionType::TsUnionType(u) => {
                    let types = u.types.iter().map(|t| self.ts_type(t)).collect();
                    self.make(NodeKind::TSUnionType { types }, u.span, "TsUnionType")
                }
                TsUnionOrIntersectionType::TsIntersectionType(i) => {
                    let types = i.types.iter().map(|t| self.ts_type(t)).collect();
                    self.make(NodeKind::TSIntersectionType { types }, i.span, "TsIntersectionType")
                }
            },
            TsType::TsConditionalType(c) => {
                let check_type = self.ts_type(&c.check_type);
                let extends_type = self.ts_type(&c.extends_type);
                let true_type = self.ts_type(&c.true_type);
                let false_type = self.ts_type(&c.false_type);
                self.make(
                    NodeKind::TSConditionalType {
                        check_type,
                        extends_type,
                        true_type,
                        false_type,
                    },
                    c.span,
                    "TsConditionalType",
                )
            }
            TsType::TsInferType(i) => {
                let type_parameter = self.type_param(&i.type_param);
                self.make(NodeKind::TSInferType { type_parameter }, i.span, "TsInferType")
            }
            // No node for parentheses in type positions either
            TsType::TsParenthesizedType(p) => self.ts_type(&p.type_ann),
            TsType::TsTypeOperator(o) => {
                let operator = match o.op {
                    TsTypeOperatorOp::KeyOf => "keyof",
                    TsTypeOperatorOp::Unique => "unique",
                    TsTypeOperatorOp::ReadOnly => "readonly",
                };
                let type_annotation = self.ts_type(&o.type_ann);
                self.make(
                    NodeKind::TSTypeOperator {
                        operator,
                        type_annotation,
                    },
                    o.span,
                    "TsTypeOperator",
                )
            }
            TsType::TsIndexedAccessType(i) => {
                let object_type = self.ts_type(&i.obj_type);
                let index_type = self.ts_type(&i.index_type);
                self.make(
                    NodeKind::TSIndexedAccessType {
                        object_type,
                        index_type,
                    },
                    i.span,
                    "TsIndexedAccessType",
                )
            }
            TsType::TsMappedType(m) => {
                let key = self.ident(&m.type_param.name);
                let Some(constraint) = m.type_param.constraint.as_deref() else {
                    return self.unsupported("TsMappedType", m.span);
                };
                let constraint = self.ts_type(constraint);
                let name_type = m.name_type.as_deref().map(|t| self.ts_type(t));
                let type_annotation = m.type_ann.as_deref().map(|t| self.ts_type(t));
                self.make(
                    NodeKind::TSMappedType {
                        key,
                        constraint,
                        name_type,
                        type_annotation,
                        optional: mapped_modifier(m.optional),
                        readonly: mapped_modifier(m.readonly),
                    },
                    m.span,
                    "TsMappedType",
                )
            }
            TsType::TsLitType(l) => self.lit_type(l),
            TsType::TsTypePredicate(p) => {
                let parameter_name = match &p.param_name {
                    TsThisTypeOrIdent::TsThisType(t) => self.make(NodeKind::TSThisType {}, t.span, "TsThisType"),
                    TsThisTypeOrIdent::Ident(i) => self.ident(i),
                };
                let type_annotation = p.type_ann.as_deref().map(|t| self.type_ann(t));
                self.make(
                    NodeKind::TSTypePredicate {
                        parameter_name,
                        type_annotation,
                        asserts: p.asserts,
                    },
                    p.span,
                    "TsTypePredicate",
                )
            }
            TsType::TsImportType(i) => self.import_type(i),
        }
    }

    fn import_type(&mut self, i: &swc_ecma_ast::TsImportType) -> NodeId {
        let literal = self.str_lit(&i.arg);
        let argument = self.make_at(NodeKind::TSLiteralType { literal }, None, None);
        let qualifier = i.qualifier.as_ref().map(|q| self.entity_name(q));
        let type_arguments = i.type_args.as_deref().map(|t| self.type_args(t));
        self.make(
            NodeKind::TSImportType {
                argument,
                qualifier,
                type_arguments,
            },
            i.span,
            "TsImportType",
        )
    }

    fn tuple_element(&mut self, e: &TsTupleElement) -> NodeId {
        let Some(label) = &e.label else {
            return self.ts_type(&e.ty);
        };
        let label = match label {
            swc_ecma_ast::Pat::Ident(b) => {
                let range = self.span_range(b.id.span);
                self.identifier_at(b.id.sym.to_string(), range, Some("Ident"))
            }
            other => self.pat(other),
        };
        // `[name?: T]` carries the optionality on the member
        let (element_type, optional) = match &*e.ty {
            TsType::TsOptionalType(o) => (self.ts_type(&o.type_ann), true),
            other => (self.ts_type(other), false),
        };
        self.make(
            NodeKind::TSNamedTupleMember {
                label,
                element_type,
                optional,
            },
            e.span,
            "TsTupleElement",
        )
    }

    fn lit_type(&mut self, l: &TsLitType) -> NodeId {
        let literal = match &l.lit {
            TsLit::Number(n) => {
                let range = self.span_range(l.span);
                let text = range.map(|r| self.text(r)).unwrap_or("");
                if let (Some(r), Some(rest)) = (range, text.strip_prefix('-')) {
                    // Negative literal types are a unary minus over a positive literal
                    let digits = rest.trim_start();
                    let inner = Range::new(r.end - digits.len() as u32, r.end);
                    let argument = self.make_at(
                        NodeKind::Literal {
                            value: LiteralValue::Number(n.value.abs()),
                            raw: digits.to_string(),
                        },
                        Some(inner),
                        None,
                    );
                    self.make_at(
                        NodeKind::UnaryExpression {
                            operator: "-",
                            prefix: true,
                            argument,
                        },
                        range,
                        None,
                    )
                } else {
                    self.literal(LiteralValue::Number(n.value), n.span, "Number")
                }
            }
            TsLit::Str(s) => self.str_lit(s),
            TsLit::Bool(b) => self.literal(LiteralValue::Boolean(b.value), b.span, "Bool"),
            TsLit::BigInt(b) => self.bigint_lit(b),
            TsLit::Tpl(t) => {
                let quasis = self.tpl_elements(&t.quasis);
                let types = t.types.iter().map(|ty| self.ts_type(ty)).collect();
                return self.make(NodeKind::TSTemplateLiteralType { quasis, types }, l.span, "TsLitType");
            }
        };
        self.make(NodeKind::TSLiteralType { literal }, l.span, "TsLitType")
    }

    fn type_element(&mut self, m: &TsTypeElement) -> NodeId {
        match m {
            TsTypeElement::TsCallSignatureDecl(c) => {
                let type_parameters = c.type_params.as_deref().map(|t| self.type_param_decl(t));
                let params = self.fn_params(&c.params);
                let return_type = c.type_ann.as_deref().map(|t| self.type_ann(t));
                self.make(
                    NodeKind::TSCallSignatureDeclaration {
                        type_parameters,
                        params,
                        return_type,
                    },
                    c.span,
                    "TsCallSignatureDecl",
                )
            }
            TsTypeElement::TsConstructSignatureDecl(c) => {
                let type_parameters = c.type_params.as_deref().map(|t| self.type_param_decl(t));
                let params = self.fn_params(&c.params);
                let return_type = c.type_ann.as_deref().map(|t| self.type_ann(t));
                self.make(
                    NodeKind::TSConstructSignatureDeclaration {
                        type_parameters,
                        params,
                        return_type,
                    },
                    c.span,
                    "TsConstructSignatureDecl",
                )
            }
            TsTypeElement::TsPropertySignature(p) => {
                let key = self.expr(&p.key);
                let type_annotation = p.type_ann.as_deref().map(|t| self.type_ann(t));
                self.make(
                    NodeKind::TSPropertySignature {
                        key,
                        type_annotation,
                        computed: p.computed,
                        optional: p.optional,
                        readonly: p.readonly,
                    },
                    p.span,
                    "TsPropertySignature",
                )
            }
            TsTypeElement::TsGetterSignature(g) => {
                let key = self.expr(&g.key);
                let return_type = g.type_ann.as_deref().map(|t| self.type_ann(t));
                self.make(
                    NodeKind::TSMethodSignature {
                        key,
                        type_parameters: None,
                        params: Vec::new(),
                        return_type,
                        kind: MethodKind::Get,
                        computed: g.computed,
                        optional: false,
                    },
                    g.span,
                    "TsGetterSignature",
                )
            }
            TsTypeElement::TsSetterSignature(s) => {
                let key = self.expr(&s.key);
                let params = vec![self.fn_param(&s.param)];
                self.make(
                    NodeKind::TSMethodSignature {
                        key,
                        type_parameters: None,
                        params,
                        return_type: None,
                        kind: MethodKind::Set,
                        computed: s.computed,
                        optional: false,
                    },
                    s.span,
                    "TsSetterSignature",
                )
            }
            TsTypeElement::TsMethodSignature(m) => {
                let key = self.expr(&m.key);
                let type_parameters = m.type_params.as_deref().map(|t| self.type_param_decl(t));
                let params = self.fn_params(&m.params);
                let return_type = m.type_ann.as_deref().map(|t| self.type_ann(t));
                self.make(
                    NodeKind::TSMethodSignature {
                        key,
                        type_parameters,
                        params,
                        return_type,
                        kind: MethodKind::Method,
                        computed: m.computed,
                        optional: m.optional,
                    },
                    m.span,
                    "TsMethodSignature",
                )
            }
            TsTypeElement::TsIndexSignature(s) => self.index_signature(s),
        }
    }

    pub(super) fn index_signature(&mut self, s: &TsIndexSignature) -> NodeId {
        let parameters = self.fn_params(&s.params);
        let type_annotation = s.type_ann.as_deref().map(|t| self.type_ann(t));
        self.make(
            NodeKind::TSIndexSignature {
                parameters,
                type_annotation,
                readonly: s.readonly,
                is_static: s.is_static,
            },
            s.span,
            "TsIndexSignature",
        )
    }

    /// Declaration range extended over leading modifiers, innermost first
    fn declaration_range(&self, span: swc_common::Span, modifiers: &[(bool, &str)]) -> Option<Range> {
        self.span_range(span).map(|r| {
            modifiers
                .iter()
                .filter(|(present, _)| *present)
                .fold(r, |r, (_, word)| self.with_leading_word(r, word))
        })
    }

    pub(super) fn interface_decl(&mut self, i: &TsInterfaceDecl) -> NodeId {
        let id = self.ident(&i.id);
        let type_parameters = i.type_params.as_deref().map(|t| self.type_param_decl(t));
        let extends = i.extends.iter().map(|e| self.expr_with_type_args(e, true)).collect();
        let members = i.body.body.iter().map(|m| self.type_element(m)).collect();
        let body = self.make(NodeKind::TSInterfaceBody { body: members }, i.body.span, "TsInterfaceBody");
        let range = self.declaration_range(i.span, &[(i.declare, "declare")]);
        self.make_at(
            NodeKind::TSInterfaceDeclaration {
                id,
                type_parameters,
                extends,
                body,
                declare: i.declare,
            },
            range,
            Some("TsInterfaceDecl"),
        )
    }

    pub(super) fn type_alias_decl(&mut self, a: &TsTypeAliasDecl) -> NodeId {
        let id = self.ident(&a.id);
        let type_parameters = a.type_params.as_deref().map(|t| self.type_param_decl(t));
        let type_annotation = self.ts_type(&a.type_ann);
        let range = self
            .declaration_range(a.span, &[(a.declare, "declare")])
            .map(|r| self.with_semicolon(r));
        self.make_at(
            NodeKind::TSTypeAliasDeclaration {
                id,
                type_parameters,
                type_annotation,
                declare: a.declare,
            },
            range,
            Some("TsTypeAliasDecl"),
        )
    }

    pub(super) fn enum_decl(&mut self, e: &TsEnumDecl) -> NodeId {
        let id = self.ident(&e.id);
        let members = e
            .members
            .iter()
            .map(|m| {
                let member_id = match &m.id {
                    TsEnumMemberId::Ident(i) => self.ident(i),
                    TsEnumMemberId::Str(s) => self.str_lit(s),
                };
                let initializer = m.init.as_deref().map(|x| self.expr(x));
                self.make(
                    NodeKind::TSEnumMember {
                        id: member_id,
                        initializer,
                        computed: false,
                    },
                    m.span,
                    "TsEnumMember",
                )
            })
            .collect();
        let range = self.declaration_range(e.span, &[(e.is_const, "const"), (e.declare, "declare")]);
        let id_end = self.range_of(id).end;
        let end = range.map_or(id_end, |r| r.end);
        let body_start = self
            .first_token_in(Range::new(id_end, end), |t| t.is_punctuator("{"))
            .map_or(id_end, |t| t.range.start);
        let body = self.make_at(NodeKind::TSEnumBody { members }, Some(Range::new(body_start, end)), None);
        self.make_at(
            NodeKind::TSEnumDeclaration {
                id,
                body,
                is_const: e.is_const,
                declare: e.declare,
            },
            range,
            Some("TsEnumDecl"),
        )
    }

    /// `namespace A.B.C {}` becomes one declaration with a qualified name
    pub(super) fn ts_module_decl(&mut self, m: &TsModuleDecl) -> NodeId {
        let mut id = match &m.id {
            TsModuleName::Ident(i) => self.ident(i),
            TsModuleName::Str(s) => self.str_lit(s),
        };
        let kind = if m.global {
            ModuleKind::Global
        } else {
            match &m.id {
                TsModuleName::Str(_) => ModuleKind::Module,
                TsModuleName::Ident(_) => {
                    let start = self.range_of(id).start;
                    match self.token_before(start) {
                        Some(t) if t.is_word("module") => ModuleKind::Module,
                        _ => ModuleKind::Namespace,
                    }
                }
            }
        };

        let mut body = m.body.as_ref();
        while let Some(TsNamespaceBody::TsNamespaceDecl(inner)) = body {
            let right = self.ident(&inner.id);
            id = self.make_at(NodeKind::TSQualifiedName { left: id, right }, None, None);
            body = Some(&*inner.body);
        }
        let body = match body {
            Some(TsNamespaceBody::TsModuleBlock(block)) => {
                let items = self.module_items(&block.body);
                Some(self.make(NodeKind::TSModuleBlock { body: items }, block.span, "TsModuleBlock"))
            }
            _ => None,
        };

        let range = self
            .declaration_range(m.span, &[(m.declare, "declare")])
            .map(|r| if body.is_none() { self.with_semicolon(r) } else { r });
        self.make_at(
            NodeKind::TSModuleDeclaration {
                id,
                body,
                kind,
                declare: m.declare,
                global: m.global,
            },
            range,
            Some("TsModuleDecl"),
        )
    }
}
