//! Import and export declaration conversion

use super::Converter;
use crate::ast::{ImportExportKind, NodeId, NodeKind};
use crate::position::Range;
use swc_common::Span;
use swc_ecma_ast::{
    Decl, DefaultDecl, ExportSpecifier, ImportDecl, ImportSpecifier, ModuleDecl, ModuleExportName,
    NamedExport, ObjectLit, Prop, PropOrSpread, TsImportEqualsDecl, TsModuleRef,
};

fn import_export_kind(type_only: bool) -> ImportExportKind {
    if type_only {
        ImportExportKind::Type
    } else {
        ImportExportKind::Value
    }
}

impl Converter<'_> {
    pub(super) fn module_decl(&mut self, decl: &ModuleDecl) -> NodeId {
        match decl {
            ModuleDecl::Import(i) => self.import_decl(i),
            ModuleDecl::ExportDecl(e) => {
                let export_kind = match &e.decl {
                    Decl::TsInterface(_) | Decl::TsTypeAlias(_) => ImportExportKind::Type,
                    _ => ImportExportKind::Value,
                };
                let declaration = Some(self.decl(&e.decl));
                self.make(
                    NodeKind::ExportNamedDeclaration {
                        declaration,
                        specifiers: Vec::new(),
                        source: None,
                        attributes: Vec::new(),
                        export_kind,
                    },
                    e.span,
                    "ExportDecl",
                )
            }
            ModuleDecl::ExportNamed(n) => self.named_export(n),
            ModuleDecl::ExportDefaultDecl(d) => {
                let (declaration, export_kind) = match &d.decl {
                    DefaultDecl::Class(c) => (
                        self.class_node(&c.class, c.ident.as_ref(), true, false),
                        ImportExportKind::Value,
                    ),
                    DefaultDecl::Fn(f) => {
                        let id = f.ident.as_ref().map(|i| self.ident(i));
                        let parts = self.function_parts(&f.function);
                        let kind = match parts.body {
                            Some(body) => NodeKind::FunctionDeclaration {
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
                            None => NodeKind::TSDeclareFunction {
                                id,
                                type_parameters: parts.type_parameters,
                                params: parts.params,
                                return_type: parts.return_type,
                                generator: f.function.is_generator,
                                is_async: f.function.is_async,
                                expression: false,
                                declare: false,
                            },
                        };
                        (self.make(kind, f.function.span, "FnExpr"), ImportExportKind::Value)
                    }
                    DefaultDecl::TsInterfaceDecl(i) => (self.interface_decl(i), ImportExportKind::Type),
                };
                self.make(
                    NodeKind::ExportDefaultDeclaration {
                        declaration,
                        export_kind,
                    },
                    d.span,
                    "ExportDefaultDecl",
                )
            }
            ModuleDecl::ExportDefaultExpr(e) => {
                let declaration = self.expr(&e.expr);
                let range = self.span_range(e.span).map(|r| self.with_semicolon(r));
                self.make_at(
                    NodeKind::ExportDefaultDeclaration {
                        declaration,
                        export_kind: ImportExportKind::Value,
                    },
                    range,
                    Some("ExportDefaultExpr"),
                )
            }
            ModuleDecl::ExportAll(a) => {
                let source = self.str_lit(&a.src);
                let attributes = self.import_attributes(a.with.as_deref());
                self.statement_node(
                    NodeKind::ExportAllDeclaration {
                        exported: None,
                        source,
                        attributes,
                        export_kind: import_export_kind(a.type_only),
                    },
                    a.span,
                    "ExportAll",
                )
            }
            ModuleDecl::TsImportEquals(i) => self.import_equals(i),
            ModuleDecl::TsExportAssignment(a) => {
                let expression = self.expr(&a.expr);
                self.statement_node(NodeKind::TSExportAssignment { expression }, a.span, "TsExportAssignment")
            }
            ModuleDecl::TsNamespaceExport(n) => {
                let id = self.ident(&n.id);
                self.statement_node(
                    NodeKind::TSNamespaceExportDeclaration { id },
                    n.span,
                    "TsNamespaceExportDecl",
                )
            }
        }
    }

    /// Push a statement-level node whose range owns a trailing `;`
    fn statement_node(&mut self, kind: NodeKind, span: Span, upstream: &'static str) -> NodeId {
        let range = self.span_range(span).map(|r| self.with_semicolon(r));
        self.make_at(kind, range, Some(upstream))
    }

    fn module_export_name(&mut self, name: &ModuleExportName) -> NodeId {
        match name {
            ModuleExportName::Ident(i) => self.ident(i),
            ModuleExportName::Str(s) => self.str_lit(s),
        }
    }

    /// `with { type: "json" }` clauses
    fn import_attributes(&mut self, with: Option<&ObjectLit>) -> Vec<NodeId> {
        let Some(with) = with else {
            return Vec::new();
        };
        with.props
            .iter()
            .filter_map(|p| match p {
                PropOrSpread::Prop(prop) => match &**prop {
                    Prop::KeyValue(kv) => Some(kv),
                    _ => None,
                },
                PropOrSpread::Spread(_) => None,
            })
            .map(|kv| {
                let (key, _) = self.prop_name(&kv.key);
                let value = self.expr(&kv.value);
                self.make_at(NodeKind::ImportAttribute { key, value }, None, Some("KeyValueProp"))
            })
            .collect()
    }

    fn import_decl(&mut self, i: &ImportDecl) -> NodeId {
        let specifiers = i
            .specifiers
            .iter()
            .map(|s| match s {
                ImportSpecifier::Named(n) => {
                    let imported = match &n.imported {
                        Some(name) => self.module_export_name(name),
                        None => self.ident(&n.local),
                    };
                    let local = self.ident(&n.local);
                    self.make(
                        NodeKind::ImportSpecifier {
                            imported,
                            local,
                            import_kind: import_export_kind(n.is_type_only),
                        },
                        n.span,
                        "ImportNamedSpecifier",
                    )
                }
                ImportSpecifier::Default(d) => {
                    let local = self.ident(&d.local);
                    self.make(NodeKind::ImportDefaultSpecifier { local }, d.span, "ImportDefaultSpecifier")
                }
                ImportSpecifier::Namespace(n) => {
                    let local = self.ident(&n.local);
                    self.make(NodeKind::ImportNamespaceSpecifier { local }, n.span, "ImportStarAsSpecifier")
                }
            })
            .collect();
        let source = self.str_lit(&i.src);
        let attributes = self.import_attributes(i.with.as_deref());
        self.statement_node(
            NodeKind::ImportDeclaration {
                specifiers,
                source,
                attributes,
                import_kind: import_export_kind(i.type_only),
            },
            i.span,
            "ImportDecl",
        )
    }

    fn named_export(&mut self, n: &NamedExport) -> NodeId {
        // `export * as ns from "mod"` is a re-export of the whole namespace
        if let [ExportSpecifier::Namespace(ns)] = n.specifiers.as_slice() {
            let exported = Some(self.module_export_name(&ns.name));
            let Some(src) = n.src.as_deref() else {
                return self.unsupported("ExportNamespaceSpecifier", ns.span);
            };
            let source = self.str_lit(src);
            let attributes = self.import_attributes(n.with.as_deref());
            return self.statement_node(
                NodeKind::ExportAllDeclaration {
                    exported,
                    source,
                    attributes,
                    export_kind: import_export_kind(n.type_only),
                },
                n.span,
                "NamedExport",
            );
        }

        let specifiers = n
            .specifiers
            .iter()
            .map(|s| match s {
                ExportSpecifier::Named(named) => {
                    let local = self.module_export_name(&named.orig);
                    let exported = match &named.exported {
                        Some(name) => self.module_export_name(name),
                        None => self.module_export_name(&named.orig),
                    };
                    self.make(
                        NodeKind::ExportSpecifier {
                            local,
                            exported,
                            export_kind: import_export_kind(named.is_type_only),
                        },
                        named.span,
                        "ExportNamedSpecifier",
                    )
                }
                ExportSpecifier::Namespace(ns) => self.unsupported("ExportNamespaceSpecifier", ns.span),
                ExportSpecifier::Default(d) => self.unsupported("ExportDefaultSpecifier", d.exported.span),
            })
            .collect();
        let source = n.src.as_deref().map(|s| self.str_lit(s));
        let attributes = self.import_attributes(n.with.as_deref());
        self.statement_node(
            NodeKind::ExportNamedDeclaration {
                declaration: None,
                specifiers,
                source,
                attributes,
                export_kind: import_export_kind(n.type_only),
            },
            n.span,
            "NamedExport",
        )
    }

    /// `import a = require("mod")` and `import a = b.c`, optionally exported
    fn import_equals(&mut self, i: &TsImportEqualsDecl) -> NodeId {
        let id = self.ident(&i.id);
        let module_reference = match &i.module_ref {
            TsModuleRef::TsEntityName(name) => self.entity_name(name),
            TsModuleRef::TsExternalModuleRef(r) => {
                let expression = self.str_lit(&r.expr);
                self.make(NodeKind::TSExternalModuleReference { expression }, r.span, "TsExternalModuleRef")
            }
        };
        let outer = self.span_range(i.span).map(|r| self.with_semicolon(r));
        let kind = NodeKind::TSImportEqualsDeclaration {
            id,
            module_reference,
            import_kind: import_export_kind(i.is_type_only),
        };
        if !i.is_export {
            return self.make_at(kind, outer, Some("TsImportEqualsDecl"));
        }
        let inner = outer.map(|r| {
            let start = self
                .first_token_in(r, |t| t.is_word("import"))
                .map_or(r.start, |t| t.range.start);
            Range::new(start, r.end)
        });
        let declaration = Some(self.make_at(kind, inner, Some("TsImportEqualsDecl")));
        self.make_at(
            NodeKind::ExportNamedDeclaration {
                declaration,
                specifiers: Vec::new(),
                source: None,
                attributes: Vec::new(),
                export_kind: ImportExportKind::Value,
            },
            outer,
            None,
        )
    }
}
