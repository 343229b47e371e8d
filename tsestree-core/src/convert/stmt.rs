//! Program, statement and declaration conversion

use super::Converter;
use crate::ast::{NodeId, NodeKind, SourceType, VariableKind};
use crate::position::Range;
use swc_ecma_ast::{
    BlockStmt, Decl, Expr, FnDecl, ForHead, Lit, ModuleItem, Program, Stmt, UsingDecl, VarDecl,
    VarDeclKind, VarDeclOrExpr, VarDeclarator,
};

impl Converter<'_> {
    pub(super) fn program(&mut self, program: &Program) -> NodeId {
        let (body, source_type) = match program {
            Program::Module(m) => (self.module_items(&m.body), SourceType::Module),
            Program::Script(s) => (self.statements(&s.body, true), SourceType::Script),
        };
        // Leading comments and whitespace are outside the program node
        let end = self.index.len();
        let start = self.tokens.first().map_or(end, |t| t.range.start);
        self.make_at(
            NodeKind::Program { body, source_type },
            Some(Range::new(start, end)),
            Some("Program"),
        )
    }

    pub(super) fn module_items(&mut self, items: &[ModuleItem]) -> Vec<NodeId> {
        let mut prologue = true;
        items
            .iter()
            .map(|item| match item {
                ModuleItem::ModuleDecl(decl) => {
                    prologue = false;
                    self.module_decl(decl)
                }
                ModuleItem::Stmt(stmt) => self.prologue_stmt(stmt, &mut prologue),
            })
            .collect()
    }

    /// Convert a statement list, marking leading string statements as directives
    pub(super) fn statements(&mut self, stmts: &[Stmt], directives: bool) -> Vec<NodeId> {
        let mut prologue = directives;
        stmts
            .iter()
            .map(|stmt| self.prologue_stmt(stmt, &mut prologue))
            .collect()
    }

    fn prologue_stmt(&mut self, stmt: &Stmt, prologue: &mut bool) -> NodeId {
        if *prologue {
            if let Stmt::Expr(e) = stmt {
                if let Expr::Lit(Lit::Str(s)) = &*e.expr {
                    let raw = self.span_range(s.span).map(|r| self.text(r)).unwrap_or("");
                    let directive = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("").to_string();
                    let expression = self.expr(&e.expr);
                    return self.make(
                        NodeKind::ExpressionStatement {
                            expression,
                            directive: Some(directive),
                        },
                        e.span,
                        "ExprStmt",
                    );
                }
            }
            *prologue = false;
        }
        self.stmt(stmt)
    }

    pub(super) fn block(&mut self, block: &BlockStmt) -> NodeId {
        let body = self.statements(&block.stmts, false);
        self.make(NodeKind::BlockStatement { body }, block.span, "BlockStmt")
    }

    /// Function bodies may open with directives
    pub(super) fn function_body(&mut self, block: &BlockStmt) -> NodeId {
        let body = self.statements(&block.stmts, true);
        self.make(NodeKind::BlockStatement { body }, block.span, "BlockStmt")
    }

    pub(super) fn stmt(&mut self, stmt: &Stmt) -> NodeId {
        match stmt {
            Stmt::Block(b) => self.block(b),
            Stmt::Empty(e) => self.make(NodeKind::EmptyStatement {}, e.span, "EmptyStmt"),
            Stmt::Debugger(d) => self.make(NodeKind::DebuggerStatement {}, d.span, "DebuggerStmt"),
            Stmt::With(w) => {
                let object = self.expr(&w.obj);
                let body = self.stmt(&w.body);
                self.make(NodeKind::WithStatement { object, body }, w.span, "WithStmt")
            }
            Stmt::Return(r) => {
                let argument = r.arg.as_deref().map(|e| self.expr(e));
                self.make(NodeKind::ReturnStatement { argument }, r.span, "ReturnStmt")
            }
            Stmt::Labeled(l) => {
                let label = self.ident(&l.label);
                let body = self.stmt(&l.body);
                self.make(NodeKind::LabeledStatement { label, body }, l.span, "LabeledStmt")
            }
            Stmt::Break(b) => {
                let label = b.label.as_ref().map(|l| self.ident(l));
                self.make(NodeKind::BreakStatement { label }, b.span, "BreakStmt")
            }
            Stmt::Continue(c) => {
                let label = c.label.as_ref().map(|l| self.ident(l));
                self.make(NodeKind::ContinueStatement { label }, c.span, "ContinueStmt")
            }
            Stmt::If(i) => {
                let test = self.expr(&i.test);
                let consequent = self.stmt(&i.cons);
                let alternate = i.alt.as_deref().map(|s| self.stmt(s));
                self.make(
                    NodeKind::IfStatement {
                        test,
                        consequent,
                        alternate,
                    },
                    i.span,
                    "IfStmt",
                )
            }
            Stmt::Switch(s) => {
                let discriminant = self.expr(&s.discriminant);
                let cases = s
                    .cases
                    .iter()
                    .map(|case| {
                        let test = case.test.as_deref().map(|e| self.expr(e));
                        let consequent = self.statements(&case.cons, false);
                        self.make(NodeKind::SwitchCase { test, consequent }, case.span, "SwitchCase")
                    })
                    .collect();
                self.make(
                    NodeKind::SwitchStatement {
                        discriminant,
                        cases,
                    },
                    s.span,
                    "SwitchStmt",
                )
            }
            Stmt::Throw(t) => {
                let argument = self.expr(&t.arg);
                self.make(NodeKind::ThrowStatement { argument }, t.span, "ThrowStmt")
            }
            Stmt::Try(t) => {
                let block = self.block(&t.block);
                let handler = t.handler.as_ref().map(|h| {
                    let param = h.param.as_ref().map(|p| self.pat(p));
                    let body = self.block(&h.body);
                    self.make(NodeKind::CatchClause { param, body }, h.span, "CatchClause")
                });
                let finalizer = t.finalizer.as_ref().map(|f| self.block(f));
                self.make(
                    NodeKind::TryStatement {
                        block,
                        handler,
                        finalizer,
                    },
                    t.span,
                    "TryStmt",
                )
            }
            Stmt::While(w) => {
                let test = self.expr(&w.test);
                let body = self.stmt(&w.body);
                self.make(NodeKind::WhileStatement { test, body }, w.span, "WhileStmt")
            }
            Stmt::DoWhile(d) => {
                let body = self.stmt(&d.body);
                let test = self.expr(&d.test);
                self.make(NodeKind::DoWhileStatement { body, test }, d.span, "DoWhileStmt")
            }
            Stmt::For(f) => {
                let init = f.init.as_ref().map(|init| match init {
                    VarDeclOrExpr::VarDecl(v) => self.var_decl(v, false),
                    VarDeclOrExpr::Expr(e) => self.expr(e),
                });
                let test = f.test.as_deref().map(|e| self.expr(e));
                let update = f.update.as_deref().map(|e| self.expr(e));
                let body = self.stmt(&f.body);
                self.make(
                    NodeKind::ForStatement {
                        init,
                        test,
                        update,
                        body,
                    },
                    f.span,
                    "ForStmt",
                )
            }
            Stmt::ForIn(f) => {
                let left = self.for_head(&f.left);
                let right = self.expr(&f.right);
                let body = self.stmt(&f.body);
                self.make(NodeKind::ForInStatement { left, right, body }, f.span, "ForInStmt")
            }
            Stmt::ForOf(f) => {
                let left = self.for_head(&f.left);
                let right = self.expr(&f.right);
                let body = self.stmt(&f.body);
                self.make(
                    NodeKind::ForOfStatement {
                        left,
                        right,
                        body,
                        is_await: f.is_await,
                    },
                    f.span,
                    "ForOfStmt",
                )
            }
            Stmt::Decl(d) => self.decl(d),
            Stmt::Expr(e) => {
                let expression = self.expr(&e.expr);
                self.make(
                    NodeKind::ExpressionStatement {
                        expression,
                        directive: None,
                    },
                    e.span,
                    "ExprStmt",
                )
            }
        }
    }

    fn for_head(&mut self, head: &ForHead) -> NodeId {
        match head {
            ForHead::VarDecl(v) => self.var_decl(v, false),
            ForHead::UsingDecl(u) => self.using_decl(u, false),
            ForHead::Pat(p) => self.pat(p),
        }
    }

    pub(super) fn decl(&mut self, decl: &Decl) -> NodeId {
        match decl {
            Decl::Class(c) => self.class_decl(c),
            Decl::Fn(f) => self.fn_decl(f),
            Decl::Var(v) => self.var_decl(v, true),
            Decl::Using(u) => self.using_decl(u, true),
            Decl::TsInterface(i) => self.interface_decl(i),
            Decl::TsTypeAlias(a) => self.type_alias_decl(a),
            Decl::TsEnum(e) => self.enum_decl(e),
            Decl::TsModule(m) => self.ts_module_decl(m),
        }
    }

    fn declarators(&mut self, decls: &[VarDeclarator]) -> Vec<NodeId> {
        decls
            .iter()
            .map(|d| {
                let id = self.pat(&d.name);
                let init = d.init.as_deref().map(|e| self.expr(e));
                self.make(
                    NodeKind::VariableDeclarator {
                        id,
                        init,
                        definite: d.definite,
                    },
                    d.span,
                    "VarDeclarator",
                )
            })
            .collect()
    }

    /// `statement` is false for loop heads, which never own the `;`
    pub(super) fn var_decl(&mut self, v: &VarDecl, statement: bool) -> NodeId {
        let kind = match v.kind {
            VarDeclKind::Var => VariableKind::Var,
            VarDeclKind::Let => VariableKind::Let,
            VarDeclKind::Const => VariableKind::Const,
        };
        let declarations = self.declarators(&v.decls);
        let mut range = self.span_range(v.span);
        if let Some(r) = range {
            let r = if statement { self.with_semicolon(r) } else { r };
            range = Some(if v.declare {
                self.with_leading_word(r, "declare")
            } else {
                r
            });
        }
        self.make_at(
            NodeKind::VariableDeclaration {
                declarations,
                kind,
                declare: v.declare,
            },
            range,
            Some("VarDecl"),
        )
    }

    fn using_decl(&mut self, u: &UsingDecl, statement: bool) -> NodeId {
        let kind = if u.is_await {
            VariableKind::AwaitUsing
        } else {
            VariableKind::Using
        };
        let declarations = self.declarators(&u.decls);
        let range = self
            .span_range(u.span)
            .map(|r| if statement { self.with_semicolon(r) } else { r });
        self.make_at(
            NodeKind::VariableDeclaration {
                declarations,
                kind,
                declare: false,
            },
            range,
            Some("UsingDecl"),
        )
    }

    fn fn_decl(&mut self, f: &FnDecl) -> NodeId {
        let id = Some(self.ident(&f.ident));
        let parts = self.function_parts(&f.function);
        let range = self.span_range(f.function.span).map(|r| {
            if f.declare {
                self.with_leading_word(r, "declare")
            } else {
                r
            }
        });
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
                declare: f.declare,
            },
            None => NodeKind::TSDeclareFunction {
                id,
                type_parameters: parts.type_parameters,
                params: parts.params,
                return_type: parts.return_type,
                generator: f.function.is_generator,
                is_async: f.function.is_async,
                expression: false,
                declare: f.declare,
            },
        };
        self.make_at(kind, range, Some("FnDecl"))
    }
}
