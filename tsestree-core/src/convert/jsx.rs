//! Markup (JSX) conversion

use super::Converter;
use crate::ast::{LiteralValue, NodeId, NodeKind};
use crate::position::Range;
use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    JSXAttrName, JSXAttrOrSpread, JSXAttrValue, JSXClosingElement, JSXElement, JSXElementChild,
    JSXElementName, JSXExpr, JSXExprContainer, JSXFragment, JSXMemberExpr, JSXNamespacedName,
    JSXObject, JSXOpeningElement, JSXText,
};

impl Converter<'_> {
    fn jsx_identifier(&mut self, name: String, span: Span) -> NodeId {
        self.make(NodeKind::JSXIdentifier { name }, span, "JSXIdentifier")
    }

    pub(super) fn jsx_member(&mut self, m: &JSXMemberExpr) -> NodeId {
        let object = match &m.obj {
            JSXObject::Ident(i) => self.jsx_identifier(i.sym.to_string(), i.span),
            JSXObject::JSXMemberExpr(inner) => self.jsx_member(inner),
        };
        let property = self.jsx_identifier(m.prop.sym.to_string(), m.prop.span);
        self.make(NodeKind::JSXMemberExpression { object, property }, m.span, "JSXMemberExpr")
    }

    pub(super) fn jsx_namespaced_name(&mut self, n: &JSXNamespacedName) -> NodeId {
        let namespace = self.jsx_identifier(n.ns.sym.to_string(), n.ns.span);
        let name = self.jsx_identifier(n.name.sym.to_string(), n.name.span);
        self.make(NodeKind::JSXNamespacedName { namespace, name }, n.span, "JSXNamespacedName")
    }

    fn jsx_element_name(&mut self, name: &JSXElementName) -> NodeId {
        match name {
            JSXElementName::Ident(i) => self.jsx_identifier(i.sym.to_string(), i.span),
            JSXElementName::JSXMemberExpr(m) => self.jsx_member(m),
            JSXElementName::JSXNamespacedName(n) => self.jsx_namespaced_name(n),
        }
    }

    pub(super) fn jsx_element(&mut self, el: &JSXElement) -> NodeId {
        let opening_element = self.jsx_opening(&el.opening);
        let children = self.jsx_children(&el.children);
        let closing_element = el.closing.as_ref().map(|c| self.jsx_closing(c));
        self.make(
            NodeKind::JSXElement {
                opening_element,
                children,
                closing_element,
            },
            el.span,
            "JSXElement",
        )
    }

    fn jsx_opening(&mut self, o: &JSXOpeningElement) -> NodeId {
        let name = self.jsx_element_name(&o.name);
        let type_arguments = o.type_args.as_deref().map(|t| self.type_args(t));
        let attributes = o
            .attrs
            .iter()
            .map(|a| match a {
                JSXAttrOrSpread::JSXAttr(attr) => {
                    let name = match &attr.name {
                        JSXAttrName::Ident(i) => self.jsx_identifier(i.sym.to_string(), i.span),
                        JSXAttrName::JSXNamespacedName(n) => self.jsx_namespaced_name(n),
                    };
                    let value = attr.value.as_ref().map(|v| self.jsx_attr_value(v));
                    self.make(NodeKind::JSXAttribute { name, value }, attr.span, "JSXAttr")
                }
                JSXAttrOrSpread::SpreadElement(s) => {
                    let argument = self.expr(&s.expr);
                    // The spread range runs brace to brace
                    let range = self.span_range(s.dot3_token).map(|r| {
                        let open = self.token_before(r.start).filter(|t| t.is_punctuator("{"));
                        let close = self.token_after(self.range_of(argument).end).filter(|t| t.is_punctuator("}"));
                        Range::new(
                            open.map_or(r.start, |t| t.range.start),
                            close.map_or(r.end, |t| t.range.end),
                        )
                    });
                    self.make_at(NodeKind::JSXSpreadAttribute { argument }, range, Some("SpreadElement"))
                }
            })
            .collect();
        self.make(
            NodeKind::JSXOpeningElement {
                name,
                type_arguments,
                attributes,
                self_closing: o.self_closing,
            },
            o.span,
            "JSXOpeningElement",
        )
    }

    fn jsx_attr_value(&mut self, value: &JSXAttrValue) -> NodeId {
        match value {
            JSXAttrValue::JSXExprContainer(c) => self.jsx_expr_container(c),
            JSXAttrValue::JSXElement(el) => self.jsx_element(el),
            JSXAttrValue::JSXFragment(f) => self.jsx_fragment(f),
            // Quoted attribute strings keep their text verbatim
            other => {
                let span = other.span();
                let raw = self.span_range(span).map(|r| self.text(r)).unwrap_or("");
                let inner = raw.get(1..raw.len().saturating_sub(1)).unwrap_or("").to_string();
                self.literal(LiteralValue::String(inner), span, "Str")
            }
        }
    }

    fn jsx_closing(&mut self, c: &JSXClosingElement) -> NodeId {
        let name = self.jsx_element_name(&c.name);
        self.make(NodeKind::JSXClosingElement { name }, c.span, "JSXClosingElement")
    }

    fn jsx_expr_container(&mut self, c: &JSXExprContainer) -> NodeId {
        let expression = match &c.expr {
            JSXExpr::JSXEmptyExpr(e) => self.make(NodeKind::JSXEmptyExpression {}, e.span, "JSXEmptyExpr"),
            JSXExpr::Expr(e) => self.expr(e),
        };
        self.make(NodeKind::JSXExpressionContainer { expression }, c.span, "JSXExprContainer")
    }

    fn jsx_children(&mut self, children: &[JSXElementChild]) -> Vec<NodeId> {
        children
            .iter()
            .map(|child| match child {
                JSXElementChild::JSXText(t) => self.jsx_text(t),
                JSXElementChild::JSXExprContainer(c) => self.jsx_expr_container(c),
                JSXElementChild::JSXSpreadChild(s) => {
                    let expression = self.expr(&s.expr);
                    self.make(NodeKind::JSXSpreadChild { expression }, s.span, "JSXSpreadChild")
                }
                JSXElementChild::JSXElement(el) => self.jsx_element(el),
                JSXElementChild::JSXFragment(f) => self.jsx_fragment(f),
            })
            .collect()
    }

    pub(super) fn jsx_fragment(&mut self, f: &JSXFragment) -> NodeId {
        let opening_fragment = self.make(NodeKind::JSXOpeningFragment {}, f.opening.span, "JSXOpeningFragment");
        let children = self.jsx_children(&f.children);
        let closing_fragment = self.make(NodeKind::JSXClosingFragment {}, f.closing.span, "JSXClosingFragment");
        self.make(
            NodeKind::JSXFragment {
                opening_fragment,
                children,
                closing_fragment,
            },
            f.span,
            "JSXFragment",
        )
    }

    pub(super) fn jsx_text(&mut self, t: &JSXText) -> NodeId {
        self.make(
            NodeKind::JSXText {
                value: t.value.to_string(),
                raw: t.raw.to_string(),
            },
            t.span,
            "JSXText",
        )
    }
}
