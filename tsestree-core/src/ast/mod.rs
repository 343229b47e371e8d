//! Standardized tree
//!
//! Nodes live in one arena per file and refer to each other by `NodeId`.
//! Children are owned through their parent's payload fields; the `parent`
//! back-reference is a plain index set exactly once, when the parent is
//! pushed. Nodes are pushed children-first, so a parent's id is always
//! greater than the ids of its children.

mod json;
mod kinds;

pub use json::{node_to_json, to_estree_json};
pub use kinds::{
    Accessibility, ChildSlot, ImportExportKind, LiteralValue, MappedModifier, MethodKind,
    ModuleKind, NodeKind, NodeType, PropertyKind, RegExpValue, SourceType, TemplateValue,
    VariableKind,
};

use crate::position::{Range, SourceLocation};
use serde::Serialize;

/// Index of a node inside its `Ast`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One standardized node: payload plus position data and parent link
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub range: Range,
    pub loc: SourceLocation,
    pub parent: Option<NodeId>,
}

impl Node {
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }
}

/// The standardized tree for one file
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.nodes[id.index()].kind.node_type()
    }

    pub fn range(&self, id: NodeId) -> Range {
        self.nodes[id.index()].range
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Source type of the program root
    pub fn source_type(&self) -> SourceType {
        match self.kind(self.root) {
            NodeKind::Program { source_type, .. } => *source_type,
            _ => SourceType::Script,
        }
    }

    /// Direct children in visitor-key order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.kind(id).for_each_child(&mut |_, child| out.push(child));
        out
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// All nodes in arena order (children before parents)
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Pre-order walk from the root, children in visitor-key order
    pub fn walk(&self, mut f: impl FnMut(NodeId, &Node)) {
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            f(id, self.node(id));
            let children = self.children(id);
            stack.extend(children.into_iter().rev());
        }
    }

    /// Name of an `Identifier`, `JSXIdentifier` or `PrivateIdentifier`
    pub fn identifier_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Identifier { name, .. }
            | NodeKind::JSXIdentifier { name }
            | NodeKind::PrivateIdentifier { name } => Some(name),
            _ => None,
        }
    }
}

/// Append-only arena used by the converter
#[derive(Debug, Default)]
pub(crate) struct AstBuilder {
    nodes: Vec<Node>,
}

impl AstBuilder {
    /// Push a node and adopt its children
    pub(crate) fn push(&mut self, kind: NodeKind, range: Range, loc: SourceLocation) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut children = Vec::new();
        kind.for_each_child(&mut |_, child| children.push(child));
        for child in children {
            let slot = &mut self.nodes[child.index()].parent;
            debug_assert!(slot.is_none(), "node {:?} adopted twice", child);
            *slot = Some(id);
        }
        self.nodes.push(Node {
            kind,
            range,
            loc,
            parent: None,
        });
        id
    }

    pub(crate) fn range(&self, id: NodeId) -> Range {
        self.nodes[id.index()].range
    }

    pub(crate) fn finish(self, root: NodeId) -> Ast {
        Ast {
            nodes: self.nodes,
            root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Position;

    fn loc() -> SourceLocation {
        let p = Position { line: 1, column: 0 };
        SourceLocation { start: p, end: p }
    }

    fn small_tree() -> Ast {
        let mut builder = AstBuilder::default();
        let name = builder.push(
            NodeKind::Identifier {
                name: "x".to_string(),
                optional: false,
                type_annotation: None,
                decorators: Vec::new(),
            },
            Range::new(0, 1),
            loc(),
        );
        let stmt = builder.push(
            NodeKind::ExpressionStatement {
                expression: name,
                directive: None,
            },
            Range::new(0, 2),
            loc(),
        );
        let program = builder.push(
            NodeKind::Program {
                body: vec![stmt],
                source_type: SourceType::Script,
            },
            Range::new(0, 2),
            loc(),
        );
        builder.finish(program)
    }

    #[test]
    fn test_parents_are_assigned_on_push() {
        let ast = small_tree();
        assert_eq!(ast.parent(NodeId(0)), Some(NodeId(1)));
        assert_eq!(ast.parent(NodeId(1)), Some(NodeId(2)));
        assert_eq!(ast.parent(ast.root()), None);
        let ancestors: Vec<_> = ast.ancestors(NodeId(0)).collect();
        assert_eq!(ancestors, vec![NodeId(1), NodeId(2)]);
    }

    #[test]
    fn test_walk_is_preorder() {
        let ast = small_tree();
        let mut order = Vec::new();
        ast.walk(|id, _| order.push(id));
        assert_eq!(order, vec![NodeId(2), NodeId(1), NodeId(0)]);
        assert_eq!(ast.identifier_name(NodeId(0)), Some("x"));
        assert_eq!(ast.source_type(), SourceType::Script);
    }
}
