//! Maps between standardized nodes and upstream nodes
//!
//! A type-aware caller holds on to the upstream program and looks nodes up
//! by kind and range. When the maps were not requested every lookup simply
//! returns `None`.

use crate::ast::NodeId;
use crate::position::Range;
use std::collections::HashMap;

/// Identity of an upstream node: its type name and file-relative range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UpstreamNode {
    pub kind: &'static str,
    pub range: Range,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeMaps {
    to_upstream: HashMap<NodeId, UpstreamNode>,
    to_estree: HashMap<UpstreamNode, NodeId>,
}

impl NodeMaps {
    /// Record that `id` was produced from `upstream`
    ///
    /// The first standardized node recorded for an upstream node wins, which
    /// is the innermost one since children are converted first.
    pub(crate) fn record(&mut self, id: NodeId, upstream: UpstreamNode) {
        self.to_upstream.insert(id, upstream);
        self.to_estree.entry(upstream).or_insert(id);
    }

    pub fn estree_to_upstream(&self, id: NodeId) -> Option<UpstreamNode> {
        self.to_upstream.get(&id).copied()
    }

    pub fn upstream_to_estree(&self, node: &UpstreamNode) -> Option<NodeId> {
        self.to_estree.get(node).copied()
    }

    pub fn len(&self) -> usize {
        self.to_upstream.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_upstream.is_empty()
    }
}

/// Type-service surface handed to downstream callers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserServices {
    pub node_maps: Option<NodeMaps>,
}

impl ParserServices {
    /// Whether node maps were preserved for this file
    pub fn has_node_maps(&self) -> bool {
        self.node_maps.is_some()
    }

    pub fn estree_to_upstream(&self, id: NodeId) -> Option<UpstreamNode> {
        self.node_maps.as_ref()?.estree_to_upstream(id)
    }

    pub fn upstream_to_estree(&self, node: &UpstreamNode) -> Option<NodeId> {
        self.node_maps.as_ref()?.upstream_to_estree(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_maps_degrade_to_none() {
        let services = ParserServices::default();
        let upstream = UpstreamNode {
            kind: "Ident",
            range: Range::new(0, 1),
        };
        assert!(!services.has_node_maps());
        assert_eq!(services.estree_to_upstream(NodeId(0)), None);
        assert_eq!(services.upstream_to_estree(&upstream), None);
    }

    #[test]
    fn test_first_record_wins_for_upstream_lookup() {
        let mut maps = NodeMaps::default();
        let upstream = UpstreamNode {
            kind: "OptChainExpr",
            range: Range::new(0, 5),
        };
        maps.record(NodeId(3), upstream);
        maps.record(NodeId(4), upstream);
        assert_eq!(maps.upstream_to_estree(&upstream), Some(NodeId(3)));
        assert_eq!(maps.estree_to_upstream(NodeId(4)), Some(upstream));
        assert_eq!(maps.len(), 2);
    }
}
