//! ESTree-shaped JSON export
//!
//! Child ids are replaced by the nested child objects, so the output is the
//! plain data tree an ESTree consumer expects.

use super::{Ast, NodeId};
use crate::comments::Comment;
use crate::tokens::Token;
use serde_json::{Map, Value};

/// Render one node and its subtree
pub fn node_to_json(ast: &Ast, id: NodeId) -> Value {
    let node = ast.node(id);
    let mut object = match serde_json::to_value(&node.kind) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    };
    for (key, value) in node.kind.child_values(&mut |child| node_to_json(ast, child)) {
        object.insert(key.to_string(), value);
    }
    object.insert("range".to_string(), serde_json::json!([node.range.start, node.range.end]));
    object.insert(
        "loc".to_string(),
        serde_json::to_value(node.loc).unwrap_or(Value::Null),
    );
    Value::Object(object)
}

/// Render the whole tree, with tokens and comments on the root when given
pub fn to_estree_json(ast: &Ast, tokens: Option<&[Token]>, comments: Option<&[Comment]>) -> Value {
    let mut root = node_to_json(ast, ast.root());
    if let Value::Object(map) = &mut root {
        if let Some(tokens) = tokens {
            map.insert(
                "tokens".to_string(),
                serde_json::to_value(tokens).unwrap_or(Value::Null),
            );
        }
        if let Some(comments) = comments {
            map.insert(
                "comments".to_string(),
                serde_json::to_value(comments).unwrap_or(Value::Null),
            );
        }
    }
    root
}
