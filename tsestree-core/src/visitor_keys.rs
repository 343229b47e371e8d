//! Visitor-key table
//!
//! Maps every standardized node type to the ordered child fields a generic
//! walker visits. The table is plain data so an external engine can walk
//! the tree without calling back into this crate.

use crate::ast::NodeType;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Child fields of a node type, looked up by its ESTree name
pub fn visitor_keys(node_type: &str) -> Option<&'static [&'static str]> {
    NodeType::from_name(node_type).map(NodeType::visitor_keys)
}

/// The full table, sorted by node type name
pub fn visitor_key_table() -> BTreeMap<&'static str, &'static [&'static str]> {
    NodeType::ALL
        .iter()
        .map(|t| (t.as_str(), t.visitor_keys()))
        .collect()
}

/// The full table as a JSON object
pub fn visitor_keys_json() -> Value {
    let mut map = Map::new();
    for (name, keys) in visitor_key_table() {
        map.insert(
            name.to_string(),
            Value::Array(keys.iter().map(|k| Value::from(*k)).collect()),
        );
    }
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_node_type_has_an_entry() {
        let table = visitor_key_table();
        assert_eq!(table.len(), NodeType::ALL.len());
        for node_type in NodeType::ALL {
            assert!(table.contains_key(node_type.as_str()));
        }
    }

    #[test]
    fn test_known_entries() {
        assert_eq!(
            visitor_keys("FunctionDeclaration"),
            Some(&["id", "typeParameters", "params", "returnType", "body"][..])
        );
        assert_eq!(visitor_keys("ThisExpression"), Some(&[][..]));
        assert_eq!(visitor_keys("TSAsExpression"), Some(&["expression", "typeAnnotation"][..]));
        assert_eq!(visitor_keys("Unknown"), None);
    }

    #[test]
    fn test_keys_are_unique_per_type() {
        for (name, keys) in visitor_key_table() {
            let mut sorted = keys.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), keys.len(), "duplicate key in {}", name);
        }
    }

    #[test]
    fn test_json_table() {
        let json = visitor_keys_json();
        assert_eq!(json["DoWhileStatement"], serde_json::json!(["body", "test"]));
    }
}
