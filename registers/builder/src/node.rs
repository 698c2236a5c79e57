// Licensed under the Apache-2.0 license

//! An in-memory design tree.
//!
//! [`DesignNode`] is a plain serde tree, so an elaborated design can be
//! handed over as JSON:
//!
//! ```json
//! { "type": "addrmap", "name": "uart", "children": [
//!     { "type": "reg", "name": "CTRL", "offset": 4096, "width": 8, "children": [
//!         { "type": "field", "name": "WLS", "lsb": 0, "width": 1 }
//!     ] }
//! ] }
//! ```
//!
//! [`NodeTree`] flattens it into an arena and implements [`DesignTree`].

use crate::tree::{DesignTree, NodeKind, Property, PropertyValue};
use regbind_model::EnumValue;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DesignNode {
    /// `addrmap`, `regfile`, `reg`, `field` or `mem`. Anything else is
    /// carried along but ignored by the builder.
    #[serde(rename = "type")]
    pub node_type: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    /// Kept loosely typed; values that are not integers are ignored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatile: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stride: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entries: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memwidth: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lsb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub msb: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DesignNode>,
}

impl DesignNode {
    pub fn new(node_type: &str, name: &str) -> Self {
        Self {
            node_type: node_type.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn addrmap(name: &str) -> Self {
        Self::new("addrmap", name)
    }

    pub fn regfile(name: &str, offset: u64) -> Self {
        Self::new("regfile", name).offset(offset)
    }

    pub fn reg(name: &str, offset: u64) -> Self {
        Self::new("reg", name).offset(offset)
    }

    pub fn field(name: &str, lsb: u64, width: u64) -> Self {
        let mut node = Self::new("field", name);
        node.lsb = Some(lsb);
        node.width = Some(width);
        node
    }

    pub fn mem(name: &str, offset: u64, entries: u64, memwidth: u64) -> Self {
        let mut node = Self::new("mem", name).offset(offset);
        node.entries = Some(entries);
        node.memwidth = Some(memwidth);
        node
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn address(mut self, address: u64) -> Self {
        self.address = Some(address);
        self
    }

    pub fn width(mut self, width: u64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn access(mut self, access: &str) -> Self {
        self.access = Some(access.to_string());
        self
    }

    pub fn reset(mut self, reset: u64) -> Self {
        self.reset = Some(Value::from(reset));
        self
    }

    pub fn volatile(mut self) -> Self {
        self.volatile = Some(true);
        self
    }

    pub fn array(mut self, dimensions: &[u64], stride: Option<u64>) -> Self {
        self.dimensions = Some(dimensions.to_vec());
        self.stride = stride;
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn child(mut self, child: DesignNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = DesignNode>) -> Self {
        self.children.extend(children);
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(DesignNode),
    Many(Vec<DesignNode>),
}

struct Entry {
    node: DesignNode,
    children: Vec<usize>,
}

/// Arena over one or more [`DesignNode`] roots.
pub struct NodeTree {
    nodes: Vec<Entry>,
    roots: Vec<usize>,
}

impl NodeTree {
    pub fn new(roots: impl IntoIterator<Item = DesignNode>) -> Self {
        let mut tree = NodeTree {
            nodes: vec![],
            roots: vec![],
        };
        for root in roots {
            let idx = tree.push(root);
            tree.roots.push(idx);
        }
        tree
    }

    /// Parses a single root object or an array of roots.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        Ok(match serde_json::from_str(json)? {
            OneOrMany::One(node) => NodeTree::new([node]),
            OneOrMany::Many(nodes) => NodeTree::new(nodes),
        })
    }

    fn push(&mut self, mut node: DesignNode) -> usize {
        let children = std::mem::take(&mut node.children);
        let idx = self.nodes.len();
        self.nodes.push(Entry {
            node,
            children: vec![],
        });
        let child_indices = children.into_iter().map(|c| self.push(c)).collect();
        self.nodes[idx].children = child_indices;
        idx
    }

    pub fn node(&self, idx: usize) -> &DesignNode {
        &self.nodes[idx].node
    }
}

impl DesignTree for NodeTree {
    type Node = usize;

    fn top(&self, symbol: &str) -> Option<usize> {
        self.roots
            .iter()
            .copied()
            .find(|&r| self.nodes[r].node.name == symbol)
    }

    fn kind(&self, node: usize) -> Option<NodeKind> {
        match self.nodes[node].node.node_type.to_ascii_lowercase().as_str() {
            "addrmap" | "regfile" => Some(NodeKind::SubBlock),
            "reg" => Some(NodeKind::Register),
            "mem" => Some(NodeKind::Memory),
            "field" => Some(NodeKind::Field),
            _ => None,
        }
    }

    fn children(&self, node: usize) -> Vec<usize> {
        self.nodes[node].children.clone()
    }

    fn property(&self, node: usize, property: Property) -> Option<PropertyValue> {
        let n = &self.nodes[node].node;
        let int = |v: Option<u64>| v.map(PropertyValue::Int);
        match property {
            Property::Name => Some(PropertyValue::String(n.name.clone())),
            Property::Description => n.description.clone().map(PropertyValue::String),
            Property::Address => int(n.address),
            Property::Offset => int(n.offset),
            Property::Width => int(n.width),
            Property::Access => n.access.clone().map(PropertyValue::String),
            Property::Reset => match n.reset.as_ref()? {
                Value::Number(num) => num.as_u64().map(PropertyValue::Int),
                Value::String(s) => Some(PropertyValue::String(s.clone())),
                Value::Bool(b) => Some(PropertyValue::Bool(*b)),
                _ => None,
            },
            Property::Volatile => n.volatile.map(PropertyValue::Bool),
            Property::Dimensions => n.dimensions.clone().map(PropertyValue::List),
            Property::Stride => int(n.stride),
            Property::Entries => int(n.entries),
            Property::MemoryWidth => int(n.memwidth),
            Property::Lsb => int(n.lsb),
            Property::Msb => int(n.msb),
            Property::EnumValues => {
                (!n.enums.is_empty()).then(|| PropertyValue::Enums(n.enums.clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let tree = NodeTree::from_json(
            r#"{ "type": "addrmap", "name": "uart", "children": [
                { "type": "reg", "name": "CTRL", "offset": 4096, "width": 8,
                  "reset": "not-a-number", "children": [
                    { "type": "field", "name": "WLS", "lsb": 0, "width": 1 }
                ] },
                { "type": "signal", "name": "irq" }
            ] }"#,
        )
        .unwrap();
        let top = tree.top("uart").unwrap();
        assert_eq!(tree.kind(top), Some(NodeKind::SubBlock));
        let children = tree.children(top);
        assert_eq!(children.len(), 2);
        assert_eq!(tree.kind(children[0]), Some(NodeKind::Register));
        assert_eq!(tree.kind(children[1]), None);
        assert_eq!(
            tree.property(children[0], Property::Offset),
            Some(PropertyValue::Int(0x1000))
        );
        assert_eq!(
            tree.property(children[0], Property::Reset)
                .and_then(|v| v.as_int()),
            None
        );
        assert_eq!(tree.fields(children[0]).len(), 1);
        assert!(tree.top("missing").is_none());
    }

    #[test]
    fn test_many_roots() {
        let tree = NodeTree::from_json(
            r#"[{ "type": "addrmap", "name": "a" }, { "type": "addrmap", "name": "b" }]"#,
        )
        .unwrap();
        assert!(tree.top("a").is_some());
        assert!(tree.top("b").is_some());
    }
}
