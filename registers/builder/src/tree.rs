// Licensed under the Apache-2.0 license

//! The boundary between an elaborated design front-end and the builder.
//!
//! A front-end only has to answer four questions about its nodes: where the
//! top is, what kind of node something is, what its children are, and what
//! a property evaluates to. Everything else is derived by the builder.

use regbind_model::EnumValue;

/// Closed classification of design nodes the builder understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Register,
    /// Address map or register file.
    SubBlock,
    Memory,
    Field,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Name,
    Description,
    /// Absolute address.
    Address,
    /// Offset from the parent block.
    Offset,
    /// Register width, or field width in bits.
    Width,
    Access,
    Reset,
    Volatile,
    Dimensions,
    Stride,
    Entries,
    MemoryWidth,
    Lsb,
    Msb,
    EnumValues,
}

/// Evaluated property value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropertyValue {
    Int(u64),
    Bool(bool),
    String(String),
    List(Vec<u64>),
    Enums(Vec<EnumValue>),
}

impl PropertyValue {
    /// Integer view. Strings holding a decimal or `0x` hex literal count as
    /// integers; anything else does not.
    pub fn as_int(&self) -> Option<u64> {
        match self {
            PropertyValue::Int(i) => Some(*i),
            PropertyValue::Bool(b) => Some(*b as u64),
            PropertyValue::String(s) => parse_int(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(b) => Some(*b),
            PropertyValue::Int(i) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[u64]> {
        match self {
            PropertyValue::List(l) => Some(l),
            _ => None,
        }
    }
}

pub(crate) fn parse_int(s: &str) -> Option<u64> {
    let s = s.trim().replace('_', "");
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

/// An elaborated design, seen through the questions the builder asks.
pub trait DesignTree {
    type Node: Copy;

    /// Looks up a top-level symbol.
    fn top(&self, symbol: &str) -> Option<Self::Node>;

    /// Classifies a node. `None` means the node is not part of the register
    /// map (signals, constraints and the like) and is skipped.
    fn kind(&self, node: Self::Node) -> Option<NodeKind>;

    /// Children in declaration order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    fn property(&self, node: Self::Node, property: Property) -> Option<PropertyValue>;

    fn fields(&self, node: Self::Node) -> Vec<Self::Node> {
        self.children(node)
            .into_iter()
            .filter(|&c| self.kind(c) == Some(NodeKind::Field))
            .collect()
    }
}
