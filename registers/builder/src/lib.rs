// Licensed under the Apache-2.0 license

//! Builds the register-map IR from an elaborated design.
//!
//! The design front-end is reached only through the [`DesignTree`] trait.
//! [`NodeTree`] is an in-memory implementation that can be loaded from
//! JSON.
//!
//! ```
//! use regbind_builder::{DesignNode, ModelBuilder, NodeTree};
//!
//! let tree = NodeTree::new([DesignNode::addrmap("uart")
//!     .child(DesignNode::reg("CTRL", 0x1000).width(8))]);
//! let soc = ModelBuilder::new(4, true)
//!     .build(&tree, "uart", "uart", "uart")
//!     .unwrap();
//! assert_eq!(soc.registers[0].address, 0x1000);
//! ```

mod build;
mod node;
mod tree;

pub use build::{ArrayPolicy, ModelBuilder};
pub use node::{DesignNode, NodeTree};
pub use tree::{DesignTree, NodeKind, Property, PropertyValue};
