// Licensed under the Apache-2.0 license

//! Walks a [`DesignTree`] into a [`SocDescriptor`].

use crate::tree::{DesignTree, NodeKind, Property, PropertyValue};
use log::{debug, trace, warn};
use regbind_model::bitfield;
use regbind_model::{
    AccessMode, ArrayDescriptor, BlockDescriptor, BlockIdx, BlockKind, ConfigurationError,
    FieldDescriptor, GenerationOptions, MemoryDescriptor, RegisterDescriptor, SocDescriptor,
};

/// What to do with arrayed registers and blocks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrayPolicy {
    /// Emit one descriptor carrying an [`ArrayDescriptor`].
    #[default]
    Descriptor,
    /// Emit one descriptor per element, named `name[i]`.
    Unroll,
}

#[derive(Clone, Debug)]
pub struct ModelBuilder {
    word_bytes: usize,
    little_endian: bool,
    array_policy: ArrayPolicy,
    options: GenerationOptions,
}

impl ModelBuilder {
    pub fn new(word_bytes: usize, little_endian: bool) -> Self {
        Self {
            word_bytes: word_bytes.max(1),
            little_endian,
            array_policy: ArrayPolicy::default(),
            options: GenerationOptions::default(),
        }
    }

    pub fn array_policy(mut self, policy: ArrayPolicy) -> Self {
        self.array_policy = policy;
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds the IR for the top-level symbol `top`.
    ///
    /// Only a missing SoC name or top symbol is an error; any other missing
    /// property falls back to a default.
    pub fn build<T: DesignTree>(
        &self,
        tree: &T,
        top: &str,
        soc_name: &str,
        namespace: &str,
    ) -> Result<SocDescriptor, ConfigurationError> {
        if soc_name.trim().is_empty() {
            return Err(ConfigurationError::EmptySocName);
        }
        let top_node = tree
            .top(top)
            .ok_or_else(|| ConfigurationError::MissingTop(top.to_string()))?;
        if tree.kind(top_node) != Some(NodeKind::SubBlock) {
            return Err(ConfigurationError::TopNotBlock(top.to_string()));
        }

        let walker = Walker { tree, builder: self };
        let name = walker.name(top_node).unwrap_or_else(|| top.to_string());
        let mut top_block = BlockDescriptor::new(name.clone(), name, BlockKind::Top);
        top_block.address = walker.int(top_node, Property::Address).unwrap_or(0);
        top_block.description = walker.description(top_node);

        let namespace = if namespace.is_empty() { soc_name } else { namespace };
        let mut soc = SocDescriptor::new(soc_name, namespace, top_block);
        soc.word_bytes = self.word_bytes;
        soc.little_endian = self.little_endian;
        soc.options = self.options.clone();

        let top_idx = soc.top;
        walker.walk_block(&mut soc, top_node, top_idx);
        soc.sort();
        debug!(
            "Built {}: {} blocks, {} registers, {} memories",
            soc.name,
            soc.blocks.len(),
            soc.registers.len(),
            soc.memories.len()
        );
        Ok(soc)
    }
}

struct Walker<'a, T: DesignTree> {
    tree: &'a T,
    builder: &'a ModelBuilder,
}

impl<T: DesignTree> Walker<'_, T> {
    fn int(&self, node: T::Node, property: Property) -> Option<u64> {
        self.tree.property(node, property).and_then(|v| v.as_int())
    }

    fn name(&self, node: T::Node) -> Option<String> {
        self.tree
            .property(node, Property::Name)
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|s| !s.is_empty())
    }

    fn description(&self, node: T::Node) -> String {
        self.tree
            .property(node, Property::Description)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default()
    }

    fn access(&self, node: T::Node) -> Option<AccessMode> {
        self.tree
            .property(node, Property::Access)
            .and_then(|v| v.as_str().map(AccessMode::normalize))
    }

    /// Absent or non-integer resets are treated as no reset.
    fn reset(&self, node: T::Node) -> Option<u64> {
        match self.tree.property(node, Property::Reset)? {
            PropertyValue::Bool(_) => None,
            value => {
                let reset = value.as_int();
                if reset.is_none() {
                    debug!("Ignoring malformed reset value {:?}", value);
                }
                reset
            }
        }
    }

    fn dimensions(&self, node: T::Node) -> Option<Vec<u64>> {
        self.tree
            .property(node, Property::Dimensions)
            .and_then(|v| v.as_list().map(<[u64]>::to_vec))
            .filter(|d| !d.is_empty() && d.iter().all(|&n| n > 0))
    }

    /// Returns (absolute address, offset from parent).
    fn place(&self, node: T::Node, parent_address: u64) -> (u64, u64) {
        if let Some(offset) = self.int(node, Property::Offset) {
            (parent_address + offset, offset)
        } else if let Some(address) = self.int(node, Property::Address) {
            (address, address.saturating_sub(parent_address))
        } else {
            (parent_address, 0)
        }
    }

    fn child_path(soc: &SocDescriptor, parent: BlockIdx, name: &str) -> String {
        format!("{}.{}", soc.block(parent).path, name)
    }

    fn walk_block(&self, soc: &mut SocDescriptor, node: T::Node, block: BlockIdx) {
        for child in self.tree.children(node) {
            match self.tree.kind(child) {
                Some(NodeKind::Register) => self.add_register(soc, child, block),
                Some(NodeKind::SubBlock) => self.add_sub_block(soc, child, block),
                Some(NodeKind::Memory) => self.add_memory(soc, child, block),
                Some(NodeKind::Field) => {
                    warn!(
                        "Field {:?} declared directly in block {}; skipping",
                        self.name(child),
                        soc.block(block).path
                    );
                }
                None => trace!("Skipping unmodelled node {:?}", self.name(child)),
            }
        }
    }

    //=========================================================================
    // Registers
    //=========================================================================

    fn build_fields(&self, node: T::Node, register_access: Option<AccessMode>) -> Vec<FieldDescriptor> {
        let mut fields: Vec<FieldDescriptor> = self
            .tree
            .fields(node)
            .into_iter()
            .map(|f| {
                let lsb = self.int(f, Property::Lsb).unwrap_or(0) as u32;
                let width = match (self.int(f, Property::Width), self.int(f, Property::Msb)) {
                    (Some(w), _) => w as u32,
                    (None, Some(msb)) if msb as u32 >= lsb => msb as u32 - lsb + 1,
                    _ => 1,
                };
                let access = self
                    .access(f)
                    .or(register_access)
                    .unwrap_or(AccessMode::RW);
                let mut field = FieldDescriptor::new(
                    self.name(f).unwrap_or_else(|| format!("field{lsb}")),
                    lsb,
                    width,
                    access,
                );
                field.reset = self.reset(f);
                field.description = self.description(f);
                if let Some(PropertyValue::Enums(values)) =
                    self.tree.property(f, Property::EnumValues)
                {
                    field.enum_values = values;
                }
                field
            })
            .collect();
        fields.sort_by(|a, b| (a.lsb, &a.name).cmp(&(b.lsb, &b.name)));
        fields
    }

    fn register_descriptor(
        &self,
        node: T::Node,
        name: String,
        path: String,
        address: u64,
        offset: u64,
    ) -> RegisterDescriptor {
        let width = match self.int(node, Property::Width) {
            Some(w) if w > 0 => w as u32,
            _ => (self.builder.word_bytes * 8) as u32,
        };
        let explicit_access = self.access(node);
        let fields = self.build_fields(node, explicit_access);
        let access = explicit_access.unwrap_or_else(|| common_access(&fields));
        let reset = self.reset(node).or_else(|| compose_reset(&fields));
        RegisterDescriptor {
            name,
            path,
            address,
            offset,
            width,
            access,
            volatile: self
                .tree
                .property(node, Property::Volatile)
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            reset,
            description: self.description(node),
            fields,
            array: None,
            parent: 0,
        }
    }

    fn stride(&self, node: T::Node, element_bytes: u64, path: &str) -> u64 {
        let default = element_bytes.max(self.builder.word_bytes as u64);
        match self.int(node, Property::Stride) {
            Some(stride) if stride < element_bytes => {
                warn!(
                    "Stride {stride:#x} of {path} is smaller than its element ({element_bytes:#x} bytes); using {default:#x}"
                );
                default
            }
            Some(stride) => stride,
            None => default,
        }
    }

    fn add_register(&self, soc: &mut SocDescriptor, node: T::Node, parent: BlockIdx) {
        let name = self.name(node).unwrap_or_else(|| "unnamed".to_string());
        let (address, offset) = self.place(node, soc.block(parent).address);
        let path = Self::child_path(soc, parent, &name);
        let register = self.register_descriptor(node, name.clone(), path.clone(), address, offset);

        let Some(dimensions) = self.dimensions(node) else {
            soc.add_register(parent, register);
            return;
        };
        let stride = self.stride(node, register.byte_width() as u64, &path);
        let array = ArrayDescriptor::new(dimensions, stride);
        match self.builder.array_policy {
            ArrayPolicy::Descriptor => {
                soc.add_register(parent, RegisterDescriptor {
                    array: Some(array),
                    ..register
                });
            }
            ArrayPolicy::Unroll => {
                for (flat, suffix) in element_suffixes(&array.dimensions).into_iter().enumerate() {
                    let element = RegisterDescriptor {
                        name: format!("{name}{suffix}"),
                        path: format!("{path}{suffix}"),
                        address: address + flat as u64 * stride,
                        offset: offset + flat as u64 * stride,
                        ..register.clone()
                    };
                    soc.add_register(parent, element);
                }
            }
        }
    }

    //=========================================================================
    // Blocks
    //=========================================================================

    fn add_sub_block(&self, soc: &mut SocDescriptor, node: T::Node, parent: BlockIdx) {
        let name = self.name(node).unwrap_or_else(|| "unnamed".to_string());
        let (address, offset) = self.place(node, soc.block(parent).address);
        let path = Self::child_path(soc, parent, &name);
        let dimensions = self.dimensions(node);

        let element = |soc: &mut SocDescriptor, name: String, path: String, address: u64, offset: u64| {
            let mut block = BlockDescriptor::new(name, path, BlockKind::SubBlock);
            block.address = address;
            block.offset = offset;
            block.description = self.description(node);
            let idx = soc.add_block(parent, block);
            self.walk_block(soc, node, idx);
            idx
        };

        let Some(dimensions) = dimensions else {
            element(soc, name, path, address, offset);
            return;
        };

        match self.builder.array_policy {
            ArrayPolicy::Descriptor => {
                let idx = element(soc, name, path.clone(), address, offset);
                let stride = self.stride(node, block_extent(soc, idx), &path);
                soc.blocks[idx].array = Some(ArrayDescriptor::new(dimensions, stride));
            }
            ArrayPolicy::Unroll => {
                let suffixes = element_suffixes(&dimensions);
                let first = element(
                    soc,
                    format!("{name}{}", suffixes[0]),
                    format!("{path}{}", suffixes[0]),
                    address,
                    offset,
                );
                let stride = self.stride(node, block_extent(soc, first), &path);
                for (flat, suffix) in suffixes.iter().enumerate().skip(1) {
                    let shift = flat as u64 * stride;
                    element(
                        soc,
                        format!("{name}{suffix}"),
                        format!("{path}{suffix}"),
                        address + shift,
                        offset + shift,
                    );
                }
            }
        }
    }

    //=========================================================================
    // Memories
    //=========================================================================

    fn add_memory(&self, soc: &mut SocDescriptor, node: T::Node, parent: BlockIdx) {
        let name = self.name(node).unwrap_or_else(|| "unnamed".to_string());
        let (address, offset) = self.place(node, soc.block(parent).address);
        let path = Self::child_path(soc, parent, &name);
        let entries = self.int(node, Property::Entries).unwrap_or_else(|| {
            warn!("Memory {path} declares no entry count; assuming 1");
            1
        });
        let entry_width = match self.int(node, Property::MemoryWidth) {
            Some(w) if w > 0 => w as u32,
            _ => (self.builder.word_bytes * 8) as u32,
        };

        let has_registers = self
            .tree
            .children(node)
            .into_iter()
            .any(|c| self.tree.kind(c) == Some(NodeKind::Register));
        let entry_template = has_registers.then(|| {
            let mut template = BlockDescriptor::new(name.clone(), path.clone(), BlockKind::MemoryEntry);
            template.address = address;
            let idx = soc.add_entry_template(parent, template);
            self.walk_block(soc, node, idx);
            idx
        });

        soc.add_memory(
            parent,
            MemoryDescriptor {
                name,
                path,
                address,
                offset,
                entries,
                entry_width,
                description: self.description(node),
                entry_template,
                parent,
            },
        );
    }
}

/// All fields share one mode: that mode. Otherwise read-write.
fn common_access(fields: &[FieldDescriptor]) -> AccessMode {
    match fields.split_first() {
        Some((first, rest)) if rest.iter().all(|f| f.access == first.access) => first.access,
        _ => AccessMode::RW,
    }
}

/// A register reset composed from its fields, only when every field has one.
fn compose_reset(fields: &[FieldDescriptor]) -> Option<u64> {
    if fields.is_empty() {
        return None;
    }
    fields.iter().try_fold(0u64, |acc, f| {
        f.reset
            .map(|reset| bitfield::insert(acc, f.lsb, f.width(), reset))
    })
}

/// `[i]`/`[i][j]` suffixes in row-major order.
fn element_suffixes(dimensions: &[u64]) -> Vec<String> {
    let mut out = vec![String::new()];
    for &dim in dimensions {
        out = out
            .iter()
            .flat_map(|prefix| (0..dim).map(move |i| format!("{prefix}[{i}]")))
            .collect();
    }
    out
}

/// Bytes from the block's base to the end of its last register, child block
/// or memory.
fn block_extent(soc: &SocDescriptor, idx: BlockIdx) -> u64 {
    let block = soc.block(idx);
    let base = block.address;
    let reg_end = block.registers.iter().map(|&r| {
        let reg = soc.register(r);
        let count = reg.array.as_ref().map_or(1, |a| a.count);
        let stride = reg.array.as_ref().map_or(0, |a| a.stride);
        reg.address + (count - 1) * stride + reg.byte_width() as u64
    });
    let block_end = block.blocks.iter().map(|&b| {
        let child = soc.block(b);
        let extent = block_extent(soc, b);
        match &child.array {
            Some(a) => child.address + (a.count - 1) * a.stride + extent,
            None => child.address + extent,
        }
    });
    let mem_end = block.memories.iter().map(|&m| {
        let mem = soc.memory(m);
        mem.address + mem.extent()
    });
    reg_end
        .chain(block_end)
        .chain(mem_end)
        .max()
        .map_or(0, |end| end.saturating_sub(base))
}
