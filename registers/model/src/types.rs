// Licensed under the Apache-2.0 license

//! The intermediate representation of a register map.
//!
//! Descriptors live in arenas owned by [`SocDescriptor`] and refer to each
//! other by index. Children are listed by their parent; every descriptor
//! also records the index of its parent so ancestor walks are index hops.

use crate::access::AccessMode;
use crate::bitfield;
use serde::{Deserialize, Serialize};

pub type BlockIdx = usize;
pub type RegisterIdx = usize;
pub type MemoryIdx = usize;

//=============================================================================
// Fields
//=============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    pub value: u64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub lsb: u32,
    pub msb: u32,
    pub access: AccessMode,
    pub reset: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<EnumValue>,
}

impl FieldDescriptor {
    /// Creates a field spanning `[lsb, lsb + width)`. A zero width is raised
    /// to one bit.
    pub fn new(name: impl Into<String>, lsb: u32, width: u32, access: AccessMode) -> Self {
        let width = width.max(1);
        Self {
            name: name.into(),
            lsb,
            msb: lsb + width - 1,
            access,
            reset: None,
            description: String::new(),
            enum_values: vec![],
        }
    }

    pub fn width(&self) -> u32 {
        self.msb - self.lsb + 1
    }

    pub fn mask(&self) -> u64 {
        bitfield::mask(self.lsb, self.width())
    }

    pub fn extract(&self, register_value: u64) -> u64 {
        bitfield::extract(register_value, self.lsb, self.width())
    }
}

//=============================================================================
// Arrays
//=============================================================================

/// Shape of an arrayed register or block. The descriptor carrying it is the
/// element template; element 0 sits at the template's address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrayDescriptor {
    pub dimensions: Vec<u64>,
    pub count: u64,
    pub stride: u64,
}

impl ArrayDescriptor {
    pub fn new(dimensions: Vec<u64>, stride: u64) -> Self {
        let count = dimensions.iter().product();
        Self {
            dimensions,
            count,
            stride,
        }
    }

    /// Row-major flat index of a multi-dimensional index, or `None` when out
    /// of range.
    pub fn flat_index(&self, index: &[u64]) -> Option<u64> {
        if index.len() != self.dimensions.len() {
            return None;
        }
        let mut flat = 0;
        for (i, dim) in index.iter().zip(self.dimensions.iter()) {
            if i >= dim {
                return None;
            }
            flat = flat * dim + i;
        }
        Some(flat)
    }
}

//=============================================================================
// Registers
//=============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterDescriptor {
    pub name: String,
    pub path: String,
    pub address: u64,
    pub offset: u64,
    pub width: u32,
    pub access: AccessMode,
    pub volatile: bool,
    pub reset: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub fields: Vec<FieldDescriptor>,
    pub array: Option<ArrayDescriptor>,
    #[serde(skip)]
    pub parent: BlockIdx,
}

impl RegisterDescriptor {
    pub fn byte_width(&self) -> usize {
        bitfield::byte_width(self.width)
    }

    pub fn access_bytes(&self) -> usize {
        bitfield::access_bytes(self.width)
    }

    pub fn byte_enable(&self) -> u8 {
        bitfield::byte_enable(self.width)
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Address of a flattened array element. Non-arrayed registers only
    /// have element 0.
    pub fn element_address(&self, index: u64) -> Option<u64> {
        match &self.array {
            Some(array) if index < array.count => Some(self.address + index * array.stride),
            None if index == 0 => Some(self.address),
            _ => None,
        }
    }
}

//=============================================================================
// Memories
//=============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDescriptor {
    pub name: String,
    pub path: String,
    pub address: u64,
    pub offset: u64,
    pub entries: u64,
    pub entry_width: u32,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Registers declared inside the memory, laid out relative to entry 0.
    #[serde(skip)]
    pub entry_template: Option<BlockIdx>,
    #[serde(skip)]
    pub parent: BlockIdx,
}

impl MemoryDescriptor {
    /// Bus access width of one entry, which is also the entry stride.
    pub fn entry_bytes(&self) -> usize {
        bitfield::access_bytes(self.entry_width)
    }

    /// Total size in bytes.
    pub fn extent(&self) -> u64 {
        self.entries * self.entry_bytes() as u64
    }

    pub fn entry_address(&self, index: u64) -> Option<u64> {
        (index < self.entries).then(|| self.address + index * self.entry_bytes() as u64)
    }
}

//=============================================================================
// Blocks
//=============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Top,
    SubBlock,
    /// Register layout of one memory entry. Not part of the block tree.
    MemoryEntry,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub name: String,
    pub path: String,
    pub address: u64,
    pub offset: u64,
    pub kind: BlockKind,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub array: Option<ArrayDescriptor>,
    #[serde(skip)]
    pub parent: Option<BlockIdx>,
    #[serde(skip)]
    pub registers: Vec<RegisterIdx>,
    #[serde(skip)]
    pub blocks: Vec<BlockIdx>,
    #[serde(skip)]
    pub memories: Vec<MemoryIdx>,
}

impl BlockDescriptor {
    pub fn new(name: impl Into<String>, path: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            address: 0,
            offset: 0,
            kind,
            description: String::new(),
            array: None,
            parent: None,
            registers: vec![],
            blocks: vec![],
            memories: vec![],
        }
    }
}

//=============================================================================
// SoC
//=============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub emit_stubs: bool,
    pub emit_examples: bool,
    pub access_checks: bool,
    pub emit_reset_helper: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SocDescriptor {
    pub name: String,
    pub namespace: String,
    pub word_bytes: usize,
    pub little_endian: bool,
    pub options: GenerationOptions,
    pub top: BlockIdx,
    pub blocks: Vec<BlockDescriptor>,
    pub registers: Vec<RegisterDescriptor>,
    pub memories: Vec<MemoryDescriptor>,
}

impl SocDescriptor {
    /// Creates a descriptor holding only an empty top block.
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, top: BlockDescriptor) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            word_bytes: 4,
            little_endian: true,
            options: GenerationOptions::default(),
            top: 0,
            blocks: vec![top],
            registers: vec![],
            memories: vec![],
        }
    }

    pub fn top(&self) -> &BlockDescriptor {
        &self.blocks[self.top]
    }

    pub fn block(&self, idx: BlockIdx) -> &BlockDescriptor {
        &self.blocks[idx]
    }

    pub fn register(&self, idx: RegisterIdx) -> &RegisterDescriptor {
        &self.registers[idx]
    }

    pub fn memory(&self, idx: MemoryIdx) -> &MemoryDescriptor {
        &self.memories[idx]
    }

    /// Adds `block` under `parent` and returns its index.
    pub fn add_block(&mut self, parent: BlockIdx, mut block: BlockDescriptor) -> BlockIdx {
        let idx = self.blocks.len();
        block.parent = Some(parent);
        self.blocks.push(block);
        self.blocks[parent].blocks.push(idx);
        idx
    }

    /// Adds a memory-entry template. It records its parent but is not listed
    /// among the parent's child blocks.
    pub fn add_entry_template(&mut self, parent: BlockIdx, mut block: BlockDescriptor) -> BlockIdx {
        let idx = self.blocks.len();
        block.parent = Some(parent);
        block.kind = BlockKind::MemoryEntry;
        self.blocks.push(block);
        idx
    }

    pub fn add_register(&mut self, parent: BlockIdx, mut register: RegisterDescriptor) -> RegisterIdx {
        let idx = self.registers.len();
        register.parent = parent;
        self.registers.push(register);
        self.blocks[parent].registers.push(idx);
        idx
    }

    pub fn add_memory(&mut self, parent: BlockIdx, mut memory: MemoryDescriptor) -> MemoryIdx {
        let idx = self.memories.len();
        memory.parent = parent;
        self.memories.push(memory);
        self.blocks[parent].memories.push(idx);
        idx
    }

    /// Parents of `block`, nearest first.
    pub fn ancestors(&self, block: BlockIdx) -> impl Iterator<Item = BlockIdx> + '_ {
        std::iter::successors(self.blocks[block].parent, move |&b| self.blocks[b].parent)
    }

    /// Every register reachable from the top block: a block's own registers
    /// first, then its child blocks depth-first. Memory entry templates are
    /// not visited.
    pub fn flatten_registers(&self) -> Vec<RegisterIdx> {
        let mut out = Vec::with_capacity(self.registers.len());
        let mut stack = vec![self.top];
        while let Some(block) = stack.pop() {
            let block = &self.blocks[block];
            out.extend_from_slice(&block.registers);
            stack.extend(block.blocks.iter().rev());
        }
        out
    }

    /// Child blocks and registers of `block` that are arrays.
    pub fn arrays(&self, block: BlockIdx) -> (Vec<BlockIdx>, Vec<RegisterIdx>) {
        let block = &self.blocks[block];
        (
            block
                .blocks
                .iter()
                .copied()
                .filter(|&b| self.blocks[b].array.is_some())
                .collect(),
            block
                .registers
                .iter()
                .copied()
                .filter(|&r| self.registers[r].array.is_some())
                .collect(),
        )
    }

    /// Sorts each block's registers, child blocks and memories by address
    /// and then name.
    pub fn sort(&mut self) {
        let Self {
            blocks,
            registers,
            memories,
            ..
        } = self;
        for block in blocks.iter_mut() {
            block
                .registers
                .sort_by(|&a, &b| {
                    (registers[a].address, &registers[a].name).cmp(&(registers[b].address, &registers[b].name))
                });
            block
                .memories
                .sort_by(|&a, &b| (memories[a].address, &memories[a].name).cmp(&(memories[b].address, &memories[b].name)));
        }
        let keys: Vec<(u64, String)> = blocks.iter().map(|b| (b.address, b.name.clone())).collect();
        for block in blocks.iter_mut() {
            block.blocks.sort_by(|&a, &b| keys[a].cmp(&keys[b]));
        }
    }
}
