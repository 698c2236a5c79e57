// Licensed under the Apache-2.0 license

//! Static descriptors emitted by the generator.
//!
//! Generated `*_descriptors.rs` files are nothing but `pub static` items of
//! these types. Children are referenced directly; parents only by path.

use regbind_model::bitfield;
pub use regbind_model::AccessMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnumInfo {
    pub name: &'static str,
    pub value: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    pub name: &'static str,
    pub lsb: u32,
    pub width: u32,
    pub access: AccessMode,
    pub reset: Option<u64>,
    pub enums: &'static [EnumInfo],
}

impl FieldInfo {
    pub const fn mask(&self) -> u64 {
        bitfield::mask(self.lsb, self.width)
    }

    pub const fn msb(&self) -> u32 {
        self.lsb + self.width - 1
    }

    /// Value of the enumerator or flag called `name`.
    pub fn enum_value(&self, name: &str) -> Option<u64> {
        self.enums.iter().find(|e| e.name == name).map(|e| e.value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrayInfo {
    pub dimensions: &'static [u64],
    pub count: u64,
    pub stride: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegisterInfo {
    pub name: &'static str,
    pub path: &'static str,
    /// Path of the enclosing block.
    pub parent: &'static str,
    pub address: u64,
    pub offset: u64,
    pub width: u32,
    pub access: AccessMode,
    pub volatile: bool,
    pub reset: Option<u64>,
    pub fields: &'static [FieldInfo],
    pub array: Option<ArrayInfo>,
}

impl RegisterInfo {
    pub const fn byte_width(&self) -> usize {
        bitfield::byte_width(self.width)
    }

    pub const fn access_bytes(&self) -> usize {
        bitfield::access_bytes(self.width)
    }

    pub const fn byte_enable(&self) -> u8 {
        bitfield::byte_enable(self.width)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldInfo> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryInfo {
    pub name: &'static str,
    pub path: &'static str,
    pub parent: &'static str,
    pub address: u64,
    pub entries: u64,
    pub entry_width: u32,
    /// Registers laid out relative to entry 0, if the memory declares any.
    pub entry: Option<&'static BlockInfo>,
}

impl MemoryInfo {
    /// Bus access width of one entry, which is also the entry stride.
    pub const fn entry_bytes(&self) -> usize {
        bitfield::access_bytes(self.entry_width)
    }

    pub const fn extent(&self) -> u64 {
        self.entries * self.entry_bytes() as u64
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockInfo {
    pub name: &'static str,
    pub path: &'static str,
    pub parent: Option<&'static str>,
    pub address: u64,
    pub registers: &'static [&'static RegisterInfo],
    pub blocks: &'static [&'static BlockInfo],
    pub memories: &'static [&'static MemoryInfo],
    pub array: Option<ArrayInfo>,
}

impl BlockInfo {
    pub fn register(&self, name: &str) -> Option<&'static RegisterInfo> {
        self.registers.iter().copied().find(|r| r.name == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SocInfo {
    pub name: &'static str,
    pub namespace: &'static str,
    pub word_bytes: usize,
    pub little_endian: bool,
    pub access_checks: bool,
    pub top: &'static BlockInfo,
}
