// Licensed under the Apache-2.0 license

use crate::desc::{BlockInfo, MemoryInfo, RegisterInfo, SocInfo};
use crate::error::{AccessError, AccessResult};
use log::warn;
use std::collections::BTreeMap;

/// Path-indexed view of the descriptors a generated binding registered.
#[derive(Clone, Debug)]
pub struct Registry {
    soc: &'static SocInfo,
    registers: BTreeMap<&'static str, &'static RegisterInfo>,
    blocks: BTreeMap<&'static str, &'static BlockInfo>,
    memories: BTreeMap<&'static str, &'static MemoryInfo>,
}

impl Registry {
    pub fn new(soc: &'static SocInfo) -> Self {
        let mut registry = Self {
            soc,
            registers: BTreeMap::new(),
            blocks: BTreeMap::new(),
            memories: BTreeMap::new(),
        };
        registry.add_block(soc.top);
        registry
    }

    pub fn soc(&self) -> &'static SocInfo {
        self.soc
    }

    pub fn add_register(&mut self, info: &'static RegisterInfo) {
        if self.registers.insert(info.path, info).is_some() {
            warn!("Register {} bound twice", info.path);
        }
    }

    pub fn add_block(&mut self, info: &'static BlockInfo) {
        self.blocks.insert(info.path, info);
    }

    pub fn add_memory(&mut self, info: &'static MemoryInfo) {
        self.memories.insert(info.path, info);
    }

    /// Full path, or a path relative to the top block.
    fn resolve<'a, T>(&self, map: &'a BTreeMap<&'static str, T>, path: &str) -> Option<&'a T> {
        map.get(path)
            .or_else(|| map.get(format!("{}.{path}", self.soc.top.path).as_str()))
    }

    pub fn register(&self, path: &str) -> AccessResult<&'static RegisterInfo> {
        self.resolve(&self.registers, path)
            .copied()
            .ok_or_else(|| AccessError::UnknownMember(path.to_string()))
    }

    pub fn block(&self, path: &str) -> AccessResult<&'static BlockInfo> {
        self.resolve(&self.blocks, path)
            .copied()
            .ok_or_else(|| AccessError::UnknownMember(path.to_string()))
    }

    pub fn memory(&self, path: &str) -> AccessResult<&'static MemoryInfo> {
        self.resolve(&self.memories, path)
            .copied()
            .ok_or_else(|| AccessError::UnknownMember(path.to_string()))
    }

    /// Registered registers in path order.
    pub fn registers(&self) -> impl Iterator<Item = &'static RegisterInfo> + '_ {
        self.registers.values().copied()
    }

    pub fn memories(&self) -> impl Iterator<Item = &'static MemoryInfo> + '_ {
        self.memories.values().copied()
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }
}
