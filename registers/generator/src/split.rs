// Licensed under the Apache-2.0 license

//! Partitioning of the flat register list into binding units.

use crate::config::GeneratorConfig;
use log::debug;
use regbind_model::{BlockIdx, BlockKind, RegisterIdx, SocDescriptor};
use std::collections::{HashMap, HashSet};

/// Group name for registers directly under the top block.
pub const TOP_LEVEL_GROUP: &str = "top_level";

/// Registers emitted together in one binding unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    /// Hierarchy group path, or the index range for count-based splits.
    pub name: String,
    pub registers: Vec<RegisterIdx>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingPlan {
    Single(Vec<RegisterIdx>),
    Chunked(Vec<Chunk>),
}

/// Decides how the registers of `soc` are laid out.
///
/// Hierarchical splitting wins when enabled and falls back to a single unit
/// if it produces no groups. Otherwise registers are chunked by count when
/// there are more of them than `split_bindings` (zero disables this).
pub fn plan(soc: &SocDescriptor, config: &GeneratorConfig) -> BindingPlan {
    let registers = soc.flatten_registers();
    if config.split_by_hierarchy {
        let groups = group_by_hierarchy(soc, &registers);
        if groups.is_empty() {
            return BindingPlan::Single(registers);
        }
        debug!("Splitting {} registers into {} hierarchy groups", registers.len(), groups.len());
        return BindingPlan::Chunked(groups);
    }
    let k = config.split_bindings;
    if k > 0 && registers.len() > k {
        let chunks = split_by_count(&registers, k);
        debug!("Splitting {} registers into {} chunks of {k}", registers.len(), chunks.len());
        return BindingPlan::Chunked(chunks);
    }
    BindingPlan::Single(registers)
}

/// Order-preserving chunks of at most `chunk_size` registers.
pub fn split_by_count(registers: &[RegisterIdx], chunk_size: usize) -> Vec<Chunk> {
    let chunk_size = chunk_size.max(1);
    registers
        .chunks(chunk_size)
        .enumerate()
        .map(|(i, regs)| Chunk {
            name: format!("registers {}..{}", i * chunk_size, i * chunk_size + regs.len()),
            registers: regs.to_vec(),
        })
        .collect()
}

/// Groups registers by their nearest enclosing sub-block, in order of first
/// appearance. Registers with no such block land in [`TOP_LEVEL_GROUP`].
///
/// The set of container blocks is collected once; each register then walks
/// its parent chain with constant-time membership tests.
pub fn group_by_hierarchy(soc: &SocDescriptor, registers: &[RegisterIdx]) -> Vec<Chunk> {
    let containers: HashSet<BlockIdx> = soc
        .blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| b.kind == BlockKind::SubBlock)
        .map(|(i, _)| i)
        .collect();

    let mut index: HashMap<Option<BlockIdx>, usize> = HashMap::new();
    let mut groups: Vec<Chunk> = vec![];
    for &reg in registers {
        let parent = soc.register(reg).parent;
        let container = std::iter::once(parent)
            .chain(soc.ancestors(parent))
            .find(|b| containers.contains(b));
        let slot = *index.entry(container).or_insert_with(|| {
            groups.push(Chunk {
                name: container.map_or_else(
                    || TOP_LEVEL_GROUP.to_string(),
                    |b| soc.block(b).path.clone(),
                ),
                registers: vec![],
            });
            groups.len() - 1
        });
        groups[slot].registers.push(reg);
    }
    groups
}
