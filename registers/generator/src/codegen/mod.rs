// Licensed under the Apache-2.0 license

//! Turns a [`SocDescriptor`] into Rust source units.
//!
//! ## Emitted files
//!
//! ```text
//! <soc>_descriptors.rs     pub static descriptors for every block/register/memory
//! <soc>_bindings.rs        bind(), registry(), connect() and accessors
//! <soc>_bindings_<n>.rs    bind_chunk_<n>() and accessors (split bindings only)
//! <soc>.h                  C header with addresses, masks and shifts (optional)
//! <soc>_ir.json            IR dump (optional)
//! masters/*.rs             example programs (optional)
//! mod.rs                   module declarations
//! <soc>_sources.toml       list of emitted files
//! ```

mod bindings;
mod descriptors;
mod examples;
mod manifest;
mod stubs;

use crate::config::{ExportConfig, GeneratorConfig};
use crate::error::ExportResult;
use crate::output::GeneratedUnits;
use crate::split::{self, BindingPlan};
use crate::util::{identifier, snake_case, upper_snake, Idents};
use log::info;
use regbind_builder::DesignTree;
use regbind_model::{BlockIdx, BlockKind, MemoryIdx, RegisterIdx, SocDescriptor};
use std::path::{Path, PathBuf};

pub(crate) const HEADER: &str = "// Licensed under the Apache-2.0 license\n//\n// Generated by regbind-generator. Do not edit.\n";

/// Names shared by every emitted unit.
pub(crate) struct Symbols {
    /// Sanitized SoC name used as the file and module prefix.
    pub soc: String,
    /// Static identifier per block, register and memory index.
    pub blocks: Vec<String>,
    pub registers: Vec<String>,
    pub memories: Vec<String>,
    /// Accessor function per register index; empty for registers that are
    /// not bound (memory entry layouts).
    pub accessors: Vec<String>,
    /// Registers reachable from the top block, in binding order.
    pub bound: Vec<RegisterIdx>,
    /// Sub-blocks and memories reachable from the top block.
    pub bound_blocks: Vec<BlockIdx>,
    pub bound_memories: Vec<MemoryIdx>,
}

impl Symbols {
    pub fn new(soc: &SocDescriptor, plan: &BindingPlan) -> Self {
        let top_path = soc.top().path.as_str();
        let relative = |path: &str| -> String {
            path.strip_prefix(top_path)
                .and_then(|p| p.strip_prefix('.'))
                .unwrap_or(path)
                .to_string()
        };

        let mut statics = Idents::default();
        statics.reserve("SOC");
        statics.reserve("SOC_NAME");
        let bound = soc.flatten_registers();

        // Bound registers first so their names are stable under additions
        // elsewhere.
        let mut registers = vec![String::new(); soc.registers.len()];
        let mut is_bound = vec![false; soc.registers.len()];
        for &r in &bound {
            is_bound[r] = true;
        }
        let others: Vec<RegisterIdx> = (0..soc.registers.len()).filter(|&r| !is_bound[r]).collect();
        for &r in bound.iter().chain(others.iter()) {
            registers[r] = statics.unique(upper_snake(&relative(&soc.register(r).path)));
        }

        let blocks = soc
            .blocks
            .iter()
            .map(|b| {
                let base = match b.kind {
                    BlockKind::Top => upper_snake(&b.name),
                    BlockKind::SubBlock => upper_snake(&relative(&b.path)),
                    BlockKind::MemoryEntry => format!("{}_ENTRY", upper_snake(&relative(&b.path))),
                };
                statics.unique(base)
            })
            .collect();
        let memories = soc
            .memories
            .iter()
            .map(|m| statics.unique(upper_snake(&relative(&m.path))))
            .collect();

        let mut functions = Idents::default();
        for reserved in ["bind", "registry", "connect", "reset_to_defaults", "desc"] {
            functions.reserve(reserved);
        }
        if let BindingPlan::Chunked(chunks) = plan {
            for i in 0..chunks.len() {
                functions.reserve(&format!("bind_chunk_{i}"));
            }
        }
        let mut accessors = vec![String::new(); soc.registers.len()];
        for &r in &bound {
            accessors[r] = functions.unique(snake_case(&relative(&soc.register(r).path)));
        }

        let mut bound_blocks = vec![];
        let mut stack = vec![soc.top];
        while let Some(b) = stack.pop() {
            if b != soc.top {
                bound_blocks.push(b);
            }
            stack.extend(soc.block(b).blocks.iter().rev());
        }
        let bound_memories = std::iter::once(soc.top)
            .chain(bound_blocks.iter().copied())
            .flat_map(|b| soc.block(b).memories.iter().copied())
            .collect();

        Self {
            soc: identifier(&soc.name),
            blocks,
            registers,
            memories,
            accessors,
            bound,
            bound_blocks,
            bound_memories,
        }
    }

    pub fn descriptors_module(&self) -> String {
        format!("{}_descriptors", self.soc)
    }

    pub fn bindings_module(&self) -> String {
        format!("{}_bindings", self.soc)
    }

    pub fn chunk_module(&self, n: usize) -> String {
        format!("{}_bindings_{n}", self.soc)
    }
}

/// Generates every unit for `soc`, in memory.
pub fn generate(soc: &SocDescriptor, config: &GeneratorConfig) -> ExportResult<GeneratedUnits> {
    let plan = split::plan(soc, config);
    let symbols = Symbols::new(soc, &plan);
    let mut units = GeneratedUnits::default();
    let mut modules = vec![symbols.descriptors_module(), symbols.bindings_module()];

    units.insert(
        format!("{}.rs", symbols.descriptors_module()),
        descriptors::generate(soc, &symbols)?,
    );
    match &plan {
        BindingPlan::Single(registers) => {
            units.insert(
                format!("{}.rs", symbols.bindings_module()),
                bindings::generate_single(soc, &symbols, registers)?,
            );
        }
        BindingPlan::Chunked(chunks) => {
            for (n, chunk) in chunks.iter().enumerate() {
                units.insert(
                    format!("{}.rs", symbols.chunk_module(n)),
                    bindings::generate_chunk(soc, &symbols, n, chunk)?,
                );
                modules.push(symbols.chunk_module(n));
            }
            units.insert(
                format!("{}.rs", symbols.bindings_module()),
                bindings::generate_coordinator(soc, &symbols, chunks.len())?,
            );
        }
    }

    if soc.options.emit_stubs {
        units.insert(format!("{}.h", symbols.soc), stubs::generate(soc, &symbols)?);
    }
    if soc.options.emit_examples {
        for (name, contents) in examples::generate(&symbols)? {
            units.insert(Path::new("masters").join(name), contents);
        }
        modules.push("masters".to_string());
    }
    if config.emit_ir_json {
        units.insert(format!("{}_ir.json", symbols.soc), regbind_model::dump::to_json(soc)?);
    }

    units.insert("mod.rs", manifest::module_file(&modules)?);
    let sources = manifest::sources_file(soc, &units)?;
    units.insert(format!("{}_sources.toml", symbols.soc), sources);

    info!(
        "Generated {} units for {} ({} registers)",
        units.len(),
        soc.name,
        symbols.bound.len()
    );
    Ok(units)
}

/// Builds the IR from `tree`, generates every unit and writes them under
/// `out_dir`. Nothing is written unless the whole set was generated.
pub fn export<T: DesignTree>(tree: &T, config: &ExportConfig, out_dir: &Path) -> ExportResult<Vec<PathBuf>> {
    let soc = config
        .model_builder()
        .build(tree, &config.top, &config.soc_name, &config.namespace)?;
    let units = generate(&soc, &config.generator)?;
    units.write_to(out_dir)
}

/// Rust string literal for `s`.
pub(crate) fn string_lit(s: &str) -> String {
    format!("{s:?}")
}

/// Integer literal typed as `u64`.
pub(crate) fn u64_lit(value: u64) -> String {
    format!("{}_u64", crate::util::int_literal(value))
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
