// Licensed under the Apache-2.0 license

//! Binding units: registry wiring plus one accessor per register.

use super::{u64_lit, Symbols, HEADER};
use crate::split::Chunk;
use regbind_model::{RegisterIdx, SocDescriptor};
use std::fmt::Write;

/// Everything in one `<soc>_bindings.rs`.
pub(super) fn generate_single(
    soc: &SocDescriptor,
    symbols: &Symbols,
    registers: &[RegisterIdx],
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    imports(&mut out, soc, symbols, true)?;
    writeln!(out)?;
    writeln!(out, "/// Registers every descriptor of `{}`.", soc.name)?;
    writeln!(out, "pub fn bind(registry: &mut Registry) {{")?;
    bind_containers(&mut out, symbols)?;
    for &r in registers {
        writeln!(out, "    registry.add_register(&desc::{});", symbols.registers[r])?;
    }
    writeln!(out, "}}")?;
    entry_points(&mut out, soc, symbols)?;
    accessors(&mut out, soc, symbols, registers)?;
    Ok(out)
}

/// `<soc>_bindings_<n>.rs`: the registers of one chunk.
pub(super) fn generate_chunk(
    soc: &SocDescriptor,
    symbols: &Symbols,
    n: usize,
    chunk: &Chunk,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    writeln!(out, "// Chunk {n}: {}, {} registers.", chunk.name, chunk.registers.len())?;
    writeln!(out)?;
    writeln!(out, "use super::{} as desc;", symbols.descriptors_module())?;
    writeln!(out, "use regbind_runtime::{{Master, RegisterRef, Registry, Soc}};")?;
    writeln!(out)?;
    writeln!(out, "pub fn bind_chunk_{n}(registry: &mut Registry) {{")?;
    for &r in &chunk.registers {
        writeln!(out, "    registry.add_register(&desc::{});", symbols.registers[r])?;
    }
    writeln!(out, "}}")?;
    accessors(&mut out, soc, symbols, &chunk.registers)?;
    Ok(out)
}

/// `<soc>_bindings.rs` for split bindings: re-exports the chunks and calls
/// each chunk's bind function.
pub(super) fn generate_coordinator(
    soc: &SocDescriptor,
    symbols: &Symbols,
    chunks: usize,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    imports(&mut out, soc, symbols, false)?;
    for n in 0..chunks {
        writeln!(out, "pub use super::{}::*;", symbols.chunk_module(n))?;
    }
    writeln!(out)?;
    writeln!(out, "/// Registers every descriptor of `{}`.", soc.name)?;
    writeln!(out, "pub fn bind(registry: &mut Registry) {{")?;
    bind_containers(&mut out, symbols)?;
    for n in 0..chunks {
        writeln!(out, "    bind_chunk_{n}(registry);")?;
    }
    writeln!(out, "}}")?;
    entry_points(&mut out, soc, symbols)?;
    Ok(out)
}

fn imports(
    out: &mut String,
    soc: &SocDescriptor,
    symbols: &Symbols,
    with_accessors: bool,
) -> std::fmt::Result {
    let mut names = vec![];
    if soc.options.emit_reset_helper {
        names.push("AccessResult");
    }
    names.push("Master");
    if with_accessors {
        names.push("RegisterRef");
    }
    names.extend(["Registry", "Soc"]);
    writeln!(out, "use super::{} as desc;", symbols.descriptors_module())?;
    writeln!(out, "use regbind_runtime::{{{}}};", names.join(", "))
}

fn bind_containers(out: &mut String, symbols: &Symbols) -> std::fmt::Result {
    for &b in &symbols.bound_blocks {
        writeln!(out, "    registry.add_block(&desc::{});", symbols.blocks[b])?;
    }
    for &m in &symbols.bound_memories {
        writeln!(out, "    registry.add_memory(&desc::{});", symbols.memories[m])?;
    }
    Ok(())
}

/// `registry()`, `connect()` and, when enabled, `reset_to_defaults()`.
fn entry_points(out: &mut String, soc: &SocDescriptor, symbols: &Symbols) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "pub fn registry() -> Registry {{")?;
    writeln!(out, "    let mut registry = Registry::new(&desc::SOC);")?;
    writeln!(out, "    bind(&mut registry);")?;
    writeln!(out, "    registry")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(out, "pub fn connect<M: Master>(master: M) -> Soc<M> {{")?;
    writeln!(out, "    Soc::new(master, registry())")?;
    writeln!(out, "}}")?;

    if !soc.options.emit_reset_helper {
        return Ok(());
    }
    writeln!(out)?;
    writeln!(out, "/// Writes the reset value of every writable register that has one.")?;
    writeln!(out, "pub fn reset_to_defaults<M: Master>(soc: &mut Soc<M>) -> AccessResult<()> {{")?;
    for &r in &symbols.bound {
        let reg = soc.register(r);
        let Some(reset) = reg.reset else { continue };
        if !reg.access.is_writable() {
            continue;
        }
        let accessor = &symbols.accessors[r];
        match &reg.array {
            Some(array) => {
                writeln!(out, "    for i in 0..{} {{", array.count)?;
                writeln!(out, "        {accessor}(soc).element(i)?.write({})?;", u64_lit(reset))?;
                writeln!(out, "    }}")?;
            }
            None => writeln!(out, "    {accessor}(soc).write({})?;", u64_lit(reset))?,
        }
    }
    writeln!(out, "    Ok(())")?;
    writeln!(out, "}}")
}

fn accessors(
    out: &mut String,
    soc: &SocDescriptor,
    symbols: &Symbols,
    registers: &[RegisterIdx],
) -> std::fmt::Result {
    for &r in registers {
        let reg = soc.register(r);
        writeln!(out)?;
        writeln!(out, "/// `{}` at {:#x}.", reg.path, reg.address)?;
        writeln!(
            out,
            "pub fn {}<M: Master>(soc: &mut Soc<M>) -> RegisterRef<'_, M> {{",
            symbols.accessors[r]
        )?;
        writeln!(out, "    soc.register_for(&desc::{})", symbols.registers[r])?;
        writeln!(out, "}}")?;
    }
    Ok(())
}
