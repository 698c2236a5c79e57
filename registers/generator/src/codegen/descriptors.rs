// Licensed under the Apache-2.0 license

//! `<soc>_descriptors.rs`: one `pub static` per block, register and memory.

use super::{string_lit, Symbols, HEADER};
use crate::util::int_literal;
use regbind_model::{ArrayDescriptor, BlockKind, FieldDescriptor, SocDescriptor};
use std::fmt::Write;

pub(super) fn generate(soc: &SocDescriptor, symbols: &Symbols) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    writeln!(out, "#![allow(dead_code, unused_imports)]")?;
    writeln!(out)?;
    writeln!(
        out,
        "use regbind_runtime::desc::{{\n    AccessMode, ArrayInfo, BlockInfo, EnumInfo, FieldInfo, MemoryInfo, RegisterInfo, SocInfo,\n}};"
    )?;
    writeln!(out)?;
    writeln!(out, "pub const SOC_NAME: &str = {};", string_lit(&soc.name))?;

    for (idx, reg) in soc.registers.iter().enumerate() {
        writeln!(out)?;
        doc_comment(&mut out, &reg.description)?;
        writeln!(out, "pub static {}: RegisterInfo = RegisterInfo {{", symbols.registers[idx])?;
        writeln!(out, "    name: {},", string_lit(&reg.name))?;
        writeln!(out, "    path: {},", string_lit(&reg.path))?;
        writeln!(out, "    parent: {},", string_lit(&soc.block(reg.parent).path))?;
        writeln!(out, "    address: {},", int_literal(reg.address))?;
        writeln!(out, "    offset: {},", int_literal(reg.offset))?;
        writeln!(out, "    width: {},", reg.width)?;
        writeln!(out, "    access: AccessMode::{},", reg.access.variant_name())?;
        writeln!(out, "    volatile: {},", reg.volatile)?;
        writeln!(out, "    reset: {},", option(reg.reset))?;
        if reg.fields.is_empty() {
            writeln!(out, "    fields: &[],")?;
        } else {
            writeln!(out, "    fields: &[")?;
            for field in &reg.fields {
                field_info(&mut out, field)?;
            }
            writeln!(out, "    ],")?;
        }
        writeln!(out, "    array: {},", array_info(reg.array.as_ref()))?;
        writeln!(out, "}};")?;
    }

    for (idx, mem) in soc.memories.iter().enumerate() {
        writeln!(out)?;
        doc_comment(&mut out, &mem.description)?;
        writeln!(out, "pub static {}: MemoryInfo = MemoryInfo {{", symbols.memories[idx])?;
        writeln!(out, "    name: {},", string_lit(&mem.name))?;
        writeln!(out, "    path: {},", string_lit(&mem.path))?;
        writeln!(out, "    parent: {},", string_lit(&soc.block(mem.parent).path))?;
        writeln!(out, "    address: {},", int_literal(mem.address))?;
        writeln!(out, "    entries: {},", int_literal(mem.entries))?;
        writeln!(out, "    entry_width: {},", mem.entry_width)?;
        match mem.entry_template {
            Some(b) => writeln!(out, "    entry: Some(&{}),", symbols.blocks[b])?,
            None => writeln!(out, "    entry: None,")?,
        }
        writeln!(out, "}};")?;
    }

    for (idx, block) in soc.blocks.iter().enumerate() {
        writeln!(out)?;
        doc_comment(&mut out, &block.description)?;
        if block.kind == BlockKind::MemoryEntry {
            writeln!(out, "/// Register layout of one entry of `{}`.", block.path)?;
        }
        writeln!(out, "pub static {}: BlockInfo = BlockInfo {{", symbols.blocks[idx])?;
        writeln!(out, "    name: {},", string_lit(&block.name))?;
        writeln!(out, "    path: {},", string_lit(&block.path))?;
        match block.parent {
            Some(p) => writeln!(out, "    parent: Some({}),", string_lit(&soc.block(p).path))?,
            None => writeln!(out, "    parent: None,")?,
        }
        writeln!(out, "    address: {},", int_literal(block.address))?;
        let refs = |idents: &[String], members: &[usize]| -> String {
            let items: Vec<String> = members.iter().map(|&m| format!("&{}", idents[m])).collect();
            format!("&[{}]", items.join(", "))
        };
        writeln!(out, "    registers: {},", refs(&symbols.registers, &block.registers))?;
        writeln!(out, "    blocks: {},", refs(&symbols.blocks, &block.blocks))?;
        writeln!(out, "    memories: {},", refs(&symbols.memories, &block.memories))?;
        writeln!(out, "    array: {},", array_info(block.array.as_ref()))?;
        writeln!(out, "}};")?;
    }

    writeln!(out)?;
    writeln!(out, "pub static SOC: SocInfo = SocInfo {{")?;
    writeln!(out, "    name: SOC_NAME,")?;
    writeln!(out, "    namespace: {},", string_lit(&soc.namespace))?;
    writeln!(out, "    word_bytes: {},", soc.word_bytes)?;
    writeln!(out, "    little_endian: {},", soc.little_endian)?;
    writeln!(out, "    access_checks: {},", soc.options.access_checks)?;
    writeln!(out, "    top: &{},", symbols.blocks[soc.top])?;
    writeln!(out, "}};")?;
    Ok(out)
}

fn field_info(out: &mut String, field: &FieldDescriptor) -> std::fmt::Result {
    writeln!(out, "        FieldInfo {{")?;
    writeln!(out, "            name: {},", string_lit(&field.name))?;
    writeln!(out, "            lsb: {},", field.lsb)?;
    writeln!(out, "            width: {},", field.width())?;
    writeln!(out, "            access: AccessMode::{},", field.access.variant_name())?;
    writeln!(out, "            reset: {},", option(field.reset))?;
    if field.enum_values.is_empty() {
        writeln!(out, "            enums: &[],")?;
    } else {
        writeln!(out, "            enums: &[")?;
        for e in &field.enum_values {
            writeln!(
                out,
                "                EnumInfo {{ name: {}, value: {} }},",
                string_lit(&e.name),
                int_literal(e.value)
            )?;
        }
        writeln!(out, "            ],")?;
    }
    writeln!(out, "        }},")
}

fn array_info(array: Option<&ArrayDescriptor>) -> String {
    match array {
        None => "None".to_string(),
        Some(a) => {
            let dims: Vec<String> = a.dimensions.iter().map(|d| d.to_string()).collect();
            format!(
                "Some(ArrayInfo {{ dimensions: &[{}], count: {}, stride: {} }})",
                dims.join(", "),
                a.count,
                int_literal(a.stride)
            )
        }
    }
}

fn option(value: Option<u64>) -> String {
    value.map_or_else(|| "None".to_string(), |v| format!("Some({})", int_literal(v)))
}

fn doc_comment(out: &mut String, description: &str) -> std::fmt::Result {
    for line in description.lines().map(str::trim).filter(|l| !l.is_empty()) {
        writeln!(out, "/// {line}")?;
    }
    Ok(())
}
