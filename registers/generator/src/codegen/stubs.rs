// Licensed under the Apache-2.0 license

//! `<soc>.h`: addresses, widths, masks and shifts as C preprocessor
//! definitions for tooling outside Rust.

use super::Symbols;
use regbind_model::SocDescriptor;
use std::fmt::Write;

pub(super) fn generate(soc: &SocDescriptor, symbols: &Symbols) -> Result<String, std::fmt::Error> {
    let prefix = symbols.soc.to_ascii_uppercase();
    let guard = format!("{prefix}_REGS_H");
    let mut out = String::new();
    writeln!(out, "// Licensed under the Apache-2.0 license")?;
    writeln!(out, "//")?;
    writeln!(out, "// Generated by regbind-generator. Do not edit.")?;
    writeln!(out)?;
    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}")?;

    for &r in &symbols.bound {
        let reg = soc.register(r);
        let name = format!("{prefix}_{}", symbols.registers[r]);
        writeln!(out)?;
        writeln!(out, "/* {} ({}) */", reg.path, reg.access)?;
        writeln!(out, "#define {name}_ADDR {:#x}ull", reg.address)?;
        writeln!(out, "#define {name}_WIDTH {}u", reg.width)?;
        if let Some(reset) = reg.reset {
            writeln!(out, "#define {name}_RESET {reset:#x}ull")?;
        }
        if let Some(array) = &reg.array {
            writeln!(out, "#define {name}_COUNT {}u", array.count)?;
            writeln!(out, "#define {name}_STRIDE {:#x}u", array.stride)?;
        }
        for field in &reg.fields {
            let field_name = format!("{name}_{}", crate::util::upper_snake(&field.name));
            writeln!(out, "#define {field_name}_SHIFT {}u", field.lsb)?;
            writeln!(out, "#define {field_name}_MASK {:#x}ull", field.mask())?;
        }
    }

    for &m in &symbols.bound_memories {
        let mem = soc.memory(m);
        let name = format!("{prefix}_{}", symbols.memories[m]);
        writeln!(out)?;
        writeln!(out, "/* {} */", mem.path)?;
        writeln!(out, "#define {name}_ADDR {:#x}ull", mem.address)?;
        writeln!(out, "#define {name}_ENTRIES {}u", mem.entries)?;
        writeln!(out, "#define {name}_ENTRY_WIDTH {}u", mem.entry_width)?;
        writeln!(out, "#define {name}_SIZE {:#x}ull", mem.extent())?;
    }

    writeln!(out)?;
    writeln!(out, "#endif /* {guard} */")?;
    Ok(out)
}
