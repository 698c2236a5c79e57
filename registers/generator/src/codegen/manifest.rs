// Licensed under the Apache-2.0 license

//! `mod.rs` and `<soc>_sources.toml`.

use super::HEADER;
use crate::error::ExportResult;
use crate::output::GeneratedUnits;
use regbind_model::SocDescriptor;
use serde::Serialize;
use std::fmt::Write;

pub(super) fn module_file(modules: &[String]) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    for module in modules {
        writeln!(out, "pub mod {module};")?;
    }
    Ok(out)
}

#[derive(Serialize)]
struct Sources<'a> {
    soc: &'a str,
    namespace: &'a str,
    units: Vec<Unit>,
}

#[derive(Serialize)]
struct Unit {
    path: String,
    kind: &'static str,
}

/// Lists every unit generated so far, in path order.
pub(super) fn sources_file(soc: &SocDescriptor, units: &GeneratedUnits) -> ExportResult<String> {
    let sources = Sources {
        soc: &soc.name,
        namespace: &soc.namespace,
        units: units
            .paths()
            .map(|p| {
                let path = p.to_string_lossy().replace('\\', "/");
                let kind = kind(&path);
                Unit { path, kind }
            })
            .collect(),
    };
    let mut out = String::from("# Licensed under the Apache-2.0 license\n#\n# Generated by regbind-generator. Do not edit.\n\n");
    out.push_str(&toml::to_string(&sources)?);
    Ok(out)
}

fn kind(path: &str) -> &'static str {
    if path.starts_with("masters/") {
        "example"
    } else if path == "mod.rs" {
        "module"
    } else if path.ends_with("_descriptors.rs") {
        "descriptors"
    } else if path.ends_with("_bindings.rs") {
        "bindings"
    } else if path.contains("_bindings_") {
        "chunk"
    } else if path.ends_with(".h") {
        "stub"
    } else if path.ends_with("_ir.json") {
        "ir"
    } else {
        "other"
    }
}
