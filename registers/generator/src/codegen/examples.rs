// Licensed under the Apache-2.0 license

//! Example programs under `masters/` that dump the register map through a
//! real transport.

use super::{Symbols, HEADER};
use std::fmt::Write;

pub(super) fn generate(symbols: &Symbols) -> Result<Vec<(&'static str, String)>, std::fmt::Error> {
    let mut module = String::new();
    writeln!(module, "{HEADER}")?;
    writeln!(module, "pub mod openocd_master;")?;
    writeln!(module, "pub mod ssh_devmem_master;")?;

    Ok(vec![
        ("mod.rs", module),
        ("openocd_master.rs", openocd(symbols)?),
        ("ssh_devmem_master.rs", ssh(symbols)?),
    ])
}

fn openocd(symbols: &Symbols) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    writeln!(out, "use super::super::{} as bindings;", symbols.bindings_module())?;
    writeln!(out, "use regbind_runtime::{{AccessResult, Master, OpenOcdMaster, Soc}};")?;
    writeln!(out)?;
    writeln!(out, "/// Reads every register of `{}` through OpenOCD on `host:port`.", symbols.soc)?;
    writeln!(out, "pub fn run(host: &str, port: u16) -> AccessResult<()> {{")?;
    writeln!(out, "    let master = OpenOcdMaster::connect(host, port)?;")?;
    writeln!(out, "    let mut soc = bindings::connect(master);")?;
    writeln!(out, "    dump(&mut soc)?;")?;
    writeln!(out, "    soc.into_master().close()?;")?;
    writeln!(out, "    Ok(())")?;
    writeln!(out, "}}")?;
    dump_fn(&mut out)?;
    Ok(out)
}

fn ssh(symbols: &Symbols) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "{HEADER}")?;
    writeln!(out, "use super::super::{} as bindings;", symbols.bindings_module())?;
    writeln!(out, "use regbind_runtime::{{AccessResult, Master, Soc, SshMaster}};")?;
    writeln!(out)?;
    writeln!(
        out,
        "/// Reads every register of `{}` with `devmem` on `host` over SSH.",
        symbols.soc
    )?;
    writeln!(out, "pub fn run(host: &str, user: Option<&str>) -> AccessResult<()> {{")?;
    writeln!(out, "    let mut master = SshMaster::new(host);")?;
    writeln!(out, "    if let Some(user) = user {{")?;
    writeln!(out, "        master = master.user(user);")?;
    writeln!(out, "    }}")?;
    writeln!(out, "    master.test_connection()?;")?;
    writeln!(out, "    let mut soc = bindings::connect(master);")?;
    writeln!(out, "    dump(&mut soc)")?;
    writeln!(out, "}}")?;
    dump_fn(&mut out)?;
    Ok(out)
}

fn dump_fn(out: &mut String) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "fn dump<M: Master>(soc: &mut Soc<M>) -> AccessResult<()> {{")?;
    writeln!(out, "    let paths: Vec<&'static str> = soc")?;
    writeln!(out, "        .registry()")?;
    writeln!(out, "        .registers()")?;
    writeln!(out, "        .filter(|r| r.access.is_readable())")?;
    writeln!(out, "        .map(|r| r.path)")?;
    writeln!(out, "        .collect();")?;
    writeln!(out, "    for path in paths {{")?;
    writeln!(out, "        let value = soc.reg(path)?.read()?;")?;
    writeln!(out, "        println!(\"{{path}} = {{:#x}}\", value.value());")?;
    writeln!(out, "    }}")?;
    writeln!(out, "    Ok(())")?;
    writeln!(out, "}}")
}
