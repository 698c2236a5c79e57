// Licensed under the Apache-2.0 license
//
// Generated by regbind-generator. Do not edit.

use super::super::uart_bindings as bindings;
use regbind_runtime::{AccessResult, Master, OpenOcdMaster, Soc};

/// Reads every register of `uart` through OpenOCD on `host:port`.
pub fn run(host: &str, port: u16) -> AccessResult<()> {
    let master = OpenOcdMaster::connect(host, port)?;
    let mut soc = bindings::connect(master);
    dump(&mut soc)?;
    soc.into_master().close()?;
    Ok(())
}

fn dump<M: Master>(soc: &mut Soc<M>) -> AccessResult<()> {
    let paths: Vec<&'static str> = soc
        .registry()
        .registers()
        .filter(|r| r.access.is_readable())
        .map(|r| r.path)
        .collect();
    for path in paths {
        let value = soc.reg(path)?.read()?;
        println!("{path} = {:#x}", value.value());
    }
    Ok(())
}
