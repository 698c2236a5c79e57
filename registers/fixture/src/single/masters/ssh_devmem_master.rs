// Licensed under the Apache-2.0 license
//
// Generated by regbind-generator. Do not edit.

use super::super::uart_bindings as bindings;
use regbind_runtime::{AccessResult, Master, Soc, SshMaster};

/// Reads every register of `uart` with `devmem` on `host` over SSH.
pub fn run(host: &str, user: Option<&str>) -> AccessResult<()> {
    let mut master = SshMaster::new(host);
    if let Some(user) = user {
        master = master.user(user);
    }
    master.test_connection()?;
    let mut soc = bindings::connect(master);
    dump(&mut soc)
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
