// Licensed under the Apache-2.0 license
//
// Generated by regbind-generator. Do not edit.

use super::uart_descriptors as desc;
use regbind_runtime::{AccessResult, Master, Registry, Soc};
pub use super::uart_bindings_0::*;
pub use super::uart_bindings_1::*;
pub use super::uart_bindings_2::*;

/// Registers every descriptor of `uart`.
pub fn bind(registry: &mut Registry) {
    registry.add_block(&desc::CHAN);
    registry.add_memory(&desc::SRAM);
    bind_chunk_0(registry);
    bind_chunk_1(registry);
    bind_chunk_2(registry);
}

pub fn registry() -> Registry {
    let mut registry = Registry::new(&desc::SOC);
    bind(&mut registry);
    registry
}

pub fn connect<M: Master>(master: M) -> Soc<M> {
    Soc::new(master, registry())
}

/// Writes the reset value of every writable register that has one.
pub fn reset_to_defaults<M: Master>(soc: &mut Soc<M>) -> AccessResult<()> {
    ctrl(soc).write(3_u64)?;
    for i in 0..4 {
        fifo(soc).element(i)?.write(0xaa_u64)?;
    }
    chan_cfg(soc).write(1_u64)?;
    Ok(())
}
