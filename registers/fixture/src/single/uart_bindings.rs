// Licensed under the Apache-2.0 license
//
// Generated by regbind-generator. Do not edit.

use super::uart_descriptors as desc;
use regbind_runtime::{AccessResult, Master, RegisterRef, Registry, Soc};

/// Registers every descriptor of `uart`.
pub fn bind(registry: &mut Registry) {
    registry.add_block(&desc::CHAN);
    registry.add_memory(&desc::SRAM);
    registry.add_register(&desc::CTRL);
    registry.add_register(&desc::STATUS);
    registry.add_register(&desc::FIFO);
    registry.add_register(&desc::CHAN_CFG);
    registry.add_register(&desc::CHAN_LEN);
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

/// `uart.CTRL` at 0x0.
pub fn ctrl<M: Master>(soc: &mut Soc<M>) -> RegisterRef<'_, M> {
    soc.register_for(&desc::CTRL)
}

/// `uart.STATUS` at 0x4.
pub fn status<M: Master>(soc: &mut Soc<M>) -> RegisterRef<'_, M> {
    soc.register_for(&desc::STATUS)
}

/// `uart.FIFO` at 0x10.
pub fn fifo<M: Master>(soc: &mut Soc<M>) -> RegisterRef<'_, M> {
    soc.register_for(&desc::FIFO)
}

/// `uart.chan.CFG` at 0x100.
pub fn chan_cfg<M: Master>(soc: &mut Soc<M>) -> RegisterRef<'_, M> {
    soc.register_for(&desc::CHAN_CFG)
}

/// `uart.chan.LEN` at 0x104.
pub fn chan_len<M: Master>(soc: &mut Soc<M>) -> RegisterRef<'_, M> {
    soc.register_for(&desc::CHAN_LEN)
}
