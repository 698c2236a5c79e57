// Licensed under the Apache-2.0 license
//
// Generated by regbind-generator. Do not edit.

// Chunk 1: registers 2..4, 2 registers.

use super::uart_descriptors as desc;
use regbind_runtime::{Master, RegisterRef, Registry, Soc};

pub fn bind_chunk_1(registry: &mut Registry) {
    registry.add_register(&desc::FIFO);
    registry.add_register(&desc::CHAN_CFG);
}

/// `uart.FIFO` at 0x10.
pub fn fifo<M: Master>(soc: &mut Soc<M>) -> RegisterRef<'_, M> {
    soc.register_for(&desc::FIFO)
}

/// `uart.chan.CFG` at 0x100.
pub fn chan_cfg<M: Master>(soc: &mut Soc<M>) -> RegisterRef<'_, M> {
    soc.register_for(&desc::CHAN_CFG)
}
