// Licensed under the Apache-2.0 license
//
// Generated by regbind-generator. Do not edit.

// Chunk 0: top_level, 3 registers.

use super::uart_descriptors as desc;
use regbind_runtime::{Master, RegisterRef, Registry, Soc};

pub fn bind_chunk_0(registry: &mut Registry) {
    registry.add_register(&desc::CTRL);
    registry.add_register(&desc::STATUS);
    registry.add_register(&desc::FIFO);
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
