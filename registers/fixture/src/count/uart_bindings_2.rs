// Licensed under the Apache-2.0 license
//
// Generated by regbind-generator. Do not edit.

// Chunk 2: registers 4..5, 1 registers.

use super::uart_descriptors as desc;
use regbind_runtime::{Master, RegisterRef, Registry, Soc};

pub fn bind_chunk_2(registry: &mut Registry) {
    registry.add_register(&desc::CHAN_LEN);
}

/// `uart.chan.LEN` at 0x104.
pub fn chan_len<M: Master>(soc: &mut Soc<M>) -> RegisterRef<'_, M> {
    soc.register_for(&desc::CHAN_LEN)
}
