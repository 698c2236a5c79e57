// Licensed under the Apache-2.0 license

use super::{check_width, width_mask, Master};
use crate::error::TransportResult;
use log::trace;
use std::collections::BTreeMap;

/// Sparse in-memory bus. Unwritten addresses read as zero.
#[derive(Clone, Debug, Default)]
pub struct MockMaster {
    memory: BTreeMap<u64, u64>,
}

impl MockMaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every write.
    pub fn reset(&mut self) {
        self.memory.clear();
    }

    /// Raw stored value, without going through a bus access.
    pub fn peek(&self, address: u64) -> Option<u64> {
        self.memory.get(&address).copied()
    }
}

impl Master for MockMaster {
    fn read(&mut self, address: u64, width_bytes: usize) -> TransportResult<u64> {
        check_width(width_bytes)?;
        let value = self.memory.get(&address).copied().unwrap_or(0) & width_mask(width_bytes);
        trace!("mock read {address:#x} -> {value:#x}");
        Ok(value)
    }

    fn write(&mut self, address: u64, value: u64, width_bytes: usize) -> TransportResult<()> {
        check_width(width_bytes)?;
        let value = value & width_mask(width_bytes);
        trace!("mock write {address:#x} <- {value:#x}");
        self.memory.insert(address, value);
        Ok(())
    }
}
