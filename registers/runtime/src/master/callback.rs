// Licensed under the Apache-2.0 license

use super::{check_width, Master};
use crate::error::{TransportError, TransportResult};

type ReadFn = Box<dyn FnMut(u64, usize) -> TransportResult<u64> + Send>;
type WriteFn = Box<dyn FnMut(u64, u64, usize) -> TransportResult<()> + Send>;

/// Forwards every transaction to caller-supplied closures.
#[derive(Default)]
pub struct CallbackMaster {
    read: Option<ReadFn>,
    write: Option<WriteFn>,
}

impl CallbackMaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_read(
        mut self,
        f: impl FnMut(u64, usize) -> TransportResult<u64> + Send + 'static,
    ) -> Self {
        self.read = Some(Box::new(f));
        self
    }

    pub fn on_write(
        mut self,
        f: impl FnMut(u64, u64, usize) -> TransportResult<()> + Send + 'static,
    ) -> Self {
        self.write = Some(Box::new(f));
        self
    }
}

impl Master for CallbackMaster {
    fn read(&mut self, address: u64, width_bytes: usize) -> TransportResult<u64> {
        check_width(width_bytes)?;
        let read = self
            .read
            .as_mut()
            .ok_or(TransportError::NotConfigured("read"))?;
        read(address, width_bytes)
    }

    fn write(&mut self, address: u64, value: u64, width_bytes: usize) -> TransportResult<()> {
        check_width(width_bytes)?;
        let write = self
            .write
            .as_mut()
            .ok_or(TransportError::NotConfigured("write"))?;
        write(address, value, width_bytes)
    }
}
