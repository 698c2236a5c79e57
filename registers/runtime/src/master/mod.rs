// Licensed under the Apache-2.0 license

//! Transport backends.
//!
//! A [`Master`] performs single, blocking bus transactions. It knows nothing
//! about registers; callers pass a byte address and an access width.

mod callback;
mod mock;
mod openocd;
mod ssh;

pub use callback::CallbackMaster;
pub use mock::MockMaster;
pub use openocd::OpenOcdMaster;
pub use ssh::{SshMaster, SshTool};

use crate::error::{TransportError, TransportResult};

pub trait Master {
    fn read(&mut self, address: u64, width_bytes: usize) -> TransportResult<u64>;

    fn write(&mut self, address: u64, value: u64, width_bytes: usize) -> TransportResult<()>;
}

impl<M: Master + ?Sized> Master for &mut M {
    fn read(&mut self, address: u64, width_bytes: usize) -> TransportResult<u64> {
        (**self).read(address, width_bytes)
    }

    fn write(&mut self, address: u64, value: u64, width_bytes: usize) -> TransportResult<()> {
        (**self).write(address, value, width_bytes)
    }
}

impl<M: Master + ?Sized> Master for Box<M> {
    fn read(&mut self, address: u64, width_bytes: usize) -> TransportResult<u64> {
        (**self).read(address, width_bytes)
    }

    fn write(&mut self, address: u64, value: u64, width_bytes: usize) -> TransportResult<()> {
        (**self).write(address, value, width_bytes)
    }
}

/// Rejects widths the transports cannot express.
pub(crate) fn check_width(width_bytes: usize) -> TransportResult<()> {
    match width_bytes {
        1 | 2 | 4 | 8 => Ok(()),
        _ => Err(TransportError::UnsupportedWidth(width_bytes)),
    }
}

pub(crate) fn width_mask(width_bytes: usize) -> u64 {
    regbind_model::bitfield::mask(0, width_bytes as u32 * 8)
}

/// Parses `0x`-prefixed hex or plain decimal.
pub(crate) fn parse_number(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}
