// Licensed under the Apache-2.0 license

//! Register and memory accessors bound to a [`Master`].

use crate::desc::{FieldInfo, MemoryInfo, RegisterInfo};
use crate::error::{AccessError, AccessResult};
use crate::master::Master;
use crate::registry::Registry;
use crate::value::{FieldValue, RegisterValue, WriteValue};
use log::{debug, trace};
use regbind_model::bitfield;

/// A register map bound to a transport.
pub struct Soc<M: Master> {
    master: M,
    registry: Registry,
    access_checks: bool,
}

impl<M: Master> Soc<M> {
    pub fn new(master: M, registry: Registry) -> Self {
        let access_checks = registry.soc().access_checks;
        Self {
            master,
            registry,
            access_checks,
        }
    }

    /// Refuses writes to read-only and clear-on-read registers and fields.
    pub fn with_access_checks(mut self, enabled: bool) -> Self {
        self.access_checks = enabled;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn master_mut(&mut self) -> &mut M {
        &mut self.master
    }

    pub fn into_master(self) -> M {
        self.master
    }

    /// Register by full path or by path relative to the top block.
    pub fn reg(&mut self, path: &str) -> AccessResult<RegisterRef<'_, M>> {
        let info = self.registry.register(path)?;
        Ok(self.register_for(info))
    }

    pub fn register_for(&mut self, info: &'static RegisterInfo) -> RegisterRef<'_, M> {
        RegisterRef {
            master: &mut self.master,
            info,
            address: info.address,
            access_checks: self.access_checks,
        }
    }

    /// Register `name` inside element `index` of an arrayed block.
    pub fn array_reg(
        &mut self,
        block_path: &str,
        index: u64,
        name: &str,
    ) -> AccessResult<RegisterRef<'_, M>> {
        let block = self.registry.block(block_path)?;
        let (count, stride) = block.array.map_or((1, 0), |a| (a.count, a.stride));
        if index >= count {
            return Err(AccessError::IndexOutOfRange {
                target: block.path.to_string(),
                index,
                count,
            });
        }
        let info = block
            .register(name)
            .ok_or_else(|| AccessError::UnknownMember(format!("{}.{name}", block.path)))?;
        let mut reg = self.register_for(info);
        reg.address += index * stride;
        Ok(reg)
    }

    pub fn memory(&mut self, path: &str) -> AccessResult<MemoryRef<'_, M>> {
        let info = self.registry.memory(path)?;
        Ok(MemoryRef {
            master: &mut self.master,
            info,
        })
    }

    /// Writes the reset value of every writable register that has one.
    /// Returns the number of registers written.
    pub fn reset_to_defaults(&mut self) -> AccessResult<usize> {
        let registers: Vec<&'static RegisterInfo> = self
            .registry
            .registers()
            .filter(|r| r.reset.is_some() && r.access.is_writable())
            .collect();
        let mut written = 0;
        for info in registers {
            let count = info.array.map_or(1, |a| a.count);
            for i in 0..count {
                self.register_for(info)
                    .element(i)?
                    .write(info.reset.unwrap_or(0))?;
                written += 1;
            }
        }
        debug!("Reset {written} registers to defaults");
        Ok(written)
    }
}

/// One register (or one element of a register array) on the bus.
pub struct RegisterRef<'a, M: Master> {
    master: &'a mut M,
    info: &'static RegisterInfo,
    address: u64,
    access_checks: bool,
}

impl<'a, M: Master> RegisterRef<'a, M> {
    pub fn info(&self) -> &'static RegisterInfo {
        self.info
    }

    pub fn address(&self) -> u64 {
        self.address
    }

    /// Element `index` of a register array. Element 0 is the register
    /// itself, so this also works on plain registers.
    pub fn element(self, index: u64) -> AccessResult<Self> {
        let (count, stride) = self.info.array.map_or((1, 0), |a| (a.count, a.stride));
        if index >= count {
            return Err(AccessError::IndexOutOfRange {
                target: self.info.path.to_string(),
                index,
                count,
            });
        }
        Ok(Self {
            address: self.info.address + index * stride,
            ..self
        })
    }

    pub fn read(&mut self) -> AccessResult<RegisterValue> {
        let raw = self.master.read(self.address, self.info.access_bytes())?;
        trace!("{} @ {:#x} -> {raw:#x}", self.info.path, self.address);
        Ok(RegisterValue::from_info(self.info, raw, self.address))
    }

    pub fn read_field(&mut self, name: &str) -> AccessResult<FieldValue> {
        self.read()?.get_field(name)
    }

    /// Writes an integer, a previously read register value, or a single
    /// field. Field writes preserve every other bit of the register.
    ///
    /// A field value must have been read from this register (or element)
    /// and must name one of its writable fields.
    pub fn write(&mut self, value: impl Into<WriteValue>) -> AccessResult<()> {
        match value.into() {
            WriteValue::Plain(v) | WriteValue::Register(v) => self.write_register(v),
            WriteValue::Field(f) => {
                check_field_target(self.info, self.address, self.access_checks, &f)?;
                self.write_field_value(f)
            }
        }
    }

    pub fn write_field(&mut self, name: &str, value: u64) -> AccessResult<()> {
        let field = writable_field(self.info, self.access_checks, name)?;
        self.write_field_value(FieldValue::new(value, field.lsb, field.width, self.address))
    }

    /// Writes the named value `enumerator` into field `name`.
    pub fn write_field_enum(&mut self, name: &str, enumerator: &str) -> AccessResult<()> {
        let field = writable_field(self.info, self.access_checks, name)?;
        let value = enum_value(self.info, field, enumerator)?;
        self.write_field_value(FieldValue::new(value, field.lsb, field.width, self.address))
    }

    /// Sets field `name` to the union of `flags`; flags not listed are cleared.
    pub fn write_field_flags(&mut self, name: &str, flags: &[&str]) -> AccessResult<()> {
        let field = writable_field(self.info, self.access_checks, name)?;
        let mut value = 0;
        for flag in flags {
            value |= enum_value(self.info, field, flag)?;
        }
        self.write_field_value(FieldValue::new(value, field.lsb, field.width, self.address))
    }

    /// Read-modify-write setting every bit in `mask`.
    pub fn set_bits(&mut self, mask: u64) -> AccessResult<()> {
        self.update(|existing| existing | mask)
    }

    /// Read-modify-write clearing every bit in `mask`.
    pub fn clear_bits(&mut self, mask: u64) -> AccessResult<()> {
        self.update(|existing| existing & !mask)
    }

    /// Updates several fields with one read and one write. Every name is
    /// checked before the bus is touched.
    pub fn modify(&mut self, updates: &[(&str, u64)]) -> AccessResult<()> {
        let fields = updates
            .iter()
            .map(|&(name, value)| {
                writable_field(self.info, self.access_checks, name).map(|f| (f, value))
            })
            .collect::<AccessResult<Vec<_>>>()?;
        self.update(|existing| {
            fields
                .iter()
                .fold(existing, |acc, (f, v)| bitfield::insert(acc, f.lsb, f.width, *v))
        })
    }

    /// Runs `f` against a cached copy of the register and writes the result
    /// back once, if `f` changed anything and returned `Ok`.
    ///
    /// The cache starts from the hardware value for read-write registers and
    /// from zero otherwise, so clear-on-write bits are never written back.
    pub fn batch<T>(
        &mut self,
        f: impl FnOnce(&mut CachedRegister) -> AccessResult<T>,
    ) -> AccessResult<T> {
        self.check_writable()?;
        let bytes = self.info.access_bytes();
        let initial = if bitfield::requires_read_before_write(self.info.access) {
            self.master.read(self.address, bytes)?
        } else {
            0
        };
        let mut cached = CachedRegister {
            info: self.info,
            address: self.address,
            access_checks: self.access_checks,
            value: initial & bitfield::mask(0, self.info.width),
            dirty: false,
        };
        let out = f(&mut cached)?;
        if cached.dirty {
            trace!(
                "{} @ {:#x} <- {:#x} (batched)",
                self.info.path,
                self.address,
                cached.value
            );
            self.master.write(self.address, cached.value, bytes)?;
        }
        Ok(out)
    }

    fn check_writable(&self) -> AccessResult<()> {
        if self.access_checks && !self.info.access.is_writable() {
            return Err(AccessError::AccessPolicy {
                target: self.info.path.to_string(),
                mode: self.info.access,
            });
        }
        Ok(())
    }

    fn update(&mut self, f: impl FnOnce(u64) -> u64) -> AccessResult<()> {
        self.check_writable()?;
        let bytes = self.info.access_bytes();
        let existing = self.master.read(self.address, bytes)?;
        let value = f(existing) & bitfield::mask(0, self.info.width);
        trace!("{} @ {:#x} <- {value:#x}", self.info.path, self.address);
        self.master.write(self.address, value, bytes)?;
        Ok(())
    }

    fn write_register(&mut self, incoming: u64) -> AccessResult<()> {
        self.check_writable()?;
        let mode = self.info.access;
        let bytes = self.info.access_bytes();
        let incoming = incoming & bitfield::mask(0, self.info.width);
        let existing = if bitfield::requires_read_before_write(mode) {
            self.master.read(self.address, bytes)?
        } else {
            0
        };
        let value = bitfield::combine(mode, incoming, existing);
        trace!(
            "{} @ {:#x} <- {value:#x} (strobe {:#x})",
            self.info.path,
            self.address,
            self.info.byte_enable()
        );
        self.master.write(self.address, value, bytes)?;
        Ok(())
    }

    fn write_field_value(&mut self, field: FieldValue) -> AccessResult<()> {
        trace!(
            "{} field bits {}..={} <- {:#x}",
            self.info.path,
            field.lsb(),
            field.msb(),
            field.value()
        );
        self.update(|existing| field.apply(existing))
    }
}

/// Register contents held in memory while a [`RegisterRef::batch`] runs.
/// Reads and writes touch only the cache.
pub struct CachedRegister {
    info: &'static RegisterInfo,
    address: u64,
    access_checks: bool,
    value: u64,
    dirty: bool,
}

impl CachedRegister {
    pub fn info(&self) -> &'static RegisterInfo {
        self.info
    }

    pub fn read(&self) -> RegisterValue {
        RegisterValue::from_info(self.info, self.value, self.address)
    }

    pub fn read_field(&self, name: &str) -> AccessResult<FieldValue> {
        self.read().get_field(name)
    }

    pub fn write(&mut self, value: impl Into<WriteValue>) -> AccessResult<()> {
        match value.into() {
            WriteValue::Plain(v) | WriteValue::Register(v) => self.store(v),
            WriteValue::Field(f) => {
                check_field_target(self.info, self.address, self.access_checks, &f)?;
                self.store(f.apply(self.value));
            }
        }
        Ok(())
    }

    pub fn write_field(&mut self, name: &str, value: u64) -> AccessResult<()> {
        let field = writable_field(self.info, self.access_checks, name)?;
        self.store(bitfield::insert(self.value, field.lsb, field.width, value));
        Ok(())
    }

    pub fn write_field_enum(&mut self, name: &str, enumerator: &str) -> AccessResult<()> {
        let field = writable_field(self.info, self.access_checks, name)?;
        let value = enum_value(self.info, field, enumerator)?;
        self.store(bitfield::insert(self.value, field.lsb, field.width, value));
        Ok(())
    }

    pub fn set_bits(&mut self, mask: u64) {
        self.store(self.value | mask);
    }

    pub fn clear_bits(&mut self, mask: u64) {
        self.store(self.value & !mask);
    }

    fn store(&mut self, value: u64) {
        self.value = value & bitfield::mask(0, self.info.width);
        self.dirty = true;
    }
}

/// Field `name` of `info`, refused if access checks are on and software
/// cannot write it.
fn writable_field(
    info: &'static RegisterInfo,
    access_checks: bool,
    name: &str,
) -> AccessResult<&'static FieldInfo> {
    let field = info.field(name).ok_or_else(|| AccessError::UnknownField {
        register: info.path.to_string(),
        field: name.to_string(),
    })?;
    if access_checks && !field.access.is_writable() {
        return Err(AccessError::AccessPolicy {
            target: format!("{}.{}", info.path, field.name),
            mode: field.access,
        });
    }
    Ok(field)
}

fn enum_value(info: &RegisterInfo, field: &FieldInfo, enumerator: &str) -> AccessResult<u64> {
    field
        .enum_value(enumerator)
        .ok_or_else(|| AccessError::UnknownEnum {
            field: format!("{}.{}", info.path, field.name),
            name: enumerator.to_string(),
        })
}

/// A [`FieldValue`] may only be written back where it was read from, and
/// only onto a declared field that is writable.
fn check_field_target(
    info: &'static RegisterInfo,
    address: u64,
    access_checks: bool,
    value: &FieldValue,
) -> AccessResult<()> {
    if value.offset() != address {
        return Err(AccessError::FieldMismatch {
            register: info.path.to_string(),
            address,
            field_address: value.offset(),
        });
    }
    if info.fields.is_empty() {
        return Ok(());
    }
    let field = info
        .fields
        .iter()
        .find(|f| f.lsb == value.lsb() && f.width == value.width())
        .ok_or_else(|| AccessError::UnknownField {
            register: info.path.to_string(),
            field: format!("bits {}..={}", value.lsb(), value.msb()),
        })?;
    if access_checks && !field.access.is_writable() {
        return Err(AccessError::AccessPolicy {
            target: format!("{}.{}", info.path, field.name),
            mode: field.access,
        });
    }
    Ok(())
}

/// A memory region addressed by entry index.
pub struct MemoryRef<'a, M: Master> {
    master: &'a mut M,
    info: &'static MemoryInfo,
}

impl<M: Master> MemoryRef<'_, M> {
    pub fn info(&self) -> &'static MemoryInfo {
        self.info
    }

    fn entry_address(&self, index: u64) -> AccessResult<u64> {
        if index >= self.info.entries {
            return Err(AccessError::IndexOutOfRange {
                target: self.info.path.to_string(),
                index,
                count: self.info.entries,
            });
        }
        Ok(self.info.address + index * self.info.entry_bytes() as u64)
    }

    pub fn read_entry(&mut self, index: u64) -> AccessResult<u64> {
        let address = self.entry_address(index)?;
        let bytes = self.info.entry_bytes();
        Ok(self.master.read(address, bytes)? & bitfield::mask(0, self.info.entry_width))
    }

    pub fn write_entry(&mut self, index: u64, value: u64) -> AccessResult<()> {
        let address = self.entry_address(index)?;
        let bytes = self.info.entry_bytes();
        self.master
            .write(address, value & bitfield::mask(0, self.info.entry_width), bytes)?;
        Ok(())
    }
}
