// Licensed under the Apache-2.0 license

//! Integers that remember where they came from.
//!
//! A [`FieldValue`] read out of a register knows its bit position and the
//! register address, so writing it back only touches that field. Doing
//! arithmetic on it gives a plain `u64`, which carries no position and is
//! written as a whole-register value.
//!
//! Fields declared with named values decode them as well. A field whose
//! values are single bits can be read as a set of flags.

use crate::desc::{EnumInfo, RegisterInfo};
use crate::error::{AccessError, AccessResult};
use regbind_model::bitfield;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Mul, Shl, Shr, Sub};

//=============================================================================
// FieldValue
//=============================================================================

#[derive(Clone, Copy, Debug)]
pub struct FieldValue {
    value: u64,
    lsb: u32,
    width: u32,
    offset: u64,
    enums: &'static [EnumInfo],
}

impl FieldValue {
    /// `value` is truncated to `width` bits.
    pub fn new(value: u64, lsb: u32, width: u32, offset: u64) -> Self {
        Self {
            value: value & bitfield::mask(0, width),
            lsb,
            width,
            offset,
            enums: &[],
        }
    }

    /// Attaches the named values the field declares.
    pub fn with_enums(mut self, enums: &'static [EnumInfo]) -> Self {
        self.enums = enums;
        self
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn lsb(&self) -> u32 {
        self.lsb
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn msb(&self) -> u32 {
        self.lsb + self.width - 1
    }

    /// Address of the register the field belongs to.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn mask(&self) -> u64 {
        bitfield::mask(self.lsb, self.width)
    }

    /// Same field, different value.
    pub fn with_value(&self, value: u64) -> Self {
        Self::new(value, self.lsb, self.width, self.offset).with_enums(self.enums)
    }

    /// Same field, set to the enumerator called `name`.
    pub fn with_enum(&self, name: &str) -> Option<Self> {
        self.enums
            .iter()
            .find(|e| e.name == name)
            .map(|e| self.with_value(e.value))
    }

    /// Name of the enumerator equal to the current value.
    pub fn enum_name(&self) -> Option<&'static str> {
        self.enums
            .iter()
            .find(|e| e.value == self.value)
            .map(|e| e.name)
    }

    pub fn is(&self, name: &str) -> bool {
        self.enum_name() == Some(name)
    }

    /// Names of the non-zero enumerators whose bits are all set.
    pub fn flags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.enums
            .iter()
            .filter(|e| e.value != 0 && self.value & e.value == e.value)
            .map(|e| e.name)
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags().any(|f| f == name)
    }

    /// `existing` with this field's bits replaced.
    pub fn apply(&self, existing: u64) -> u64 {
        bitfield::insert(existing, self.lsb, self.width, self.value)
    }
}

impl From<FieldValue> for u64 {
    fn from(f: FieldValue) -> u64 {
        f.value
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl PartialEq<u64> for FieldValue {
    fn eq(&self, other: &u64) -> bool {
        self.value == *other
    }
}

impl PartialEq<FieldValue> for u64 {
    fn eq(&self, other: &FieldValue) -> bool {
        *self == other.value
    }
}

impl PartialOrd<u64> for FieldValue {
    fn partial_cmp(&self, other: &u64) -> Option<Ordering> {
        self.value.partial_cmp(other)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

impl fmt::LowerHex for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

/// Arithmetic drops the field metadata.
macro_rules! plain_ops {
    ($($trait:ident $method:ident),* $(,)?) => {$(
        impl $trait<u64> for FieldValue {
            type Output = u64;
            fn $method(self, rhs: u64) -> u64 {
                $trait::$method(self.value, rhs)
            }
        }
        impl $trait<FieldValue> for FieldValue {
            type Output = u64;
            fn $method(self, rhs: FieldValue) -> u64 {
                $trait::$method(self.value, rhs.value)
            }
        }
        impl $trait<FieldValue> for u64 {
            type Output = u64;
            fn $method(self, rhs: FieldValue) -> u64 {
                $trait::$method(self, rhs.value)
            }
        }
    )*};
}

plain_ops!(Add add, Sub sub, Mul mul, BitAnd bitand, BitOr bitor, BitXor bitxor);

impl Shl<u32> for FieldValue {
    type Output = u64;
    fn shl(self, rhs: u32) -> u64 {
        self.value << rhs
    }
}

impl Shr<u32> for FieldValue {
    type Output = u64;
    fn shr(self, rhs: u32) -> u64 {
        self.value >> rhs
    }
}

//=============================================================================
// RegisterValue
//=============================================================================

/// A register value with its fields decoded once, at construction.
#[derive(Clone, Debug)]
pub struct RegisterValue {
    register: String,
    value: u64,
    offset: u64,
    width: u32,
    fields: BTreeMap<String, FieldValue>,
}

impl RegisterValue {
    /// Decodes `value`, truncated to `width` bits, using `(name, lsb, width)`
    /// field definitions.
    pub fn new<'a>(
        register: impl Into<String>,
        value: u64,
        offset: u64,
        width: u32,
        fields: impl IntoIterator<Item = (&'a str, u32, u32)>,
    ) -> Self {
        let value = value & bitfield::mask(0, width);
        let fields = fields
            .into_iter()
            .map(|(name, lsb, field_width)| {
                (
                    name.to_string(),
                    FieldValue::new(
                        bitfield::extract(value, lsb, field_width),
                        lsb,
                        field_width,
                        offset,
                    ),
                )
            })
            .collect();
        Self {
            register: register.into(),
            value,
            offset,
            width,
            fields,
        }
    }

    pub fn from_info(info: &RegisterInfo, value: u64, address: u64) -> Self {
        let mut decoded = Self::new(
            info.path,
            value,
            address,
            info.width,
            info.fields.iter().map(|f| (f.name, f.lsb, f.width)),
        );
        for field in info.fields.iter().filter(|f| !f.enums.is_empty()) {
            if let Some(v) = decoded.fields.get_mut(field.name) {
                *v = v.with_enums(field.enums);
            }
        }
        decoded
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn width_bytes(&self) -> usize {
        bitfield::byte_width(self.width)
    }

    /// Looks up a decoded field. Names beginning with `_` are reserved and
    /// never resolve.
    pub fn get_field(&self, name: &str) -> AccessResult<FieldValue> {
        if name.starts_with('_') {
            return Err(self.unknown(name));
        }
        self.fields.get(name).copied().ok_or_else(|| self.unknown(name))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), *v))
    }

    fn unknown(&self, name: &str) -> AccessError {
        AccessError::UnknownField {
            register: self.register.clone(),
            field: name.to_string(),
        }
    }
}

impl From<RegisterValue> for u64 {
    fn from(r: RegisterValue) -> u64 {
        r.value
    }
}

impl PartialEq<u64> for RegisterValue {
    fn eq(&self, other: &u64) -> bool {
        self.value == *other
    }
}

impl fmt::LowerHex for RegisterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

//=============================================================================
// WriteValue
//=============================================================================

/// What a register write was handed.
#[derive(Clone, Debug)]
pub enum WriteValue {
    /// Whole-register value.
    Plain(u64),
    /// Single field; the rest of the register is preserved.
    Field(FieldValue),
    /// Whole-register value read earlier.
    Register(u64),
}

impl From<u64> for WriteValue {
    fn from(v: u64) -> Self {
        WriteValue::Plain(v)
    }
}

impl From<FieldValue> for WriteValue {
    fn from(f: FieldValue) -> Self {
        WriteValue::Field(f)
    }
}

impl From<RegisterValue> for WriteValue {
    fn from(r: RegisterValue) -> Self {
        WriteValue::Register(r.value)
    }
}

impl From<&RegisterValue> for WriteValue {
    fn from(r: &RegisterValue) -> Self {
        WriteValue::Register(r.value)
    }
}
