// Licensed under the Apache-2.0 license

//! Register map intermediate representation.
//!
//! ## Module Organization
//!
//! - [`access`]: software access modes ([`AccessMode`])
//! - [`bitfield`]: mask/extract/combine arithmetic used on every access
//! - [`types`]: the descriptor arena ([`SocDescriptor`] and friends)
//! - [`dump`]: JSON rendering of the IR

pub mod access;
pub mod bitfield;
pub mod dump;
pub mod error;
pub mod types;

pub use access::AccessMode;
pub use error::ConfigurationError;
pub use types::{
    ArrayDescriptor, BlockDescriptor, BlockIdx, BlockKind, EnumValue, FieldDescriptor,
    GenerationOptions, MemoryDescriptor, MemoryIdx, RegisterDescriptor, RegisterIdx,
    SocDescriptor,
};
