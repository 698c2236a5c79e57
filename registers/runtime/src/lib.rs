// Licensed under the Apache-2.0 license

//! Runtime support for generated register bindings.
//!
//! ## Module Organization
//!
//! - [`desc`]: static descriptor types the generated code is made of
//! - [`registry`]: path lookup over the descriptors a binding registered
//! - [`access`]: [`Soc`], [`RegisterRef`], [`CachedRegister`] and [`MemoryRef`]
//! - [`value`]: [`FieldValue`] and [`RegisterValue`]
//! - [`master`]: the [`Master`] trait and its backends
//!
//! ```
//! use regbind_runtime::desc::{AccessMode, BlockInfo, FieldInfo, RegisterInfo, SocInfo};
//! use regbind_runtime::{MockMaster, Registry, Soc};
//!
//! static CTRL: RegisterInfo = RegisterInfo {
//!     name: "CTRL",
//!     path: "uart.CTRL",
//!     parent: "uart",
//!     address: 0x1000,
//!     offset: 0x1000,
//!     width: 8,
//!     access: AccessMode::RW,
//!     volatile: false,
//!     reset: None,
//!     fields: &[FieldInfo { name: "DLAB", lsb: 7, width: 1, access: AccessMode::RW, reset: None, enums: &[] }],
//!     array: None,
//! };
//! static UART: BlockInfo = BlockInfo {
//!     name: "uart",
//!     path: "uart",
//!     parent: None,
//!     address: 0,
//!     registers: &[&CTRL],
//!     blocks: &[],
//!     memories: &[],
//!     array: None,
//! };
//! static SOC: SocInfo = SocInfo {
//!     name: "uart",
//!     namespace: "uart",
//!     word_bytes: 4,
//!     little_endian: true,
//!     access_checks: true,
//!     top: &UART,
//! };
//!
//! let mut registry = Registry::new(&SOC);
//! registry.add_register(&CTRL);
//! let mut soc = Soc::new(MockMaster::new(), registry);
//! soc.reg("CTRL").unwrap().write_field("DLAB", 1).unwrap();
//! assert_eq!(soc.reg("uart.CTRL").unwrap().read().unwrap().value(), 0x80);
//! ```

pub mod access;
pub mod desc;
pub mod error;
pub mod master;
pub mod registry;
pub mod value;

pub use access::{CachedRegister, MemoryRef, RegisterRef, Soc};
pub use error::{AccessError, AccessResult, TransportError, TransportResult};
pub use master::{CallbackMaster, Master, MockMaster, OpenOcdMaster, SshMaster, SshTool};
pub use registry::Registry;
pub use regbind_model::AccessMode;
pub use value::{FieldValue, RegisterValue, WriteValue};
