// Licensed under the Apache-2.0 license

//! Register-map IR to Rust binding generator.
//!
//! ## Usage
//!
//! ```no_run
//! use regbind_builder::NodeTree;
//! use regbind_generator::{export, ExportConfig};
//! use std::path::Path;
//!
//! let tree = NodeTree::from_json(&std::fs::read_to_string("uart.json").unwrap()).unwrap();
//! let config = ExportConfig::from_file(Path::new("uart.toml")).unwrap();
//! export(&tree, &config, Path::new("src/generated")).unwrap();
//! ```
//!
//! ## Module Organization
//!
//! - [`util`]: name conversion and literal formatting
//! - [`config`]: [`GeneratorConfig`] and [`ExportConfig`]
//! - [`split`]: count and hierarchy based binding splits
//! - [`output`]: [`GeneratedUnits`] and writing them to disk
//! - `codegen`: the emitters and the [`generate`]/[`export`] entry points

pub mod config;
pub mod error;
pub mod output;
pub mod split;
pub mod util;

mod codegen;

pub use codegen::{export, generate};
pub use config::{ExportConfig, GeneratorConfig};
pub use error::{ExportError, ExportResult};
pub use output::GeneratedUnits;
pub use util::identifier;
