// Licensed under the Apache-2.0 license

//! Generator and export configuration.
//!
//! [`GeneratorConfig`] controls how binding units are laid out;
//! [`ExportConfig`] carries everything an end-to-end export needs and can
//! be loaded from TOML:
//!
//! ```
//! use regbind_generator::config::ExportConfig;
//!
//! let config = ExportConfig::from_toml_str(
//!     r#"
//! top = "uart"
//! soc_name = "uart"
//!
//! [options]
//! emit_stubs = true
//!
//! [generator]
//! split_bindings = 50
//! "#,
//! )
//! .unwrap();
//! assert_eq!(config.generator.split_bindings, 50);
//! assert!(config.options.emit_stubs);
//! assert_eq!(config.word_bytes, 4);
//! ```

use crate::error::{ExportError, ExportResult};
use regbind_builder::{ArrayPolicy, ModelBuilder};
use regbind_model::GenerationOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Register count above which bindings are split when nothing else is
/// configured.
pub const DEFAULT_SPLIT_BINDINGS: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Split bindings into chunks of this many registers once the map has
    /// more than this many. Zero disables count-based splitting.
    pub split_bindings: usize,
    /// One binding unit per top-level sub-block. Takes precedence over
    /// `split_bindings`.
    pub split_by_hierarchy: bool,
    /// Also write the IR as `<soc>_ir.json`.
    pub emit_ir_json: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            split_bindings: DEFAULT_SPLIT_BINDINGS,
            split_by_hierarchy: false,
            emit_ir_json: false,
        }
    }
}

impl GeneratorConfig {
    pub fn split_bindings(mut self, chunk_size: usize) -> Self {
        self.split_bindings = chunk_size;
        self
    }

    pub fn split_by_hierarchy(mut self, enabled: bool) -> Self {
        self.split_by_hierarchy = enabled;
        self
    }

    pub fn emit_ir_json(mut self, enabled: bool) -> Self {
        self.emit_ir_json = enabled;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Top-level symbol of the design tree.
    pub top: String,
    pub soc_name: String,
    /// Defaults to `soc_name` when empty.
    pub namespace: String,
    pub word_bytes: usize,
    pub little_endian: bool,
    pub array_policy: ArrayPolicy,
    pub options: GenerationOptions,
    pub generator: GeneratorConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            top: String::new(),
            soc_name: String::new(),
            namespace: String::new(),
            word_bytes: 4,
            little_endian: true,
            array_policy: ArrayPolicy::default(),
            options: GenerationOptions::default(),
            generator: GeneratorConfig::default(),
        }
    }
}

impl ExportConfig {
    pub fn new(top: &str, soc_name: &str) -> Self {
        Self {
            top: top.to_string(),
            soc_name: soc_name.to_string(),
            ..Default::default()
        }
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn generator(mut self, generator: GeneratorConfig) -> Self {
        self.generator = generator;
        self
    }

    pub fn array_policy(mut self, policy: ArrayPolicy) -> Self {
        self.array_policy = policy;
        self
    }

    pub fn from_toml_str(s: &str) -> ExportResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: &Path) -> ExportResult<Self> {
        let s = std::fs::read_to_string(path).map_err(ExportError::io(path))?;
        Self::from_toml_str(&s)
    }

    /// A model builder set up with this configuration.
    pub fn model_builder(&self) -> ModelBuilder {
        ModelBuilder::new(self.word_bytes, self.little_endian)
            .array_policy(self.array_policy)
            .options(self.options.clone())
    }
}
