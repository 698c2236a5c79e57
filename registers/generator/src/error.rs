// Licensed under the Apache-2.0 license

use regbind_model::ConfigurationError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid export configuration: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("could not serialize manifest: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("code formatting failed")]
    Format(#[from] std::fmt::Error),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
