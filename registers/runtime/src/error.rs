// Licensed under the Apache-2.0 license

use regbind_model::AccessMode;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single bus transaction.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("I/O error talking to {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: std::io::Error,
    },
    #[error("timed out after {timeout:?} waiting for {target}")]
    Timeout { target: String, timeout: Duration },
    #[error("malformed response {response:?}: {reason}")]
    Protocol { response: String, reason: String },
    #[error("unsupported access width of {0} bytes")]
    UnsupportedWidth(usize),
    #[error("`{command}` exited with {status}: {stderr}")]
    RemoteExit {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("{0} callback not configured")]
    NotConfigured(&'static str),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout { .. })
    }

    pub(crate) fn io(target: impl Into<String>, source: std::io::Error) -> Self {
        TransportError::Io {
            target: target.into(),
            source,
        }
    }

    pub(crate) fn protocol(response: impl Into<String>, reason: impl Into<String>) -> Self {
        TransportError::Protocol {
            response: response.into(),
            reason: reason.into(),
        }
    }
}

/// Failure of a register or field access.
#[derive(Error, Debug)]
pub enum AccessError {
    #[error("cannot write {target}: access mode is {mode}")]
    AccessPolicy { target: String, mode: AccessMode },
    #[error("register {register} has no field {field:?}")]
    UnknownField { register: String, field: String },
    #[error("field {field} has no value named {name:?}")]
    UnknownEnum { field: String, name: String },
    #[error("field value read at {field_address:#x} cannot be written to {register} at {address:#x}")]
    FieldMismatch {
        register: String,
        address: u64,
        field_address: u64,
    },
    #[error("no member named {0:?}")]
    UnknownMember(String),
    #[error("index {index} out of range for {target} ({count} elements)")]
    IndexOutOfRange {
        target: String,
        index: u64,
        count: u64,
    },
    #[error(transparent)]
    Transport(#[from] TransportError),
}

pub type TransportResult<T> = std::result::Result<T, TransportError>;
pub type AccessResult<T> = std::result::Result<T, AccessError>;
