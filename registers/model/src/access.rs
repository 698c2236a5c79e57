// Licensed under the Apache-2.0 license

//! Software access policy of registers and fields.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Software-visible access mode.
///
/// The set is closed: anything the front-end reports that is not recognized
/// normalizes to [`AccessMode::RW`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    #[default]
    RW,
    RO,
    WO,
    /// Write 1 to clear.
    W1C,
    /// Write 0 to clear.
    W0C,
    /// Clear on read.
    RC,
}

impl AccessMode {
    pub const ALL: [AccessMode; 6] = [
        AccessMode::RW,
        AccessMode::RO,
        AccessMode::WO,
        AccessMode::W1C,
        AccessMode::W0C,
        AccessMode::RC,
    ];

    /// Normalizes an access string, case-insensitively.
    ///
    /// The legacy single letters `r` and `w` map to read-only and write-only.
    pub fn normalize(s: &str) -> AccessMode {
        match s.trim().to_ascii_lowercase().as_str() {
            "rw" | "wr" => AccessMode::RW,
            "ro" | "r" => AccessMode::RO,
            "wo" | "w" => AccessMode::WO,
            "w1c" | "woclr" => AccessMode::W1C,
            "w0c" => AccessMode::W0C,
            "rc" | "rclr" => AccessMode::RC,
            _ => AccessMode::RW,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AccessMode::RW => "rw",
            AccessMode::RO => "ro",
            AccessMode::WO => "wo",
            AccessMode::W1C => "w1c",
            AccessMode::W0C => "w0c",
            AccessMode::RC => "rc",
        }
    }

    /// Name of the variant as it is spelled in Rust source.
    pub fn variant_name(self) -> &'static str {
        match self {
            AccessMode::RW => "RW",
            AccessMode::RO => "RO",
            AccessMode::WO => "WO",
            AccessMode::W1C => "W1C",
            AccessMode::W0C => "W0C",
            AccessMode::RC => "RC",
        }
    }

    pub fn is_readable(self) -> bool {
        !matches!(self, AccessMode::WO)
    }

    /// Software writes are refused for read-only and clear-on-read modes.
    pub fn is_writable(self) -> bool {
        !matches!(self, AccessMode::RO | AccessMode::RC)
    }
}

impl From<&str> for AccessMode {
    fn from(s: &str) -> Self {
        AccessMode::normalize(s)
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(AccessMode::normalize("RW"), AccessMode::RW);
        assert_eq!(AccessMode::normalize("ro"), AccessMode::RO);
        assert_eq!(AccessMode::normalize("Wo"), AccessMode::WO);
        assert_eq!(AccessMode::normalize("W1C"), AccessMode::W1C);
        assert_eq!(AccessMode::normalize("w0c"), AccessMode::W0C);
        assert_eq!(AccessMode::normalize("RC"), AccessMode::RC);
    }

    #[test]
    fn test_normalize_legacy_and_unknown() {
        assert_eq!(AccessMode::normalize("r"), AccessMode::RO);
        assert_eq!(AccessMode::normalize("W"), AccessMode::WO);
        assert_eq!(AccessMode::normalize("rwx"), AccessMode::RW);
        assert_eq!(AccessMode::normalize(""), AccessMode::RW);
    }

    #[test]
    fn test_round_trip_names() {
        for mode in AccessMode::ALL {
            assert_eq!(AccessMode::normalize(mode.as_str()), mode);
            assert_eq!(AccessMode::normalize(mode.variant_name()), mode);
        }
    }

    #[test]
    fn test_writable() {
        assert!(AccessMode::RW.is_writable());
        assert!(AccessMode::W1C.is_writable());
        assert!(!AccessMode::RO.is_writable());
        assert!(!AccessMode::RC.is_writable());
        assert!(!AccessMode::WO.is_readable());
    }
}
