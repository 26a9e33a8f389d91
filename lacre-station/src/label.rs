//! Label identifiers
//!
//! A label id is the package id the operator supplied, the fixed court
//! sequence infix and a zero-padded position in the batch:
//! `9001941457766-TJSP001`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Infix between the package id and the sequence number
pub const SEQUENCE_INFIX: &str = "-TJSP";

/// The printable identifier for one physical tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelId(String);

impl LabelId {
    /// Format a label id from a package id and a 1-based batch position
    ///
    /// The position is zero-padded to width 3; values above 999 print
    /// wider rather than truncated.
    pub fn format(package_id: &str, index: u32) -> Self {
        Self(format!("{}{}{:03}", package_id, SEQUENCE_INFIX, index))
    }

    /// Wrap an already-formed id, as pasted by the operator for reprint
    pub fn from_raw(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
