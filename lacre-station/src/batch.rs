//! Batch workflows - sequential generation and free-text reprint
//!
//! Both workflows produce the same [`LabelBatch`] shape, consumed by one
//! orchestrator: `generate` builds ids from a counter, `reprint` parses
//! them verbatim from operator-pasted text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::label::LabelId;

/// Input validation errors, one per rule
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("package id must not be empty")]
    EmptyPackageId,

    #[error("quantity must be at least 1")]
    QuantityTooLow,

    #[error("quantity must not exceed {max}")]
    QuantityTooHigh { max: usize },

    #[error("no labels found in input")]
    EmptyInput,
}

/// The current ordered working set of label ids
///
/// A batch replaces its predecessor in full; there is no merge. Batches
/// built by `generate` remember the package id they came from, reprint
/// batches do not.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelBatch {
    package_id: Option<String>,
    labels: Vec<LabelId>,
}

impl LabelBatch {
    /// Generate a sequential batch for a package
    ///
    /// Validation runs in fixed order: non-empty package id, quantity at
    /// least 1, quantity at most `max_labels`. On success the batch
    /// holds `quantity` ids with positions 1..=quantity, in order.
    pub fn generate(
        package_id: &str,
        quantity: i64,
        max_labels: usize,
    ) -> Result<Self, ValidationError> {
        let package_id = package_id.trim();
        if package_id.is_empty() {
            return Err(ValidationError::EmptyPackageId);
        }
        if quantity < 1 {
            return Err(ValidationError::QuantityTooLow);
        }
        if quantity as usize > max_labels {
            return Err(ValidationError::QuantityTooHigh { max: max_labels });
        }

        let labels = (1..=quantity as u32)
            .map(|index| LabelId::format(package_id, index))
            .collect();

        Ok(Self {
            package_id: Some(package_id.to_string()),
            labels,
        })
    }

    /// Build a batch from operator-pasted text, one label per line
    ///
    /// Lines are trimmed and blank lines dropped; order and duplicates
    /// are preserved. The remaining lines become the batch verbatim.
    pub fn reprint(raw_text: &str) -> Result<Self, ValidationError> {
        let labels: Vec<LabelId> = raw_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(LabelId::from_raw)
            .collect();

        if labels.is_empty() {
            return Err(ValidationError::EmptyInput);
        }

        Ok(Self {
            package_id: None,
            labels,
        })
    }

    /// The package id this batch was generated from, if any
    pub fn package_id(&self) -> Option<&str> {
        self.package_id.as_deref()
    }

    pub fn labels(&self) -> &[LabelId] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
