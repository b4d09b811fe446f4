//! # Store Error Types
//!
//! Error types for snapshot file operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / bad header / wrong field count                       │
//! │  CatalogError / PromotionError (till-core validation)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds the file path and line                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  anyhow::Error (checkout app) ← Printed, process exits                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use thiserror::Error;
use till_core::{CatalogError, PromotionError};

/// Snapshot file errors.
///
/// All of them are fatal for the checkout: a catalog that cannot be loaded
/// or saved leaves nothing to sell.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing a file failed.
    ///
    /// ## When This Occurs
    /// - File doesn't exist
    /// - Permission denied
    /// - Disk full on save
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The first non-blank line is not the expected header.
    #[error("Unexpected header in {}: expected '{expected}', found '{found}'", path.display())]
    BadHeader {
        path: PathBuf,
        expected: &'static str,
        found: String,
    },

    /// A data row has the wrong number of comma-separated fields.
    #[error(
        "Wrong field count in {} line {line}: expected {expected}, found {found}",
        path.display()
    )]
    FieldCount {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Product rows failed validation.
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// Promotion rows failed validation.
    #[error("Invalid promotions: {0}")]
    Promotion(#[from] PromotionError),
}

impl StoreError {
    /// Creates an Io error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for snapshot operations.
pub type StoreResult<T> = Result<T, StoreError>;
