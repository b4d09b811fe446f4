//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  Construction (fatal - the tables are never partially valid)           │
//! │  ├── CatalogError     - product rows failed validation                 │
//! │  └── PromotionError   - promotion rows failed validation               │
//! │                                                                         │
//! │  Runtime (recoverable - the purchase loop re-prompts)                  │
//! │  ├── CoreError::ProductNotFound                                        │
//! │  ├── CoreError::InsufficientStock                                      │
//! │  └── InputFormatError - purchase line or Y/N answer malformed          │
//! │                                                                         │
//! │  Flow: CatalogError/PromotionError → StoreError → checkout app exit    │
//! │        CoreError → "[ERROR] ..." → re-prompt                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (product name, row, field)
//! 3. Each error variant maps to a user-facing message

use chrono::NaiveDate;
use thiserror::Error;

use crate::types::ListingKind;

// =============================================================================
// Catalog Error
// =============================================================================

/// Product table validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// A field did not parse as its semantic type.
    ///
    /// ## When This Occurs
    /// - price is zero, negative or not a number
    /// - quantity is negative or not a number
    /// - name or promotion tag is blank
    #[error("Illegal record type at row {row}: {field} = '{value}'")]
    IllegalRecordType {
        row: usize,
        field: &'static str,
        value: String,
    },

    /// A promotional listing exists without the normal listing.
    ///
    /// A product with no normal stock must still carry a normal row with
    /// quantity 0.
    #[error("Product '{name}' has a promotional listing but no normal listing")]
    MissingNormalListing { name: String },

    /// More than one normal, or more than one promotional, listing.
    #[error("Product '{name}' has more than one {listing} listing")]
    DuplicateListing { name: String, listing: ListingKind },
}

// =============================================================================
// Promotion Error
// =============================================================================

/// Promotion table validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromotionError {
    /// buy/get not a positive integer, or a date not `YYYY-MM-DD`.
    #[error("Illegal promotion type at row {row}: {field} = '{value}'")]
    IllegalPromotionType {
        row: usize,
        field: &'static str,
        value: String,
    },

    /// End date precedes start date.
    #[error("Promotion '{name}' ends ({end}) before it starts ({start})")]
    InvalidDateRange {
        name: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// Two periods of the same promotion share at least one day.
    #[error(
        "Promotion '{name}' has overlapping periods {}..={} and {}..={}",
        first.0, first.1, second.0, second.1
    )]
    OverlappingPromotionPeriod {
        name: String,
        first: (NaiveDate, NaiveDate),
        second: (NaiveDate, NaiveDate),
    },
}

// =============================================================================
// Input Format Error
// =============================================================================

/// Malformed console input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputFormatError {
    /// Nothing was entered.
    #[error("Purchase request is empty")]
    EmptyRequest,

    /// An item is not of the form `[name-quantity]`.
    #[error("Malformed purchase item '{item}': {reason}")]
    MalformedItem { item: String, reason: &'static str },

    /// The quantity is not a positive integer.
    #[error("Invalid quantity '{value}' for '{name}'")]
    InvalidQuantity { name: String, value: String },

    /// A confirmation answer other than `Y` or `N`.
    #[error("Answer must be Y or N, got '{0}'")]
    InvalidAnswer(String),
}

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The requested listing does not exist.
    #[error("Product not found: {name} ({listing} listing)")]
    ProductNotFound { name: String, listing: ListingKind },

    /// Not enough stock to cover the request.
    ///
    /// ## User Workflow
    /// ```text
    /// Request [cola-25]
    ///      │
    ///      ▼
    /// Check stock: promotional 10 + normal 10 = 20
    ///      │
    ///      ▼
    /// InsufficientStock { name: "cola", available: 20, requested: 25 }
    ///      │
    ///      ▼
    /// Console shows the error and asks for the purchase again
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: u32,
        requested: u32,
    },

    /// Console input could not be parsed.
    #[error(transparent)]
    InputFormat(#[from] InputFormatError),

    /// Product table failed validation.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Promotion table failed validation.
    #[error(transparent)]
    Promotion(#[from] PromotionError),
}

impl CoreError {
    /// Whether the purchase loop can re-prompt after this error.
    ///
    /// Construction errors are never recoverable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::ProductNotFound { .. }
                | CoreError::InsufficientStock { .. }
                | CoreError::InputFormat(_)
        )
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
