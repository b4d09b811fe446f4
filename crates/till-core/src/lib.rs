//! # till-core: Pure Business Logic for the Till Checkout
//!
//! This crate holds the promotion-aware inventory and pricing engine. It
//! contains all checkout rules as plain functions and types with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till Architecture                                │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/checkout (console)                      │   │
//! │  │   catalog listing ──► purchase loop ──► Y/N prompts ──► receipt │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  catalog  │  │ promotion │  │allocation │  │  pricing  │  │   │
//! │  │   │  listings │  │  windows  │  │  buy/get  │  │  states   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐                  │   │
//! │  │   │   order   │  │  receipt  │  │   money   │                  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘                  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO CLOCK • PURE FUNCTIONS                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 till-store (snapshot files)                     │   │
//! │  │            products.md / promotions.md read & write             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (ProductRecord, Promotion, StockDraw, ...)
//! - [`money`] - Integer money type
//! - [`error`] - Domain error types
//! - [`validation`] - Field parsers for snapshot rows
//! - [`catalog`] - Product table, listing pairing, stock deduction
//! - [`promotion`] - Promotion table and date windows
//! - [`allocation`] - Buy/get allocation
//! - [`pricing`] - Line pricing state machine
//! - [`order`] - Purchase request and Y/N parsing
//! - [`receipt`] - Totals and membership discount
//!
//! ## Design Principles
//!
//! 1. **No I/O**: the caller supplies "today" and all input text
//! 2. **Eager Validation**: a Catalog or PromotionRegistry is valid or does not exist
//! 3. **Integer Money**: amounts are whole currency units (i64)
//! 4. **Confirmations as Data**: a pending question is a value, not a callback
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use till_core::{Catalog, PricingEngine, PricingStep, PromotionRegistry};
//! use till_core::types::RawProductRow;
//!
//! let catalog = Catalog::from_rows(&[RawProductRow::new("water", "500", "10", "null")]).unwrap();
//! let engine = PricingEngine::new(catalog, PromotionRegistry::default());
//! let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
//!
//! match engine.price_line("water", 3, today).unwrap() {
//!     PricingStep::Settled(quote) => assert_eq!(quote.charge.units(), 1500),
//!     PricingStep::Pending(_) => unreachable!("no promotion, no question"),
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod catalog;
pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod promotion;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use allocation::{allocate, Allocation};
pub use catalog::Catalog;
pub use error::{CatalogError, CoreError, CoreResult, InputFormatError, PromotionError};
pub use money::Money;
pub use order::{parse_confirmation, parse_purchase_request, OrderItem};
pub use pricing::{Confirmation, LineQuote, PendingConfirmation, PricingEngine, PricingStep};
pub use promotion::PromotionRegistry;
pub use receipt::{MembershipPolicy, Receipt};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Membership discount rate in basis points (30%).
pub const DEFAULT_MEMBERSHIP_RATE_BPS: u32 = 3000;

/// Upper bound of the membership discount per purchase.
///
/// Configurable per store through the checkout config.
pub const DEFAULT_MEMBERSHIP_CAP: i64 = 8000;
