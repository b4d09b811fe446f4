//! # till-store: Snapshot Files for the Till Checkout
//!
//! Reads the product and promotion tables from flat files and overwrites
//! the product table after stock changes.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Till Data Flow                                   │
//! │                                                                         │
//! │  apps/checkout (startup / end of purchase)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    till-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐                       │   │
//! │  │   │ SnapshotStore │    │  Row reader   │                       │   │
//! │  │   │ (snapshot.rs) │───►│  (rows.rs)    │──► till-core          │   │
//! │  │   │ load / save   │    │ header, count │    validation          │   │
//! │  │   └───────────────┘    └───────────────┘                       │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  data/products.md, data/promotions.md                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`snapshot`] - Store configuration, load and save
//! - [`rows`] - Text to raw rows
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,no_run
//! use till_store::{SnapshotConfig, SnapshotStore};
//!
//! let store = SnapshotStore::new(SnapshotConfig::in_dir("data"));
//! let catalog = store.load_catalog()?;
//! let promotions = store.load_promotions()?;
//! store.save_catalog(&catalog)?;
//! # Ok::<(), till_store::StoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod rows;
pub mod snapshot;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use snapshot::{SnapshotConfig, SnapshotStore};
