//! # Snapshot Store
//!
//! Loads the catalog and promotions from their flat files and writes the
//! catalog back after a purchase.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Checkout startup                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SnapshotConfig::new(products, promotions)                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SnapshotStore::load_catalog() ─────► Catalog (validated)               │
//! │  SnapshotStore::load_promotions() ──► PromotionRegistry (validated)     │
//! │       │                                                                 │
//! │       │  ... purchase lines commit stock deductions ...                │
//! │       ▼                                                                 │
//! │  SnapshotStore::save_catalog(&catalog) ──► products.md overwritten      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The promotion file is read-only; only stock changes at runtime.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use till_core::{Catalog, PromotionRegistry};

use crate::error::{StoreError, StoreResult};
use crate::rows::{read_product_rows, read_promotion_rows};

// =============================================================================
// Configuration
// =============================================================================

/// Where the snapshot files live.
///
/// ## Example
/// ```rust
/// use till_store::SnapshotConfig;
///
/// let config = SnapshotConfig::new("data/products.md", "data/promotions.md");
/// assert!(config.products_path.ends_with("products.md"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotConfig {
    /// Product table; rewritten on save.
    pub products_path: PathBuf,

    /// Promotion table; never written.
    pub promotions_path: PathBuf,
}

impl SnapshotConfig {
    pub fn new(products_path: impl Into<PathBuf>, promotions_path: impl Into<PathBuf>) -> Self {
        SnapshotConfig {
            products_path: products_path.into(),
            promotions_path: promotions_path.into(),
        }
    }

    /// Both files under `dir` with their default names.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("products.md"), dir.join("promotions.md"))
    }
}

// =============================================================================
// Store
// =============================================================================

/// File-backed access to the catalog and promotion snapshots.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    config: SnapshotConfig,
}

impl SnapshotStore {
    pub fn new(config: SnapshotConfig) -> Self {
        SnapshotStore { config }
    }

    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Reads and validates the product table.
    pub fn load_catalog(&self) -> StoreResult<Catalog> {
        let path = &self.config.products_path;
        let text = read_file(path)?;
        let rows = read_product_rows(&text, path)?;
        let catalog = Catalog::from_rows(&rows)?;

        info!(
            path = %path.display(),
            listings = catalog.records().len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }

    /// Reads and validates the promotion table.
    pub fn load_promotions(&self) -> StoreResult<PromotionRegistry> {
        let path = &self.config.promotions_path;
        let text = read_file(path)?;
        let rows = read_promotion_rows(&text, path)?;
        let registry = PromotionRegistry::from_rows(&rows)?;

        info!(
            path = %path.display(),
            promotions = registry.promotions().len(),
            "Promotions loaded"
        );
        Ok(registry)
    }

    /// Overwrites the product table with `catalog`.
    ///
    /// The text goes to a sibling temp file first and is then renamed over
    /// the snapshot, so a failed write leaves the previous snapshot intact.
    pub fn save_catalog(&self, catalog: &Catalog) -> StoreResult<()> {
        let path = &self.config.products_path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let tmp = path.with_extension("md.tmp");
        fs::write(&tmp, catalog.serialize()).map_err(|e| StoreError::io(&tmp, e))?;
        fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;

        info!(path = %path.display(), "Catalog saved");
        Ok(())
    }
}

fn read_file(path: &Path) -> StoreResult<String> {
    debug!(path = %path.display(), "Reading snapshot");
    fs::read_to_string(path).map_err(|e| StoreError::io(path, e))
}

// =============================================================================
// Unit Tests
// =============================================================================
