//! # Catalog
//!
//! In-memory product table with stock per listing.
//!
//! ## Listing Pairing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  name,price,quantity,promotion                                          │
//! │  cola,1000,10,soda 2+1     ◄── promotional listing (at most one)        │
//! │  cola,1000,10,null         ◄── normal listing (exactly one)             │
//! │  water,500,10,null         ◄── normal listing, no promotion            │
//! │                                                                         │
//! │  ✅ one normal + zero or one promotional per name                       │
//! │  ❌ promotional only        → MissingNormalListing                      │
//! │  ❌ two normal / two promo  → DuplicateListing                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A catalog is validated when it is built and never exists in a partially
//! valid state. After construction only stock quantities change, and only
//! through [`Catalog::deduct`] / [`Catalog::deduct_line`].

use serde::Serialize;
use tracing::debug;

use crate::error::{CatalogError, CoreError, CoreResult};
use crate::types::{ListingKind, ProductRecord, RawProductRow, StockDraw};
use crate::validation::{
    parse_name, parse_price, parse_promotion_tag, parse_quantity, InvalidField, MAX_STOCK_QUANTITY,
    MAX_UNIT_PRICE, NO_PROMOTION,
};

/// Header row of the product snapshot.
pub const PRODUCTS_HEADER: &str = "name,price,quantity,promotion";

/// Result type for catalog construction.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// The validated product table.
///
/// ## Usage
/// ```rust
/// use till_core::catalog::Catalog;
/// use till_core::types::{ListingKind, RawProductRow};
///
/// let mut catalog = Catalog::from_rows(&[
///     RawProductRow::new("cola", "1000", "10", "soda 2+1"),
///     RawProductRow::new("cola", "1000", "10", "null"),
/// ])
/// .unwrap();
///
/// assert!(catalog.is_available("cola"));
/// catalog.deduct("cola", 3, ListingKind::Promotional).unwrap();
/// assert_eq!(catalog.find_promotional("cola").unwrap().quantity, 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    records: Vec<ProductRecord>,
}

impl Catalog {
    /// Parses and validates raw snapshot rows.
    ///
    /// Rows are numbered from 1 (the first data row after the header).
    pub fn from_rows(rows: &[RawProductRow]) -> CatalogResult<Self> {
        let records = rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_row(i + 1, row))
            .collect::<CatalogResult<Vec<_>>>()?;

        Self::new(records)
    }

    /// Validates already-typed records.
    ///
    /// Typed records can still break the value rules (blank name, zero or
    /// oversized price, oversized stock), so those are checked again before
    /// the pairing rule.
    pub fn new(records: Vec<ProductRecord>) -> CatalogResult<Self> {
        for (i, record) in records.iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(illegal(i + 1, "name", &record.name));
            }
            if !record.price.is_positive() || record.price.units() > MAX_UNIT_PRICE {
                return Err(illegal(i + 1, "price", &record.price.units().to_string()));
            }
            if record.quantity > MAX_STOCK_QUANTITY {
                return Err(illegal(i + 1, "quantity", &record.quantity.to_string()));
            }
            if matches!(record.promotion.as_deref(), Some(tag) if tag.trim().is_empty()) {
                return Err(illegal(i + 1, "promotion", ""));
            }
        }

        check_pairing(&records)?;

        debug!(records = records.len(), "Catalog validated");
        Ok(Catalog { records })
    }

    /// All listings in table order.
    pub fn records(&self) -> &[ProductRecord] {
        &self.records
    }

    /// Distinct product names in first-appearance order.
    pub fn product_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in &self.records {
            if !names.contains(&record.name.as_str()) {
                names.push(&record.name);
            }
        }
        names
    }

    /// Checks if the normal listing for `name` has stock.
    ///
    /// Only the normal listing is consulted; promotional stock is weighed
    /// by the allocation engine instead.
    pub fn is_available(&self, name: &str) -> bool {
        self.find_normal(name)
            .map(|record| record.in_stock())
            .unwrap_or(false)
    }

    /// Returns the normal listing for `name`.
    pub fn find_normal(&self, name: &str) -> CoreResult<&ProductRecord> {
        self.find(name, ListingKind::Normal)
    }

    /// Returns the promotional listing for `name`.
    pub fn find_promotional(&self, name: &str) -> CoreResult<&ProductRecord> {
        self.find(name, ListingKind::Promotional)
    }

    /// Returns the `kind` listing for `name`.
    pub fn find(&self, name: &str, kind: ListingKind) -> CoreResult<&ProductRecord> {
        self.index_of(name, kind)
            .map(|i| &self.records[i])
            .ok_or_else(|| not_found(name, kind))
    }

    /// Units that can be sold for `name`.
    ///
    /// Promotional stock only counts while its promotion is running.
    pub fn available_stock(&self, name: &str, promotion_running: bool) -> u32 {
        let normal = self.find_normal(name).map(|r| r.quantity).unwrap_or(0);
        let promotional = if promotion_running {
            self.find_promotional(name).map(|r| r.quantity).unwrap_or(0)
        } else {
            0
        };
        normal.saturating_add(promotional)
    }

    /// Subtracts `amount` from one listing.
    ///
    /// ## Errors
    /// - `ProductNotFound` if the listing does not exist
    /// - `InsufficientStock` if the stock would go negative; nothing changes
    pub fn deduct(&mut self, name: &str, amount: u32, kind: ListingKind) -> CoreResult<()> {
        let index = self
            .index_of(name, kind)
            .ok_or_else(|| not_found(name, kind))?;

        let record = &mut self.records[index];
        let remaining = record
            .quantity
            .checked_sub(amount)
            .ok_or_else(|| CoreError::InsufficientStock {
                name: name.to_string(),
                available: record.quantity,
                requested: amount,
            })?;

        debug!(name, %kind, amount, remaining, "Stock deducted");
        record.quantity = remaining;
        Ok(())
    }

    /// Applies a settled line's draw to both listings, or to neither.
    ///
    /// ## Atomicity
    /// ```text
    /// draw { promotional: 3, normal: 2 }
    ///      │
    ///      ▼
    /// check promotional ≥ 3 ──✗──► InsufficientStock (no write)
    ///      │ ✓
    ///      ▼
    /// check normal ≥ 2 ───────✗──► InsufficientStock (no write)
    ///      │ ✓
    ///      ▼
    /// write both
    /// ```
    pub fn deduct_line(&mut self, name: &str, draw: StockDraw) -> CoreResult<()> {
        let normal = self.checked_draw(name, ListingKind::Normal, draw.normal)?;
        let promotional = self.checked_draw(name, ListingKind::Promotional, draw.promotional)?;

        if let Some((index, remaining)) = normal {
            self.records[index].quantity = remaining;
        }
        if let Some((index, remaining)) = promotional {
            self.records[index].quantity = remaining;
        }

        debug!(
            name,
            promotional = draw.promotional,
            normal = draw.normal,
            "Line stock deducted"
        );
        Ok(())
    }

    /// Renders the table as the product snapshot text.
    ///
    /// Header first, then one row per record in table order, absent
    /// promotions written as `null`. The output ends with a newline.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(32 * (self.records.len() + 1));
        out.push_str(PRODUCTS_HEADER);
        out.push('\n');
        for record in &self.records {
            out.push_str(&format!(
                "{},{},{},{}\n",
                record.name,
                record.price.units(),
                record.quantity,
                record.promotion.as_deref().unwrap_or(NO_PROMOTION)
            ));
        }
        out
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    fn index_of(&self, name: &str, kind: ListingKind) -> Option<usize> {
        self.records
            .iter()
            .position(|r| r.name == name && r.kind() == kind)
    }

    /// Validates a pending deduction without applying it.
    ///
    /// A zero draw on a missing listing is a no-op, not an error.
    fn checked_draw(
        &self,
        name: &str,
        kind: ListingKind,
        amount: u32,
    ) -> CoreResult<Option<(usize, u32)>> {
        if amount == 0 {
            return Ok(None);
        }
        let index = self
            .index_of(name, kind)
            .ok_or_else(|| not_found(name, kind))?;
        let available = self.records[index].quantity;
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| CoreError::InsufficientStock {
                name: name.to_string(),
                available,
                requested: amount,
            })?;
        Ok(Some((index, remaining)))
    }
}

fn parse_row(row: usize, raw: &RawProductRow) -> CatalogResult<ProductRecord> {
    let at_row = |e: InvalidField| CatalogError::IllegalRecordType {
        row,
        field: e.field,
        value: e.value,
    };

    Ok(ProductRecord {
        name: parse_name("name", &raw.name).map_err(at_row)?,
        price: parse_price(&raw.price).map_err(at_row)?,
        quantity: parse_quantity(&raw.quantity).map_err(at_row)?,
        promotion: parse_promotion_tag(&raw.promotion).map_err(at_row)?,
    })
}

fn check_pairing(records: &[ProductRecord]) -> CatalogResult<()> {
    let mut seen: Vec<&str> = Vec::new();

    for record in records {
        let name = record.name.as_str();
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);

        let listings = records.iter().filter(|r| r.name == name);
        let (normal, promotional) = listings.fold((0, 0), |(n, p), r| match r.kind() {
            ListingKind::Normal => (n + 1, p),
            ListingKind::Promotional => (n, p + 1),
        });

        if normal > 1 {
            return Err(CatalogError::DuplicateListing {
                name: name.to_string(),
                listing: ListingKind::Normal,
            });
        }
        if promotional > 1 {
            return Err(CatalogError::DuplicateListing {
                name: name.to_string(),
                listing: ListingKind::Promotional,
            });
        }
        if normal == 0 {
            return Err(CatalogError::MissingNormalListing {
                name: name.to_string(),
            });
        }
    }

    Ok(())
}

fn illegal(row: usize, field: &'static str, value: &str) -> CatalogError {
    CatalogError::IllegalRecordType {
        row,
        field,
        value: value.to_string(),
    }
}

fn not_found(name: &str, kind: ListingKind) -> CoreError {
    CoreError::ProductNotFound {
        name: name.to_string(),
        listing: kind,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
