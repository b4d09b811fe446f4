//! # Domain Types
//!
//! Core domain types used throughout the checkout.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ProductRecord  │   │    Promotion    │   │   StockDraw     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  name           │   │  promotional    │       │
//! │  │  price          │   │  buy / get      │   │  normal         │       │
//! │  │  quantity       │   │  start / end    │   └─────────────────┘       │
//! │  │  promotion?     │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  RawProductRow / RawPromotionRow: the same fields as strings, exactly  │
//! │  as read from the snapshot files, before validation.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Two Listings Per Product
//! A product name maps to one normal listing (`promotion: None`) and at most
//! one promotional listing (`promotion: Some(tag)`). Each listing keeps its
//! own stock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// 1 basis point = 0.01%; the membership discount of 30% is 3000 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Listing Kind
// =============================================================================

/// Which of a product's two listings an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    /// The standard listing without a promotion tag.
    Normal,
    /// The listing tagged with a promotion name.
    Promotional,
}

impl fmt::Display for ListingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingKind::Normal => write!(f, "normal"),
            ListingKind::Promotional => write!(f, "promotional"),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product row as read from `products.md`, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProductRow {
    pub name: String,
    pub price: String,
    pub quantity: String,
    pub promotion: String,
}

impl RawProductRow {
    pub fn new(
        name: impl Into<String>,
        price: impl Into<String>,
        quantity: impl Into<String>,
        promotion: impl Into<String>,
    ) -> Self {
        RawProductRow {
            name: name.into(),
            price: price.into(),
            quantity: quantity.into(),
            promotion: promotion.into(),
        }
    }
}

/// A validated catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Product name; shared by the normal and promotional listing.
    pub name: String,

    /// Unit price, always > 0.
    pub price: Money,

    /// Units left on this listing.
    pub quantity: u32,

    /// Promotion tag, `None` for the normal listing.
    pub promotion: Option<String>,
}

impl ProductRecord {
    /// Which listing this record is.
    #[inline]
    pub fn kind(&self) -> ListingKind {
        if self.promotion.is_some() {
            ListingKind::Promotional
        } else {
            ListingKind::Normal
        }
    }

    /// Checks if any unit is left on this listing.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// Promotion
// =============================================================================

/// A promotion row as read from `promotions.md`, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPromotionRow {
    pub name: String,
    pub buy: String,
    pub get: String,
    pub start_date: String,
    pub end_date: String,
}

impl RawPromotionRow {
    pub fn new(
        name: impl Into<String>,
        buy: impl Into<String>,
        get: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        RawPromotionRow {
            name: name.into(),
            buy: buy.into(),
            get: get.into(),
            start_date: start_date.into(),
            end_date: end_date.into(),
        }
    }
}

/// A validated buy/get promotion period.
///
/// ## Invariants
/// - `buy` and `get` in `1..=MAX_PROMOTION_COUNT`
/// - `start <= end`, both bounds inclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promotion {
    pub name: String,
    pub buy: u32,
    pub get: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Promotion {
    /// Units in one complete buy/get group (2+1 → 3).
    #[inline]
    pub fn group_size(&self) -> u32 {
        self.buy.saturating_add(self.get)
    }

    /// Checks if `day` falls inside the inclusive period.
    #[inline]
    pub fn is_active_on(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Checks if two inclusive periods share at least one day.
    ///
    /// `[s1,e1]` and `[s2,e2]` overlap iff `s1 <= e2 && s2 <= e1`.
    #[inline]
    pub fn overlaps(&self, other: &Promotion) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

// =============================================================================
// Stock Draw
// =============================================================================

/// How many units a settled line takes from each listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDraw {
    pub promotional: u32,
    pub normal: u32,
}

impl StockDraw {
    /// Total units drawn.
    #[inline]
    pub fn total(&self) -> u32 {
        self.promotional.saturating_add(self.normal)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
