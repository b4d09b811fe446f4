//! # Validation Module
//!
//! Field parsers shared by the catalog and the promotion registry.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: till-store                                                   │
//! │  ├── header matches                                                    │
//! │  └── every row has the expected number of fields                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - each field parses as its semantic type         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Catalog / PromotionRegistry - cross-row invariants           │
//! │  ├── listing pairing per product name                                  │
//! │  └── non-overlapping periods per promotion name                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Parsers return [`InvalidField`]; the table that owns the row attaches
//! the row number and converts it into its own error type.

use chrono::NaiveDate;

use crate::money::Money;

/// Sentinel used by the snapshot format for "no promotion".
pub const NO_PROMOTION: &str = "null";

/// Date layout used by the promotion snapshot.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest stock a single listing may hold.
///
/// Keeps promotional + normal stock, and price × quantity, inside `u32`/`i64`.
pub const MAX_STOCK_QUANTITY: u32 = 1_000_000;

/// Largest unit price accepted.
pub const MAX_UNIT_PRICE: i64 = 100_000_000;

/// Largest buy or get count of a promotion.
pub const MAX_PROMOTION_COUNT: u32 = 1_000;

/// A field that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    pub field: &'static str,
    pub value: String,
}

/// Result type for field parsing.
pub type FieldResult<T> = Result<T, InvalidField>;

fn invalid(field: &'static str, value: &str) -> InvalidField {
    InvalidField {
        field,
        value: value.to_string(),
    }
}

/// Parses an unsigned decimal made of ASCII digits only.
///
/// `u32::from_str` accepts a leading `+`; snapshot numbers never carry a
/// sign, so that form is rejected here. Leading zeros (`0001`) are fine.
fn parse_digits(field: &'static str, value: &str) -> FieldResult<u32> {
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(field, value));
    }
    value.parse::<u32>().map_err(|_| invalid(field, value))
}

// =============================================================================
// Product Fields
// =============================================================================

/// Validates a product or promotion name.
///
/// ## Rules
/// - Must not be blank
/// - Surrounding whitespace is trimmed
pub fn parse_name(field: &'static str, value: &str) -> FieldResult<String> {
    let name = value.trim();
    if name.is_empty() {
        return Err(invalid(field, value));
    }
    Ok(name.to_string())
}

/// Validates a unit price.
///
/// ## Example
/// ```rust
/// use till_core::validation::parse_price;
///
/// assert_eq!(parse_price("1000").unwrap().units(), 1000);
/// assert_eq!(parse_price("0001").unwrap().units(), 1);
/// assert!(parse_price("0").is_err());
/// assert!(parse_price("-1").is_err());
/// assert!(parse_price("100000001").is_err());
/// ```
pub fn parse_price(value: &str) -> FieldResult<Money> {
    let price = parse_digits("price", value)?;
    if price == 0 || i64::from(price) > MAX_UNIT_PRICE {
        return Err(invalid("price", value));
    }
    Ok(Money::from_units(price as i64))
}

/// Validates a stock quantity (zero up to [`MAX_STOCK_QUANTITY`]).
pub fn parse_quantity(value: &str) -> FieldResult<u32> {
    let quantity = parse_digits("quantity", value)?;
    if quantity > MAX_STOCK_QUANTITY {
        return Err(invalid("quantity", value));
    }
    Ok(quantity)
}

/// Validates a promotion tag; `null` means no promotion.
///
/// ## Example
/// ```rust
/// use till_core::validation::parse_promotion_tag;
///
/// assert_eq!(parse_promotion_tag("null").unwrap(), None);
/// assert_eq!(parse_promotion_tag("soda 2+1").unwrap().as_deref(), Some("soda 2+1"));
/// assert!(parse_promotion_tag("").is_err());
/// ```
pub fn parse_promotion_tag(value: &str) -> FieldResult<Option<String>> {
    let tag = value.trim();
    if tag == NO_PROMOTION {
        return Ok(None);
    }
    parse_name("promotion", tag).map(Some)
}

// =============================================================================
// Promotion Fields
// =============================================================================

/// Validates a buy or get count.
///
/// ## Rules
/// - Must be a positive integer; zero would make the group size degenerate
/// - At most [`MAX_PROMOTION_COUNT`]
pub fn parse_count(field: &'static str, value: &str) -> FieldResult<u32> {
    let count = parse_digits(field, value)?;
    if count == 0 || count > MAX_PROMOTION_COUNT {
        return Err(invalid(field, value));
    }
    Ok(count)
}

/// Validates a `YYYY-MM-DD` date.
pub fn parse_date(field: &'static str, value: &str) -> FieldResult<NaiveDate> {
    let value = value.trim();
    // chrono tolerates single-digit months and days; the format does not
    if value.len() != 10 {
        return Err(invalid(field, value));
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid(field, value))
}

// =============================================================================
// Unit Tests
// =============================================================================
