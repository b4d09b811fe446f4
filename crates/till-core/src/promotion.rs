//! # Promotion Registry
//!
//! In-memory table of buy/get promotion periods.
//!
//! ## Periods Per Name
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  name,buy,get,start_date,end_date                                       │
//! │  soda 2+1,2,1,2024-01-01,2024-06-30                                     │
//! │  soda 2+1,2,1,2024-09-01,2024-12-31   ◄── same name, disjoint: ✅       │
//! │  soda 2+1,2,1,2024-06-30,2024-07-15   ◄── shares 06-30: ❌ overlap      │
//! │                                                                         │
//! │  active_promotion_for("soda 2+1", 2024-10-05) → second row              │
//! │  active_promotion_for("soda 2+1", 2024-08-01) → None                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Because same-name periods never overlap, at most one period can match a
//! given day.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::PromotionError;
use crate::types::{Promotion, RawPromotionRow};
use crate::validation::{parse_count, parse_date, parse_name, InvalidField, MAX_PROMOTION_COUNT};

/// Header row of the promotion snapshot.
pub const PROMOTIONS_HEADER: &str = "name,buy,get,start_date,end_date";

/// Result type for registry construction.
pub type PromotionResult<T> = Result<T, PromotionError>;

/// The validated promotion table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PromotionRegistry {
    promotions: Vec<Promotion>,
}

impl PromotionRegistry {
    /// Parses and validates raw snapshot rows (numbered from 1).
    pub fn from_rows(rows: &[RawPromotionRow]) -> PromotionResult<Self> {
        let promotions = rows
            .iter()
            .enumerate()
            .map(|(i, row)| parse_row(i + 1, row))
            .collect::<PromotionResult<Vec<_>>>()?;

        Self::new(promotions)
    }

    /// Validates already-typed promotions.
    ///
    /// ## Checks (in order)
    /// 1. buy and get are positive and at most [`MAX_PROMOTION_COUNT`]
    /// 2. every period has `start <= end`
    /// 3. no two same-name periods overlap
    pub fn new(promotions: Vec<Promotion>) -> PromotionResult<Self> {
        for (i, promotion) in promotions.iter().enumerate() {
            if promotion.buy == 0 || promotion.buy > MAX_PROMOTION_COUNT {
                return Err(illegal(i + 1, "buy", &promotion.buy.to_string()));
            }
            if promotion.get == 0 || promotion.get > MAX_PROMOTION_COUNT {
                return Err(illegal(i + 1, "get", &promotion.get.to_string()));
            }
            if promotion.end < promotion.start {
                return Err(PromotionError::InvalidDateRange {
                    name: promotion.name.clone(),
                    start: promotion.start,
                    end: promotion.end,
                });
            }
        }

        for (i, first) in promotions.iter().enumerate() {
            let clash = promotions[i + 1..]
                .iter()
                .find(|second| second.name == first.name && first.overlaps(second));

            if let Some(second) = clash {
                return Err(PromotionError::OverlappingPromotionPeriod {
                    name: first.name.clone(),
                    first: (first.start, first.end),
                    second: (second.start, second.end),
                });
            }
        }

        debug!(promotions = promotions.len(), "Promotion registry validated");
        Ok(PromotionRegistry { promotions })
    }

    /// All periods in table order.
    pub fn promotions(&self) -> &[Promotion] {
        &self.promotions
    }

    /// Returns the period named `name` running on `today`, if any.
    pub fn active_promotion_for(&self, name: &str, today: NaiveDate) -> Option<&Promotion> {
        self.promotions
            .iter()
            .find(|p| p.name == name && p.is_active_on(today))
    }
}

fn parse_row(row: usize, raw: &RawPromotionRow) -> PromotionResult<Promotion> {
    let at_row = |e: InvalidField| PromotionError::IllegalPromotionType {
        row,
        field: e.field,
        value: e.value,
    };

    Ok(Promotion {
        name: parse_name("name", &raw.name).map_err(at_row)?,
        buy: parse_count("buy", &raw.buy).map_err(at_row)?,
        get: parse_count("get", &raw.get).map_err(at_row)?,
        start: parse_date("start_date", &raw.start_date).map_err(at_row)?,
        end: parse_date("end_date", &raw.end_date).map_err(at_row)?,
    })
}

fn illegal(row: usize, field: &'static str, value: &str) -> PromotionError {
    PromotionError::IllegalPromotionType {
        row,
        field,
        value: value.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, buy: &str, get: &str, start: &str, end: &str) -> RawPromotionRow {
        RawPromotionRow::new(name, buy, get, start, end)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_illegal_promotion_types() {
        for (buy, get, start, end, field) in [
            ("0", "1", "2024-01-01", "2024-12-31", "buy"),
            ("2", "-1", "2024-01-01", "2024-12-31", "get"),
            ("two", "1", "2024-01-01", "2024-12-31", "buy"),
            ("1", "4294967295", "2024-01-01", "2024-12-31", "get"),
            ("1001", "1", "2024-01-01", "2024-12-31", "buy"),
            ("2", "1", "2024-13-01", "2024-12-31", "start_date"),
            ("2", "1", "2024-01-01", "tomorrow", "end_date"),
        ] {
            let err = PromotionRegistry::from_rows(&[row("soda", buy, get, start, end)])
                .unwrap_err();
            match err {
                PromotionError::IllegalPromotionType { row, field: f, .. } => {
                    assert_eq!(row, 1);
                    assert_eq!(f, field);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_end_before_start_fails() {
        let err = PromotionRegistry::from_rows(&[row("soda", "2", "1", "2024-05-02", "2024-05-01")])
            .unwrap_err();
        assert_eq!(
            err,
            PromotionError::InvalidDateRange {
                name: "soda".to_string(),
                start: day(2024, 5, 2),
                end: day(2024, 5, 1),
            }
        );
    }

    #[test]
    fn test_single_day_period_is_valid() {
        let registry =
            PromotionRegistry::from_rows(&[row("flash", "1", "1", "2024-11-11", "2024-11-11")])
                .unwrap();
        assert!(registry
            .active_promotion_for("flash", day(2024, 11, 11))
            .is_some());
    }

    #[test]
    fn test_overlapping_same_name_periods_fail() {
        let err = PromotionRegistry::from_rows(&[
            row("soda", "2", "1", "2024-01-01", "2024-06-30"),
            row("soda", "2", "1", "2024-06-30", "2024-07-15"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            PromotionError::OverlappingPromotionPeriod { ref name, .. } if name == "soda"
        ));
    }

    #[test]
    fn test_overlap_detects_containment() {
        let err = PromotionRegistry::from_rows(&[
            row("soda", "2", "1", "2024-03-10", "2024-03-12"),
            row("soda", "1", "1", "2024-01-01", "2024-12-31"),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            PromotionError::OverlappingPromotionPeriod { .. }
        ));
    }

    #[test]
    fn test_new_rejects_oversized_counts() {
        let err = PromotionRegistry::new(vec![Promotion {
            name: "flash".to_string(),
            buy: 1,
            get: u32::MAX,
            start: day(2024, 1, 1),
            end: day(2024, 12, 31),
        }])
        .unwrap_err();
        assert!(matches!(
            err,
            PromotionError::IllegalPromotionType { row: 1, field: "get", .. }
        ));
    }

    #[test]
    fn test_different_names_may_overlap() {
        let registry = PromotionRegistry::from_rows(&[
            row("soda 2+1", "2", "1", "2024-01-01", "2024-12-31"),
            row("md pick", "1", "1", "2024-01-01", "2024-12-31"),
        ])
        .unwrap();
        assert_eq!(registry.promotions().len(), 2);
    }

    #[test]
    fn test_active_promotion_picks_matching_period() {
        let registry = PromotionRegistry::from_rows(&[
            row("soda", "2", "1", "2024-01-01", "2024-06-30"),
            row("soda", "1", "1", "2024-09-01", "2024-12-31"),
        ])
        .unwrap();

        let first = registry.active_promotion_for("soda", day(2024, 6, 30)).unwrap();
        assert_eq!(first.buy, 2);

        let second = registry.active_promotion_for("soda", day(2024, 9, 1)).unwrap();
        assert_eq!(second.buy, 1);

        assert!(registry.active_promotion_for("soda", day(2024, 8, 1)).is_none());
        assert!(registry.active_promotion_for("other", day(2024, 2, 1)).is_none());
    }
}
