//! # Allocation Engine
//!
//! Splits a requested quantity into paid units and buy/get free units.
//!
//! ## Unit-by-Unit Allocation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  buy = 2, get = 1, requested = 5                                        │
//! │                                                                         │
//! │  paid  free  total                                                      │
//! │   1     0     1     1 < 5, keep going                                   │
//! │   2     1     3     2 is a multiple of buy → +1 free                    │
//! │   3     1     4                                                         │
//! │   4     2     6     4 is a multiple of buy → +1 free, 6 ≥ 5: stop       │
//! │                                                                         │
//! │  normal_units = 4, eligible_free_units = 2, overshoot = 1               │
//! │  honored_free_units = min(2, promotional stock)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The allocation stops at the first point where paid + free covers the
//! request. An overshoot means the last group's free unit lies beyond the
//! request: the customer can take it by adding `overshoot` units.
//!
//! [`allocate`] reaches that stopping point directly: `k` complete groups
//! cover `k × (buy + get)` units, and the remainder `r` needs `min(r, buy)`
//! more paid units.

use serde::{Deserialize, Serialize};

/// Outcome of [`allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Units the allocation asked for.
    pub requested: u32,

    /// Paid units.
    pub normal_units: u32,

    /// Free units the buy/get ratio entitles the customer to.
    pub eligible_free_units: u32,

    /// Eligible free units capped by promotional stock.
    pub honored_free_units: u32,
}

impl Allocation {
    /// Free units promised by the ratio but not covered by stock.
    #[inline]
    pub fn shortfall(&self) -> u32 {
        self.eligible_free_units.saturating_sub(self.honored_free_units)
    }

    /// Units by which paid + free exceeds the request.
    #[inline]
    pub fn overshoot(&self) -> u32 {
        let covered = u64::from(self.normal_units) + u64::from(self.eligible_free_units);
        clamp_u32(covered.saturating_sub(u64::from(self.requested)))
    }

    /// Free units that fit inside the request and are backed by stock.
    #[inline]
    pub fn granted_free_units(&self) -> u32 {
        self.honored_free_units
            .min(self.requested.saturating_sub(self.normal_units))
    }
}

/// Allocates `requested` units under a `buy`+`get` promotion.
///
/// ## Example
/// ```rust
/// use till_core::allocation::allocate;
///
/// let a = allocate(5, 2, 1, 10);
/// assert_eq!(
///     (a.normal_units, a.eligible_free_units, a.honored_free_units),
///     (4, 2, 2)
/// );
///
/// // No promotional stock left: nothing can be honored
/// let a = allocate(2, 2, 1, 0);
/// assert_eq!(a.eligible_free_units, 1);
/// assert_eq!(a.honored_free_units, 0);
/// ```
///
/// A zero `buy` or `get` (rejected by the promotion registry) degenerates
/// to "everything paid".
pub fn allocate(requested: u32, buy: u32, get: u32, available_promotional_stock: u32) -> Allocation {
    if buy == 0 || get == 0 {
        return Allocation {
            requested,
            normal_units: requested,
            eligible_free_units: 0,
            honored_free_units: 0,
        };
    }

    let (q, b, g) = (u64::from(requested), u64::from(buy), u64::from(get));
    let groups = q / (b + g);
    let remainder = q % (b + g);

    let normal = groups * b + remainder.min(b);
    let eligible = (normal / b) * g;

    // normal <= requested, so only the free units can leave u32
    let normal_units = clamp_u32(normal);
    let eligible_free_units = clamp_u32(eligible);

    Allocation {
        requested,
        normal_units,
        eligible_free_units,
        honored_free_units: eligible_free_units.min(available_promotional_stock),
    }
}

fn clamp_u32(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_request() {
        let a = allocate(0, 2, 1, 10);
        assert_eq!(a.normal_units, 0);
        assert_eq!(a.eligible_free_units, 0);
        assert_eq!(a.honored_free_units, 0);
        assert_eq!(a.overshoot(), 0);
    }

    #[test]
    fn test_two_plus_one_scenarios() {
        let cases = [
            // (requested, normal, eligible)
            (1, 1, 0),
            (2, 2, 1),
            (3, 2, 1),
            (4, 3, 1),
            (5, 4, 2),
            (6, 4, 2),
            (9, 6, 3),
        ];
        for (requested, normal, eligible) in cases {
            let a = allocate(requested, 2, 1, 100);
            assert_eq!(a.normal_units, normal, "normal for {requested}");
            assert_eq!(a.eligible_free_units, eligible, "eligible for {requested}");
            assert_eq!(a.honored_free_units, eligible);
        }
    }

    #[test]
    fn test_one_plus_one() {
        let a = allocate(3, 1, 1, 100);
        assert_eq!((a.normal_units, a.eligible_free_units), (2, 2));
        assert_eq!(a.overshoot(), 1);
        assert_eq!(a.granted_free_units(), 1);
    }

    #[test]
    fn test_stock_caps_honored_units() {
        let a = allocate(9, 2, 1, 2);
        assert_eq!(a.eligible_free_units, 3);
        assert_eq!(a.honored_free_units, 2);
        assert_eq!(a.shortfall(), 1);
    }

    #[test]
    fn test_granted_excludes_units_beyond_request() {
        let a = allocate(5, 2, 1, 10);
        assert_eq!(a.overshoot(), 1);
        assert_eq!(a.granted_free_units(), 1);

        let exact = allocate(6, 2, 1, 10);
        assert_eq!(exact.overshoot(), 0);
        assert_eq!(exact.granted_free_units(), 2);
    }

    #[test]
    fn test_extreme_ratio_does_not_overflow() {
        let a = allocate(2, 1, u32::MAX, 10);
        assert_eq!(a.normal_units, 1);
        assert_eq!(a.eligible_free_units, u32::MAX);
        assert_eq!(a.honored_free_units, 10);
        assert_eq!(a.granted_free_units(), 1);
        assert_eq!(a.overshoot(), u32::MAX - 1);
    }

    #[test]
    fn test_huge_request_is_immediate() {
        let a = allocate(u32::MAX, 2, 1, 0);
        // u32::MAX = 3 × 1_431_655_765
        assert_eq!(a.normal_units, 2_863_311_530);
        assert_eq!(a.eligible_free_units, 1_431_655_765);
        assert_eq!(a.shortfall(), 1_431_655_765);
        assert_eq!(a.overshoot(), 0);
    }

    #[test]
    fn test_degenerate_ratio_charges_everything() {
        let a = allocate(4, 0, 1, 10);
        assert_eq!(a.normal_units, 4);
        assert_eq!(a.eligible_free_units, 0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        /// Adds one paid unit at a time until paid + free covers the request.
        fn allocate_stepwise(requested: u32, buy: u32, get: u32) -> (u64, u64) {
            let (mut normal, mut eligible) = (0u64, 0u64);
            while normal + eligible < u64::from(requested) {
                normal += 1;
                if normal % u64::from(buy) == 0 {
                    eligible += u64::from(get);
                }
            }
            (normal, eligible)
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 500,
                ..ProptestConfig::default()
            })]

            /// Property: with unbounded stock, paid + free covers the request
            /// and no earlier stopping point does.
            #[test]
            fn allocation_covers_request_minimally(
                requested in 0u32..500,
                buy in 1u32..10,
                get in 1u32..5,
            ) {
                let a = allocate(requested, buy, get, u32::MAX);
                prop_assert!(a.normal_units + a.eligible_free_units >= requested);

                if a.normal_units > 0 {
                    let previous = a.normal_units - 1;
                    let previous_free = (previous / buy) * get;
                    prop_assert!(previous + previous_free < requested);
                }
            }

            /// Property: the direct computation stops where stepping one
            /// paid unit at a time does.
            #[test]
            fn matches_stepwise_allocation(
                requested in 0u32..2_000,
                buy in 1u32..50,
                get in 1u32..50,
            ) {
                let a = allocate(requested, buy, get, u32::MAX);
                let (normal, eligible) = allocate_stepwise(requested, buy, get);
                prop_assert_eq!(u64::from(a.normal_units), normal);
                prop_assert_eq!(u64::from(a.eligible_free_units), eligible);
            }

            /// Property: free units are `get` per completed multiple of `buy`.
            #[test]
            fn eligible_is_get_per_completed_group(
                requested in 0u32..500,
                buy in 1u32..10,
                get in 1u32..5,
            ) {
                let a = allocate(requested, buy, get, u32::MAX);
                prop_assert_eq!(a.eligible_free_units, (a.normal_units / buy) * get);
                prop_assert_eq!(a.honored_free_units, a.eligible_free_units);
            }

            /// Property: a larger request never yields fewer paid or free units.
            #[test]
            fn allocation_is_monotonic(
                requested in 0u32..500,
                extra in 0u32..50,
                buy in 1u32..10,
                get in 1u32..5,
                stock in 0u32..100,
            ) {
                let smaller = allocate(requested, buy, get, stock);
                let larger = allocate(requested + extra, buy, get, stock);
                prop_assert!(larger.normal_units >= smaller.normal_units);
                prop_assert!(larger.eligible_free_units >= smaller.eligible_free_units);
                prop_assert!(larger.honored_free_units >= smaller.honored_free_units);
            }

            /// Property: honored units never exceed stock or eligibility, and
            /// granted units never push the line past the request.
            #[test]
            fn honored_is_capped(
                requested in 0u32..500,
                buy in 1u32..10,
                get in 1u32..5,
                stock in 0u32..100,
            ) {
                let a = allocate(requested, buy, get, stock);
                prop_assert!(a.honored_free_units <= stock);
                prop_assert!(a.honored_free_units <= a.eligible_free_units);
                prop_assert!(a.normal_units <= requested);
                prop_assert!(a.normal_units + a.granted_free_units() <= requested);
            }
        }
    }
}
