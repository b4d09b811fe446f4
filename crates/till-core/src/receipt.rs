//! # Receipt
//!
//! Totals for a finished purchase.
//!
//! ## Discount Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal            Σ unit_price × quantity                            │
//! │  - promotion         Σ unit_price × free units                          │
//! │  - membership        min(rate × Σ uncovered amount, cap)                │
//! │  ───────────────────────────────────────────────                        │
//! │  = payable                                                              │
//! │                                                                         │
//! │  "uncovered" = units of a line outside every buy/get group that          │
//! │  yielded a free unit. Promoted units never earn the membership           │
//! │  discount a second time.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::pricing::LineQuote;
use crate::types::DiscountRate;
use crate::{DEFAULT_MEMBERSHIP_CAP, DEFAULT_MEMBERSHIP_RATE_BPS};

/// Membership discount terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipPolicy {
    pub rate: DiscountRate,
    pub cap: Money,
}

impl Default for MembershipPolicy {
    fn default() -> Self {
        MembershipPolicy {
            rate: DiscountRate::from_bps(DEFAULT_MEMBERSHIP_RATE_BPS),
            cap: Money::from_units(DEFAULT_MEMBERSHIP_CAP),
        }
    }
}

impl MembershipPolicy {
    /// Discount earned on `uncovered`, capped.
    pub fn discount_on(&self, uncovered: Money) -> Money {
        uncovered.percentage(self.rate).min(self.cap)
    }
}

/// A purchased product with its undiscounted amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchasedLine {
    pub name: String,
    pub quantity: u32,
    pub amount: Money,
}

/// Free units given for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FreeLine {
    pub name: String,
    pub quantity: u32,
}

/// A composed receipt. Formatting is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub purchased: Vec<PurchasedLine>,
    pub free: Vec<FreeLine>,
    pub total_quantity: u32,
    pub subtotal: Money,
    pub promotion_discount: Money,
    pub membership_discount: Money,
    pub payable: Money,
}

impl Receipt {
    /// Builds the receipt for settled lines.
    ///
    /// `membership` is `None` when the customer declined the membership
    /// discount. Lines with zero quantity are left out.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::money::Money;
    /// use till_core::receipt::{MembershipPolicy, Receipt};
    ///
    /// let receipt = Receipt::compose(&[], Some(&MembershipPolicy::default()));
    /// assert_eq!(receipt.payable, Money::zero());
    /// assert!(receipt.purchased.is_empty());
    /// ```
    pub fn compose(lines: &[LineQuote], membership: Option<&MembershipPolicy>) -> Receipt {
        let lines: Vec<&LineQuote> = lines.iter().filter(|l| l.quantity > 0).collect();

        let purchased = lines
            .iter()
            .map(|l| PurchasedLine {
                name: l.product.clone(),
                quantity: l.quantity,
                amount: l.gross(),
            })
            .collect();

        let free = lines
            .iter()
            .filter(|l| l.free_units > 0)
            .map(|l| FreeLine {
                name: l.product.clone(),
                quantity: l.free_units,
            })
            .collect();

        let total_quantity = lines.iter().map(|l| l.quantity).sum();
        let subtotal: Money = lines.iter().map(|l| l.gross()).sum();
        let promotion_discount: Money = lines.iter().map(|l| l.promotion_discount()).sum();

        let membership_discount = match membership {
            Some(policy) => {
                let uncovered: Money = lines.iter().map(|l| l.uncovered_amount()).sum();
                policy.discount_on(uncovered)
            }
            None => Money::zero(),
        };

        Receipt {
            purchased,
            free,
            total_quantity,
            subtotal,
            promotion_discount,
            membership_discount,
            payable: subtotal - promotion_discount - membership_discount,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
