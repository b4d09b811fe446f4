//! # Pricing Orchestrator
//!
//! Turns "N units of product X today" into a settled line quote, pausing
//! for customer confirmation when the request does not fit the promotion.
//!
//! ## Line State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  price_line(product, qty, today)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  promotion running today? ──no──► Settled (price × qty, 0 free)         │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  allocate(qty, buy, get, promotional stock)                             │
//! │       │                                                                 │
//! │       ├─ honored < eligible ──► Pending(Shortfall { units })            │
//! │       │                           Y → Settled with honored units        │
//! │       │                           N → re-price (qty - units)            │
//! │       │                                                                 │
//! │       ├─ qty % (buy+get) ≠ 0 ──► Pending(Upsell { units })              │
//! │       │                           Y → re-price (qty + units)            │
//! │       │                           N → Settled at current allocation     │
//! │       │                                                                 │
//! │       └─ otherwise ───────────► Settled                                 │
//! │                                                                         │
//! │  Settled quotes are committed with `commit`, which deducts the draw.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A pending confirmation is a value carrying everything needed to continue,
//! so each branch can be driven without a console.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::allocation::{allocate, Allocation};
use crate::catalog::Catalog;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::promotion::PromotionRegistry;
use crate::types::{ProductRecord, Promotion, StockDraw};

// =============================================================================
// Quote Types
// =============================================================================

/// The promotion a settled line was priced under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedPromotion {
    pub name: String,
    pub buy: u32,
    pub get: u32,
}

impl AppliedPromotion {
    fn from_promotion(promotion: &Promotion) -> Self {
        AppliedPromotion {
            name: promotion.name.clone(),
            buy: promotion.buy,
            get: promotion.get,
        }
    }
}

/// A settled purchase line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineQuote {
    /// Product name.
    pub product: String,

    /// Unit price of the normal listing.
    pub unit_price: Money,

    /// Units the customer takes home.
    pub quantity: u32,

    /// Units given for free.
    pub free_units: u32,

    /// Amount owed for this line.
    pub charge: Money,

    /// Promotion in effect, if any.
    pub promotion: Option<AppliedPromotion>,

    /// Units to take from each listing on commit.
    pub draw: StockDraw,
}

impl LineQuote {
    /// Units paid for.
    #[inline]
    pub fn charged_units(&self) -> u32 {
        self.quantity - self.free_units
    }

    /// Line value before any discount.
    #[inline]
    pub fn gross(&self) -> Money {
        self.unit_price * self.quantity
    }

    /// Value of the free units.
    #[inline]
    pub fn promotion_discount(&self) -> Money {
        self.unit_price * self.free_units
    }

    /// Units belonging to a buy/get group that yielded free units.
    ///
    /// ```text
    /// 2+1, quantity 7, free 2  →  2 groups × 3 = 6 covered, 1 uncovered
    /// ```
    pub fn promotion_covered_units(&self) -> u32 {
        match &self.promotion {
            Some(p) if self.free_units > 0 => {
                let groups = self.free_units.div_ceil(p.get);
                groups
                    .saturating_mul(p.buy.saturating_add(p.get))
                    .min(self.quantity)
            }
            _ => 0,
        }
    }

    /// Value of the units outside any promotion group.
    ///
    /// This is the base of the membership discount.
    pub fn uncovered_amount(&self) -> Money {
        self.unit_price * (self.quantity - self.promotion_covered_units())
    }
}

/// The question a pending line is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Confirmation {
    /// Promotional stock cannot cover `units` free units; proceed with
    /// those units at normal price?
    Shortfall { units: u32 },

    /// Adding `units` completes one more buy/get group; add them?
    Upsell { units: u32 },
}

/// Where a line stands in the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LineState {
    product: String,
    requested: u32,
    today: NaiveDate,
    upsell_answered: bool,
    shortfall_accepted: bool,
}

/// A line waiting for a yes/no answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingConfirmation {
    state: LineState,
    question: Confirmation,
}

impl PendingConfirmation {
    /// Product being priced.
    pub fn product(&self) -> &str {
        &self.state.product
    }

    /// Quantity the question refers to.
    pub fn requested(&self) -> u32 {
        self.state.requested
    }

    /// The question to put to the customer.
    pub fn question(&self) -> Confirmation {
        self.question
    }
}

/// Result of one state machine step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingStep {
    Settled(LineQuote),
    Pending(PendingConfirmation),
}

// =============================================================================
// Pricing Engine
// =============================================================================

/// Catalog and promotions, plus the rules that price lines against them.
///
/// ## Usage
/// ```rust
/// use chrono::NaiveDate;
/// use till_core::catalog::Catalog;
/// use till_core::pricing::{Confirmation, PricingEngine, PricingStep};
/// use till_core::promotion::PromotionRegistry;
/// use till_core::types::{RawProductRow, RawPromotionRow};
///
/// let catalog = Catalog::from_rows(&[
///     RawProductRow::new("cola", "1000", "10", "soda 2+1"),
///     RawProductRow::new("cola", "1000", "10", "null"),
/// ]).unwrap();
/// let promotions = PromotionRegistry::from_rows(&[
///     RawPromotionRow::new("soda 2+1", "2", "1", "2024-01-01", "2024-12-31"),
/// ]).unwrap();
/// let mut engine = PricingEngine::new(catalog, promotions);
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
///
/// let PricingStep::Pending(pending) = engine.price_line("cola", 5, today).unwrap() else {
///     panic!("5 colas under 2+1 should offer one more");
/// };
/// assert_eq!(pending.question(), Confirmation::Upsell { units: 1 });
///
/// let PricingStep::Settled(quote) = engine.answer(pending, true).unwrap() else {
///     panic!("accepting settles the line");
/// };
/// assert_eq!((quote.quantity, quote.free_units, quote.charge.units()), (6, 2, 4000));
/// engine.commit(&quote).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct PricingEngine {
    catalog: Catalog,
    promotions: PromotionRegistry,
}

impl PricingEngine {
    pub fn new(catalog: Catalog, promotions: PromotionRegistry) -> Self {
        PricingEngine {
            catalog,
            promotions,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn promotions(&self) -> &PromotionRegistry {
        &self.promotions
    }

    /// The promotion running today for `product`'s promotional listing.
    pub fn active_promotion(&self, product: &str, today: NaiveDate) -> Option<&Promotion> {
        let listing = self.catalog.find_promotional(product).ok()?;
        let tag = listing.promotion.as_deref()?;
        self.promotions.active_promotion_for(tag, today)
    }

    /// Units of `product` that can be sold today.
    pub fn sellable_stock(&self, product: &str, today: NaiveDate) -> u32 {
        let running = self.active_promotion(product, today).is_some();
        self.catalog.available_stock(product, running)
    }

    /// Starts pricing a line.
    ///
    /// ## Errors
    /// - `ProductNotFound` if `product` has no normal listing
    /// - `InsufficientStock` if today's sellable stock cannot cover `requested`
    pub fn price_line(
        &self,
        product: &str,
        requested: u32,
        today: NaiveDate,
    ) -> CoreResult<PricingStep> {
        self.evaluate(LineState {
            product: product.to_string(),
            requested,
            today,
            upsell_answered: false,
            shortfall_accepted: false,
        })
    }

    /// Continues a pending line with the customer's answer.
    pub fn answer(&self, pending: PendingConfirmation, accept: bool) -> CoreResult<PricingStep> {
        let mut state = pending.state;
        debug!(
            product = %state.product,
            question = ?pending.question,
            accept,
            "Confirmation answered"
        );

        match (pending.question, accept) {
            (Confirmation::Shortfall { .. }, true) => {
                state.shortfall_accepted = true;
            }
            (Confirmation::Shortfall { units }, false) => {
                state.requested = state.requested.saturating_sub(units);
            }
            (Confirmation::Upsell { units }, true) => {
                state.requested = state.requested.saturating_add(units);
                state.upsell_answered = true;
            }
            (Confirmation::Upsell { .. }, false) => {
                state.upsell_answered = true;
            }
        }

        self.evaluate(state)
    }

    /// Deducts a settled line's draw from the catalog.
    ///
    /// Both listings change or neither does.
    pub fn commit(&mut self, quote: &LineQuote) -> CoreResult<()> {
        self.catalog.deduct_line(&quote.product, quote.draw)?;
        info!(
            product = %quote.product,
            quantity = quote.quantity,
            free = quote.free_units,
            charge = quote.charge.units(),
            "Line committed"
        );
        Ok(())
    }

    // =========================================================================
    // State Machine
    // =========================================================================

    fn evaluate(&self, state: LineState) -> CoreResult<PricingStep> {
        let normal = self.catalog.find_normal(&state.product)?;

        let running = self.active_promotion(&state.product, state.today);
        let Some(promotion) = running else {
            return self.settle_plain(normal, &state).map(PricingStep::Settled);
        };
        let listing = self.catalog.find_promotional(&state.product)?;

        let available = listing.quantity.saturating_add(normal.quantity);
        if state.requested > available {
            return Err(insufficient(&state, available));
        }

        let allocation = allocate(
            state.requested,
            promotion.buy,
            promotion.get,
            listing.quantity,
        );
        debug!(
            product = %state.product,
            requested = state.requested,
            normal_units = allocation.normal_units,
            eligible = allocation.eligible_free_units,
            honored = allocation.honored_free_units,
            "Allocated"
        );

        if !state.shortfall_accepted {
            let shortfall = allocation.shortfall();
            if shortfall > 0 {
                return Ok(pending(state, Confirmation::Shortfall { units: shortfall }));
            }

            let remainder = state.requested % promotion.group_size();
            if remainder != 0 && !state.upsell_answered {
                let units = promotion.group_size() - remainder;
                let fits = state
                    .requested
                    .checked_add(units)
                    .is_some_and(|total| total <= available);
                if fits {
                    return Ok(pending(state, Confirmation::Upsell { units }));
                }
            }
        }

        Ok(PricingStep::Settled(settle_promoted(
            normal, listing, promotion, &allocation, &state,
        )))
    }

    fn settle_plain(&self, normal: &ProductRecord, state: &LineState) -> CoreResult<LineQuote> {
        let sellable = state.requested == 0 || self.catalog.is_available(&state.product);
        if !sellable || state.requested > normal.quantity {
            return Err(insufficient(state, normal.quantity));
        }

        Ok(LineQuote {
            product: state.product.clone(),
            unit_price: normal.price,
            quantity: state.requested,
            free_units: 0,
            charge: normal.price * state.requested,
            promotion: None,
            draw: StockDraw {
                promotional: 0,
                normal: state.requested,
            },
        })
    }
}

/// Settles a line priced under a running promotion.
///
/// Normal units are always charged, so the free units are the honored ones
/// that fit inside the request: `min(honored, requested - normal)`. On an
/// exact group fit this equals the honored units.
///
/// Promotional stock is drawn first; the normal listing covers the rest.
fn settle_promoted(
    normal: &ProductRecord,
    listing: &ProductRecord,
    promotion: &Promotion,
    allocation: &Allocation,
    state: &LineState,
) -> LineQuote {
    let free_units = allocation.granted_free_units();
    let promotional = state.requested.min(listing.quantity);

    LineQuote {
        product: state.product.clone(),
        unit_price: normal.price,
        quantity: state.requested,
        free_units,
        charge: normal.price * (state.requested - free_units),
        promotion: Some(AppliedPromotion::from_promotion(promotion)),
        draw: StockDraw {
            promotional,
            normal: state.requested - promotional,
        },
    }
}

fn pending(state: LineState, question: Confirmation) -> PricingStep {
    debug!(product = %state.product, ?question, "Line awaiting confirmation");
    PricingStep::Pending(PendingConfirmation { state, question })
}

fn insufficient(state: &LineState, available: u32) -> CoreError {
    CoreError::InsufficientStock {
        name: state.product.clone(),
        available,
        requested: state.requested,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::{ListingKind, RawProductRow, RawPromotionRow};
    use crate::validation::{MAX_PROMOTION_COUNT, MAX_STOCK_QUANTITY};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn in_window() -> NaiveDate {
        day(2024, 6, 1)
    }

    fn engine(promo_qty: u32, normal_qty: u32) -> PricingEngine {
        let catalog = Catalog::from_rows(&[
            RawProductRow::new("cola", "1000", promo_qty.to_string(), "soda 2+1"),
            RawProductRow::new("cola", "1000", normal_qty.to_string(), "null"),
            RawProductRow::new("water", "500", "10", "null"),
            RawProductRow::new("chips", "1500", "5", "flash sale"),
            RawProductRow::new("chips", "1500", "5", "null"),
        ])
        .unwrap();
        let promotions = PromotionRegistry::from_rows(&[
            RawPromotionRow::new("soda 2+1", "2", "1", "2024-01-01", "2024-12-31"),
            RawPromotionRow::new("flash sale", "1", "1", "2024-11-01", "2024-11-30"),
        ])
        .unwrap();
        PricingEngine::new(catalog, promotions)
    }

    fn settled(step: PricingStep) -> LineQuote {
        match step {
            PricingStep::Settled(quote) => quote,
            PricingStep::Pending(p) => panic!("expected settled, got {:?}", p.question()),
        }
    }

    fn pending_of(step: PricingStep) -> PendingConfirmation {
        match step {
            PricingStep::Pending(p) => p,
            PricingStep::Settled(q) => panic!("expected pending, got {q:?}"),
        }
    }

    #[test]
    fn test_largest_stock_prices_without_overflow() {
        let max = MAX_STOCK_QUANTITY;
        let engine = engine(max, max);

        let quote = settled(engine.price_line("cola", 3, in_window()).unwrap());
        assert_eq!(quote.free_units, 1);
        assert_eq!(quote.charge, Money::from_units(2000));

        let err = engine.price_line("cola", u32::MAX, in_window()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock { available, .. } if available == 2 * max
        ));
    }

    #[test]
    fn test_largest_promotion_ratio() {
        let catalog = Catalog::from_rows(&[
            RawProductRow::new("cola", "1000", "10", "mega"),
            RawProductRow::new("cola", "1000", "10", "null"),
        ])
        .unwrap();
        let promotions = PromotionRegistry::from_rows(&[RawPromotionRow::new(
            "mega",
            "1",
            MAX_PROMOTION_COUNT.to_string(),
            "2024-01-01",
            "2024-12-31",
        )])
        .unwrap();
        let engine = PricingEngine::new(catalog, promotions);

        let pending = pending_of(engine.price_line("cola", 2, in_window()).unwrap());
        assert_eq!(pending.question(), Confirmation::Shortfall { units: 990 });

        let quote = settled(engine.answer(pending, true).unwrap());
        assert_eq!(quote.free_units, 1);
        assert_eq!(quote.charge, Money::from_units(1000));
    }

    #[test]
    fn test_non_promotional_product() {
        let engine = engine(10, 10);
        let quote = settled(engine.price_line("water", 3, in_window()).unwrap());
        assert_eq!(quote.charge, Money::from_units(1500));
        assert_eq!(quote.free_units, 0);
        assert_eq!(quote.promotion, None);
        assert_eq!(quote.draw, StockDraw { promotional: 0, normal: 3 });
    }

    #[test]
    fn test_upsell_then_accept() {
        let engine = engine(10, 10);
        let pending = pending_of(engine.price_line("cola", 5, in_window()).unwrap());
        assert_eq!(pending.question(), Confirmation::Upsell { units: 1 });
        assert_eq!(pending.product(), "cola");
        assert_eq!(pending.requested(), 5);

        let quote = settled(engine.answer(pending, true).unwrap());
        assert_eq!(quote.quantity, 6);
        assert_eq!(quote.free_units, 2);
        assert_eq!(quote.charge, Money::from_units(4000));
        assert_eq!(quote.draw, StockDraw { promotional: 6, normal: 0 });
    }

    #[test]
    fn test_upsell_then_decline() {
        let engine = engine(10, 10);
        let pending = pending_of(engine.price_line("cola", 5, in_window()).unwrap());
        let quote = settled(engine.answer(pending, false).unwrap());
        assert_eq!(quote.quantity, 5);
        assert_eq!(quote.free_units, 1);
        assert_eq!(quote.charge, Money::from_units(4000));
    }

    #[test]
    fn test_exact_group_settles_immediately() {
        let engine = engine(10, 10);
        let quote = settled(engine.price_line("cola", 3, in_window()).unwrap());
        assert_eq!(quote.free_units, 1);
        assert_eq!(quote.charge, Money::from_units(2000));
        assert_eq!(quote.promotion_covered_units(), 3);
        assert_eq!(quote.uncovered_amount(), Money::zero());
    }

    #[test]
    fn test_empty_promotional_stock_reports_full_shortfall() {
        let engine = engine(0, 10);
        let pending = pending_of(engine.price_line("cola", 2, in_window()).unwrap());
        assert_eq!(pending.question(), Confirmation::Shortfall { units: 1 });

        let accepted = settled(engine.answer(pending.clone(), true).unwrap());
        assert_eq!(accepted.quantity, 2);
        assert_eq!(accepted.free_units, 0);
        assert_eq!(accepted.charge, Money::from_units(2000));
        assert_eq!(accepted.draw, StockDraw { promotional: 0, normal: 2 });

        // Declining drops the unhonored unit; 1 is still short of a group
        let upsell = pending_of(engine.answer(pending, false).unwrap());
        assert_eq!(upsell.requested(), 1);
        assert_eq!(upsell.question(), Confirmation::Upsell { units: 2 });

        let declined = settled(engine.answer(upsell, false).unwrap());
        assert_eq!(declined.quantity, 1);
        assert_eq!(declined.free_units, 0);
        assert_eq!(declined.charge, Money::from_units(1000));
    }

    #[test]
    fn test_partial_promotional_stock() {
        // 9 colas under 2+1 want 3 free, only 2 promotional units remain
        let engine = engine(2, 10);
        let pending = pending_of(engine.price_line("cola", 9, in_window()).unwrap());
        assert_eq!(pending.question(), Confirmation::Shortfall { units: 1 });

        let quote = settled(engine.answer(pending, true).unwrap());
        assert_eq!(quote.free_units, 2);
        assert_eq!(quote.charge, Money::from_units(7000));
        assert_eq!(quote.draw, StockDraw { promotional: 2, normal: 7 });
    }

    #[test]
    fn test_accepted_upsell_rechecks_promotional_stock() {
        let engine = engine(1, 10);
        let upsell = pending_of(engine.price_line("cola", 4, in_window()).unwrap());
        assert_eq!(upsell.question(), Confirmation::Upsell { units: 2 });

        let shortfall = pending_of(engine.answer(upsell, true).unwrap());
        assert_eq!(shortfall.requested(), 6);
        assert_eq!(shortfall.question(), Confirmation::Shortfall { units: 1 });

        let quote = settled(engine.answer(shortfall, true).unwrap());
        assert_eq!(quote.quantity, 6);
        assert_eq!(quote.free_units, 1);
        assert_eq!(quote.charge, Money::from_units(5000));
    }

    #[test]
    fn test_upsell_not_offered_beyond_stock() {
        let engine = engine(5, 0);
        let quote = settled(engine.price_line("cola", 5, in_window()).unwrap());
        assert_eq!(quote.quantity, 5);
        assert_eq!(quote.free_units, 1);
    }

    #[test]
    fn test_out_of_window_prices_as_normal_product() {
        let engine = engine(10, 10);
        let quote = settled(engine.price_line("chips", 2, day(2024, 2, 1)).unwrap());
        assert_eq!(quote.charge, Money::from_units(3000));
        assert_eq!(quote.free_units, 0);
        assert_eq!(quote.promotion, None);
        assert_eq!(quote.draw, StockDraw { promotional: 0, normal: 2 });

        // Inside the window the same request gets 1+1
        let quote = settled(engine.price_line("chips", 2, day(2024, 11, 15)).unwrap());
        assert_eq!(quote.charge, Money::from_units(1500));
        assert_eq!(quote.free_units, 1);
    }

    #[test]
    fn test_request_beyond_stock() {
        let engine = engine(1, 10);
        let err = engine.price_line("cola", 12, in_window()).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                name: "cola".to_string(),
                available: 11,
                requested: 12,
            }
        );

        // Outside the window promotional units are not sellable
        let err = engine.price_line("chips", 6, day(2024, 1, 10)).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 5, .. }));
    }

    #[test]
    fn test_unknown_product() {
        let engine = engine(1, 1);
        let err = engine.price_line("ghost", 1, in_window()).unwrap_err();
        assert_eq!(
            err,
            CoreError::ProductNotFound {
                name: "ghost".to_string(),
                listing: ListingKind::Normal,
            }
        );
    }

    #[test]
    fn test_commit_deducts_settled_draw_only() {
        let mut engine = engine(10, 10);
        let pending = pending_of(engine.price_line("cola", 5, in_window()).unwrap());
        let quote = settled(engine.answer(pending, true).unwrap());
        engine.commit(&quote).unwrap();

        assert_eq!(engine.catalog().find_promotional("cola").unwrap().quantity, 4);
        assert_eq!(engine.catalog().find_normal("cola").unwrap().quantity, 10);
    }

    #[test]
    fn test_uncovered_amount_with_shortfall_units() {
        let engine = engine(2, 10);
        let pending = pending_of(engine.price_line("cola", 9, in_window()).unwrap());
        let quote = settled(engine.answer(pending, true).unwrap());
        // 2 free → 2 groups of 3 covered, 3 units at normal price
        assert_eq!(quote.promotion_covered_units(), 6);
        assert_eq!(quote.uncovered_amount(), Money::from_units(3000));
        assert_eq!(quote.promotion_discount(), Money::from_units(2000));
        assert_eq!(quote.gross(), Money::from_units(9000));
        assert_eq!(quote.charged_units(), 7);
    }

    #[test]
    fn test_sellable_stock_follows_window() {
        let engine = engine(3, 4);
        assert_eq!(engine.sellable_stock("cola", in_window()), 7);
        assert_eq!(engine.sellable_stock("cola", day(2025, 1, 1)), 4);
    }
}
