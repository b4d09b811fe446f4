//! # Checkout Session
//!
//! Drives the purchase loop against a [`PricingEngine`].
//!
//! ## Purchase Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  show catalog                                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  read "[name-qty],..." ──► parse + stock precheck ──✗──► [ERROR], again │
//! │       │ ✓                                                               │
//! │       ▼                                                                 │
//! │  price each line ──► Pending? ask Y/N (invalid answer → [ERROR], again) │
//! │       │ all settled                                                     │
//! │       ▼                                                                 │
//! │  membership Y/N ──► commit lines ──► save products.md ──► receipt       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  buy more? Y ──► back to the top        N ──► done                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock changes only after every line of a purchase has settled. A purchase
//! abandoned by an error or closed input leaves the catalog untouched.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use till_core::{
    parse_confirmation, parse_purchase_request, CoreError, LineQuote, MembershipPolicy, OrderItem,
    PricingEngine, PricingStep, Receipt,
};
use till_store::SnapshotStore;

use crate::config::ReceiptFormat;
use crate::console::Prompt;
use crate::error::{SessionError, SessionResult};
use crate::view;

/// One customer at the counter, possibly buying several times.
pub struct Session<'a, P: Prompt> {
    engine: PricingEngine,
    store: &'a SnapshotStore,
    prompt: P,
    membership: MembershipPolicy,
    today: NaiveDate,
    receipt_format: ReceiptFormat,
}

impl<'a, P: Prompt> Session<'a, P> {
    pub fn new(
        engine: PricingEngine,
        store: &'a SnapshotStore,
        prompt: P,
        membership: MembershipPolicy,
        today: NaiveDate,
        receipt_format: ReceiptFormat,
    ) -> Self {
        Session {
            engine,
            store,
            prompt,
            membership,
            today,
            receipt_format,
        }
    }

    pub fn engine(&self) -> &PricingEngine {
        &self.engine
    }

    /// Releases the prompt, e.g. to inspect scripted output.
    pub fn into_prompt(self) -> P {
        self.prompt
    }

    /// Runs purchases until the customer is done or input closes.
    pub fn run(&mut self) -> SessionResult<()> {
        info!(today = %self.today, "Checkout session started");
        match self.run_purchases() {
            Err(SessionError::InputClosed) => {
                info!("Input closed, ending session");
                Ok(())
            }
            other => other,
        }
    }

    fn run_purchases(&mut self) -> SessionResult<()> {
        loop {
            let listing = view::render_catalog(&self.engine, self.today);
            self.prompt.show(&listing)?;

            let quotes = self.take_order()?;
            let member = self.ask_yes_no(view::MEMBERSHIP_PROMPT)?;

            for quote in &quotes {
                self.engine.commit(quote)?;
            }
            self.store.save_catalog(self.engine.catalog())?;

            let receipt = Receipt::compose(&quotes, member.then_some(&self.membership));
            info!(
                lines = quotes.len(),
                payable = receipt.payable.units(),
                "Purchase completed"
            );
            let rendered = match self.receipt_format {
                ReceiptFormat::Text => view::render_receipt_text(&receipt),
                ReceiptFormat::Json => view::render_receipt_json(&receipt)?,
            };
            self.prompt.show(&rendered)?;

            if !self.ask_yes_no(view::CONTINUE_PROMPT)? {
                return Ok(());
            }
        }
    }

    /// Reads purchase requests until one settles completely.
    fn take_order(&mut self) -> SessionResult<Vec<LineQuote>> {
        loop {
            let line = self.ask(view::PURCHASE_PROMPT)?;
            match self.price_request(&line) {
                Ok(quotes) => return Ok(quotes),
                Err(SessionError::Core(err)) if err.is_recoverable() => {
                    warn!(error = %err, "Purchase request rejected");
                    self.prompt.show(&view::render_error(&err))?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn price_request(&mut self, line: &str) -> SessionResult<Vec<LineQuote>> {
        let items = parse_purchase_request(line)?;
        for item in &items {
            self.precheck(item)?;
        }

        let mut quotes = Vec::with_capacity(items.len());
        for item in &items {
            quotes.push(self.settle(item)?);
        }
        Ok(quotes)
    }

    /// Rejects unknown products and oversized requests before any question
    /// is asked.
    fn precheck(&self, item: &OrderItem) -> Result<(), CoreError> {
        self.engine.catalog().find_normal(&item.name)?;
        let available = self.engine.sellable_stock(&item.name, self.today);
        if item.quantity > available {
            return Err(CoreError::InsufficientStock {
                name: item.name.clone(),
                available,
                requested: item.quantity,
            });
        }
        Ok(())
    }

    fn settle(&mut self, item: &OrderItem) -> SessionResult<LineQuote> {
        let mut step = self.engine.price_line(&item.name, item.quantity, self.today)?;
        loop {
            match step {
                PricingStep::Settled(quote) => {
                    debug!(product = %quote.product, quantity = quote.quantity, "Line settled");
                    return Ok(quote);
                }
                PricingStep::Pending(pending) => {
                    let accept = self.ask_yes_no(&view::render_question(&pending))?;
                    step = self.engine.answer(pending, accept)?;
                }
            }
        }
    }

    /// Asks until the answer is `Y` or `N`.
    fn ask_yes_no(&mut self, question: &str) -> SessionResult<bool> {
        loop {
            let answer = self.ask(question)?;
            match parse_confirmation(&answer) {
                Ok(yes) => return Ok(yes),
                Err(err) => {
                    warn!(error = %err, "Invalid answer");
                    self.prompt.show(&view::render_error(&err))?;
                }
            }
        }
    }

    fn ask(&mut self, question: &str) -> SessionResult<String> {
        self.prompt.show(question)?;
        self.prompt.read_line()?.ok_or(SessionError::InputClosed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ConsolePrompt;
    use std::fs;
    use std::io::Cursor;
    use std::path::PathBuf;
    use till_store::SnapshotConfig;

    const PRODUCTS: &str = "name,price,quantity,promotion\n\
                            cola,1000,10,soda 2+1\n\
                            cola,1000,10,null\n\
                            water,500,10,null\n\
                            energy bar,2000,5,null\n";

    const PROMOTIONS: &str = "name,buy,get,start_date,end_date\n\
                              soda 2+1,2,1,2024-01-01,2024-12-31\n";

    type Scripted = ConsolePrompt<Cursor<String>, Vec<u8>>;

    fn scratch_store(name: &str) -> SnapshotStore {
        let dir: PathBuf =
            std::env::temp_dir().join(format!("till-session-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("products.md"), PRODUCTS).unwrap();
        fs::write(dir.join("promotions.md"), PROMOTIONS).unwrap();
        SnapshotStore::new(SnapshotConfig::in_dir(&dir))
    }

    /// Runs a whole session over `input`; returns the printed text.
    fn run_script(store: &SnapshotStore, input: &str, format: ReceiptFormat) -> String {
        let engine = PricingEngine::new(
            store.load_catalog().unwrap(),
            store.load_promotions().unwrap(),
        );
        let prompt: Scripted = ConsolePrompt::new(Cursor::new(input.to_string()), Vec::new());
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut session = Session::new(
            engine,
            store,
            prompt,
            MembershipPolicy::default(),
            today,
            format,
        );
        session.run().unwrap();
        String::from_utf8(session.into_prompt().into_output()).unwrap()
    }

    #[test]
    fn test_upsell_accepted_and_saved() {
        let store = scratch_store("upsell");
        let out = run_script(&store, "[cola-5]\nY\nN\nN\n", ReceiptFormat::Text);

        assert!(out.contains("Adding 1 more cola"));
        assert!(out
            .lines()
            .any(|l| l.starts_with("Payable") && l.ends_with(" 4,000")));

        let saved = store.load_catalog().unwrap();
        assert_eq!(saved.find_promotional("cola").unwrap().quantity, 4);
        assert_eq!(saved.find_normal("cola").unwrap().quantity, 10);
    }

    #[test]
    fn test_errors_reprompt_without_touching_stock() {
        let store = scratch_store("errors");
        let input = "[ghost-1]\n[water-11]\ncola-1\n[water-2]\nmaybe\nY\nN\n";
        let out = run_script(&store, input, ReceiptFormat::Text);

        assert_eq!(out.matches("[ERROR]").count(), 4);
        assert!(out.contains("Product not found: ghost"));
        assert!(out.contains("Insufficient stock for water: available 10, requested 11"));
        // 30% of 1,000
        assert!(out.contains("-300"));

        let saved = store.load_catalog().unwrap();
        assert_eq!(saved.find_normal("water").unwrap().quantity, 8);
    }

    #[test]
    fn test_shortfall_flow_with_two_purchases() {
        let store = scratch_store("shortfall");
        // First purchase drains the promotional listing (upsell declined),
        // so the second one cannot honor its free cola
        let input = "[cola-10],[energy bar-1]\nN\nN\nY\n[cola-3]\nY\nN\nN\n";
        let out = run_script(&store, input, ReceiptFormat::Text);

        assert!(out.contains("Adding 2 more cola"));
        assert!(out.contains("Promotion stock is short for cola: 1 free unit(s)"));

        let saved = store.load_catalog().unwrap();
        assert_eq!(saved.find_promotional("cola").unwrap().quantity, 0);
        assert_eq!(saved.find_normal("cola").unwrap().quantity, 7);
        assert_eq!(saved.find_normal("energy bar").unwrap().quantity, 4);
    }

    #[test]
    fn test_closed_input_ends_quietly() {
        let store = scratch_store("closed");
        let out = run_script(&store, "[cola-5]\n", ReceiptFormat::Text);
        assert!(out.contains("Adding 1 more cola"));

        let saved = store.load_catalog().unwrap();
        assert_eq!(saved.find_promotional("cola").unwrap().quantity, 10);
    }

    #[test]
    fn test_json_receipt() {
        let store = scratch_store("json");
        let out = run_script(&store, "[water-2]\nN\nN\n", ReceiptFormat::Json);
        assert!(out.contains("\"payable\": 1000"));
        assert!(out.contains("\"membership_discount\": 0"));
    }
}
