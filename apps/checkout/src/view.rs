//! # Console View
//!
//! Text rendering for everything the checkout prints. Nothing here reads
//! input or touches stock.
//!
//! ```text
//! Hello. Welcome to the Till convenience store.
//! Here are the products we have.
//!
//! - cola 1,000 won 10 units soda 2+1
//! - cola 1,000 won 10 units
//! - water 500 won Out of stock
//! ```

use chrono::NaiveDate;
use std::fmt::Display;

use till_core::pricing::{Confirmation, PendingConfirmation};
use till_core::{PricingEngine, Receipt};

pub const PURCHASE_PROMPT: &str =
    "Please enter the product name and quantity. (e.g. [cola-2],[water-1])";

pub const MEMBERSHIP_PROMPT: &str = "Would you like the membership discount? (Y/N)";

pub const CONTINUE_PROMPT: &str =
    "Thank you for shopping. Would you like to buy anything else? (Y/N)";

/// The catalog listing shown before each purchase.
///
/// Every listing is shown in table order; a promotional listing carries its
/// tag whether or not the promotion is running on `today`.
pub fn render_catalog(engine: &PricingEngine, today: NaiveDate) -> String {
    let mut out = String::from(
        "Hello. Welcome to the Till convenience store.\nHere are the products we have.\n",
    );

    for record in engine.catalog().records() {
        let stock = if record.in_stock() {
            format!("{} units", record.quantity)
        } else {
            "Out of stock".to_string()
        };
        out.push_str(&format!("\n- {} {} won {}", record.name, record.price, stock));

        if let Some(tag) = &record.promotion {
            out.push_str(&format!(" {tag}"));
            if engine.active_promotion(&record.name, today).is_none() {
                out.push_str(" (not running today)");
            }
        }
    }
    out.push('\n');
    out
}

/// The question for a pending line.
pub fn render_question(pending: &PendingConfirmation) -> String {
    let name = pending.product();
    match pending.question() {
        Confirmation::Upsell { units } => format!(
            "Adding {units} more {name} completes another promotion group. \
             Would you like to add them? (Y/N)"
        ),
        Confirmation::Shortfall { units } => format!(
            "Promotion stock is short for {name}: {units} free unit(s) cannot be given. \
             Would you like to continue at full price for the rest? (Y/N)"
        ),
    }
}

/// An error line for a recoverable mistake.
pub fn render_error(err: &dyn Display) -> String {
    format!("[ERROR] {err} Please try again.")
}

/// The receipt as aligned text columns.
pub fn render_receipt_text(receipt: &Receipt) -> String {
    let mut lines = vec![
        "==============Till================".to_string(),
        format!("{:<16}{:>8}{:>12}", "Product", "Qty", "Amount"),
    ];
    for line in &receipt.purchased {
        lines.push(format!(
            "{:<16}{:>8}{:>12}",
            line.name,
            line.quantity,
            line.amount.to_string()
        ));
    }

    if !receipt.free.is_empty() {
        lines.push("==============FREE================".to_string());
        for line in &receipt.free {
            lines.push(format!("{:<16}{:>8}", line.name, line.quantity));
        }
    }

    lines.push("==================================".to_string());
    lines.push(format!(
        "{:<16}{:>8}{:>12}",
        "Total",
        receipt.total_quantity,
        receipt.subtotal.to_string()
    ));
    lines.push(format!(
        "{:<24}{:>12}",
        "Promotion discount",
        format!("-{}", receipt.promotion_discount)
    ));
    lines.push(format!(
        "{:<24}{:>12}",
        "Membership discount",
        format!("-{}", receipt.membership_discount)
    ));
    lines.push(format!("{:<24}{:>12}", "Payable", receipt.payable.to_string()));
    lines.join("\n")
}

/// The receipt as pretty JSON.
pub fn render_receipt_json(receipt: &Receipt) -> serde_json::Result<String> {
    serde_json::to_string_pretty(receipt)
}
