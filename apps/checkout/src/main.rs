//! # Till Checkout Entry Point
//!
//! The actual setup is in lib.rs so the session can be tested without a
//! terminal.

fn main() -> anyhow::Result<()> {
    till_checkout::run()
}
