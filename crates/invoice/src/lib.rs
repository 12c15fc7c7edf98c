#![deny(unsafe_code)]

//! Quote and invoice line-item arithmetic.
//!
//! Everything here is pure; the browser binding reads the form, calls into
//! this crate and writes the formatted results back.

pub mod amount;
pub mod template;
pub mod totals;

pub use amount::{format_amount, format_euros, parse_amount};
pub use template::{ROW_INDEX_PLACEHOLDER, RowTemplate};
pub use totals::{
    GROSS_TOTAL_LABEL, InvoiceTotals, LineItem, REVERSE_CHARGE_TOTAL_LABEL, VAT_RATE,
    tax_row_visible, total_label,
};
