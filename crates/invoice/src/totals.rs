use serde::{Deserialize, Serialize};

use crate::amount::parse_amount;

pub const VAT_RATE: f64 = 0.20;
pub const GROSS_TOTAL_LABEL: &str = "Total TTC :";
pub const REVERSE_CHARGE_TOTAL_LABEL: &str = "Total HT (Autoliq) :";

/// One quote/invoice row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(quantity: f64, unit_price: f64) -> Self {
        Self {
            quantity,
            unit_price,
        }
    }

    /// Builds a row from raw quantity and unit price field values.
    pub fn from_inputs(quantity: &str, unit_price: &str) -> Self {
        Self::new(parse_amount(quantity), parse_amount(unit_price))
    }

    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

/// Summary block: net (HT), VAT (TVA) and gross (TTC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub net: f64,
    pub tax: f64,
    pub gross: f64,
    pub reverse_charge: bool,
}

impl InvoiceTotals {
    /// Recomputes every total from the rows. Under reverse charge no VAT is due.
    pub fn compute(rows: &[LineItem], reverse_charge: bool) -> Self {
        let net: f64 = rows.iter().map(LineItem::line_total).sum();
        let tax = if reverse_charge { 0.0 } else { net * VAT_RATE };

        Self {
            net,
            tax,
            gross: net + tax,
            reverse_charge,
        }
    }

    pub fn label(&self) -> &'static str {
        total_label(self.reverse_charge)
    }
}

pub fn total_label(reverse_charge: bool) -> &'static str {
    if reverse_charge {
        REVERSE_CHARGE_TOTAL_LABEL
    } else {
        GROSS_TOTAL_LABEL
    }
}

pub fn tax_row_visible(reverse_charge: bool) -> bool {
    !reverse_charge
}
