//! Ledger summary and its full-precision intermediate totals.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::Amount;
use crate::model::PaymentStatus;

/// Totals derived from a form's line items and the amount already paid.
///
/// Never updated in place: every change produces a fresh summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSummary {
    pub subtotal: Amount,
    pub discount_amount: Amount,
    pub net_after_discount: Amount,
    pub vat: Amount,
    pub grand_total: Amount,
    pub amount_paid: Amount,
    pub balance_due: Amount,
    pub payment_status: PaymentStatus,
}

impl LedgerSummary {
    /// Summary of a form with no lines and nothing paid.
    pub const fn zero() -> Self {
        Self {
            subtotal: Amount::ZERO,
            discount_amount: Amount::ZERO,
            net_after_discount: Amount::ZERO,
            vat: Amount::ZERO,
            grand_total: Amount::ZERO,
            amount_paid: Amount::ZERO,
            balance_due: Amount::ZERO,
            payment_status: PaymentStatus::Pending,
        }
    }
}

impl Default for LedgerSummary {
    fn default() -> Self {
        Self::zero()
    }
}

/// Full-precision totals, rounded only when converted into a [`LedgerSummary`].
#[derive(Debug, Default)]
pub(super) struct RawTotals {
    pub subtotal: Decimal,
    pub discount_amount: Decimal,
    pub net_after_discount: Decimal,
    pub vat: Decimal,
    pub grand_total: Decimal,
    pub amount_paid: Decimal,
    pub balance_due: Decimal,
}

impl RawTotals {
    pub fn round(&self) -> LedgerSummary {
        let amount_paid = Amount::from_decimal(self.amount_paid);
        let balance_due = Amount::from_decimal(self.balance_due);
        LedgerSummary {
            subtotal: Amount::from_decimal(self.subtotal),
            discount_amount: Amount::from_decimal(self.discount_amount),
            net_after_discount: Amount::from_decimal(self.net_after_discount),
            vat: Amount::from_decimal(self.vat),
            grand_total: Amount::from_decimal(self.grand_total),
            amount_paid,
            balance_due,
            payment_status: payment_status(balance_due, amount_paid),
        }
    }
}

/// Derive the status from the rounded figures, so it always agrees with the
/// displayed balance.
fn payment_status(balance_due: Amount, amount_paid: Amount) -> PaymentStatus {
    if !balance_due.is_positive() {
        PaymentStatus::Paid
    } else if amount_paid.is_positive() {
        PaymentStatus::Partial
    } else {
        PaymentStatus::Pending
    }
}
