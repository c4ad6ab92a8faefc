//! Fee ledger computation.
//!
//! Turns raw line items, a VAT rate and the amount already paid into totals,
//! VAT, balance due and payment status. Every form that handles money calls
//! into this module, so the same inputs always give the same figures.

use rust_decimal::Decimal;
use tracing::debug;

use crate::Amount;
use crate::amount::MAX_AMOUNT;
use crate::model::LineItem;

mod error;
pub use error::{LedgerError, LineItemFault};

mod summary;
pub use summary::LedgerSummary;
use summary::RawTotals;

/// Largest accepted `unit_price × quantity` for a single line.
pub const MAX_LINE_NET: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// A line whose requested discount fell outside the allowed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountClamp {
    /// Position of the line in the input.
    pub position: usize,
    pub requested: Decimal,
    pub applied: Decimal,
}

/// Display figures for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTotals {
    pub line_net: Amount,
    pub line_discount: Amount,
    pub line_total: Amount,
}

/// Compute the ledger summary for `items`.
///
/// - Discounts are clamped to `[0, 20]` percent per line
/// - A negative `vat_rate` counts as 0, as does a negative or missing `amount_paid`
/// - `amount_paid` and VAT saturate at [`MAX_AMOUNT`]
/// - VAT applies to the net after discount
/// - Figures are kept at full precision and rounded half-up to 2 places once, at the end
///
/// Fails with [`LedgerError::InvalidLineItem`] on a negative price or
/// quantity; no partial summary is returned.
pub fn compute_ledger(
    items: &[LineItem],
    vat_rate: Decimal,
    amount_paid: Option<Decimal>,
) -> Result<LedgerSummary, LedgerError> {
    let mut raw = RawTotals::default();

    for (position, item) in items.iter().enumerate() {
        let (line_net, line_discount) = line_amounts(position, item)?;
        raw.subtotal += line_net;
        raw.discount_amount += line_discount;
    }

    raw.net_after_discount = raw.subtotal - raw.discount_amount;
    raw.vat = raw
        .net_after_discount
        .checked_mul(vat_rate.max(Decimal::ZERO))
        .map_or(MAX_AMOUNT, |vat| vat.min(MAX_AMOUNT));
    raw.grand_total = raw.net_after_discount + raw.vat;
    raw.amount_paid = amount_paid
        .unwrap_or_default()
        .clamp(Decimal::ZERO, MAX_AMOUNT);
    raw.balance_due = raw.grand_total - raw.amount_paid;

    let summary = raw.round();
    debug!(
        lines = items.len(),
        %vat_rate,
        grand_total = %summary.grand_total,
        balance_due = %summary.balance_due,
        status = %summary.payment_status,
        "ledger computed"
    );
    Ok(summary)
}

/// Lines of `items` whose discount was clamped, in input order.
pub fn discount_clamps(items: &[LineItem]) -> impl Iterator<Item = DiscountClamp> + '_ {
    items.iter().enumerate().filter_map(|(position, item)| {
        let applied = item.clamped_discount();
        (applied != item.discount_percent).then_some(DiscountClamp {
            position,
            requested: item.discount_percent,
            applied,
        })
    })
}

/// Rounded per-line figures, for tables that list each course or service.
pub fn line_breakdown(items: &[LineItem]) -> Result<Vec<LineTotals>, LedgerError> {
    items
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let (line_net, line_discount) = line_amounts(position, item)?;
            Ok(LineTotals {
                line_net: Amount::from_decimal(line_net),
                line_discount: Amount::from_decimal(line_discount),
                line_total: Amount::from_decimal(line_net - line_discount),
            })
        })
        .collect()
}

/// Validate one line and return its full-precision `(net, discount)`.
fn line_amounts(position: usize, item: &LineItem) -> Result<(Decimal, Decimal), LedgerError> {
    let invalid = |fault| LedgerError::InvalidLineItem { position, fault };

    if item.unit_price.is_sign_negative() && !item.unit_price.is_zero() {
        return Err(invalid(LineItemFault::NegativeUnitPrice(item.unit_price)));
    }
    if item.quantity.is_sign_negative() && !item.quantity.is_zero() {
        return Err(invalid(LineItemFault::NegativeQuantity(item.quantity)));
    }

    let line_net = item
        .unit_price
        .checked_mul(item.quantity)
        .filter(|net| *net <= MAX_LINE_NET)
        .ok_or(invalid(LineItemFault::TooLarge))?;
    let line_discount = line_net * item.clamped_discount() / Decimal::ONE_HUNDRED;

    Ok((line_net, line_discount))
}
