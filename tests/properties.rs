use fee_ledger::{Amount, LineItem, PaymentStatus, compute_ledger};
use proptest::prelude::*;
use rust_decimal::Decimal;

// ── Strategies ──────────────────────────────────────────────────────────────

/// A price in cents, 0.00 to 99999.99.
fn arb_price() -> impl Strategy<Value = Decimal> {
    (0i64..10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// A whole number of units, 0 to 50.
fn arb_quantity() -> impl Strategy<Value = Decimal> {
    (0u32..=50).prop_map(Decimal::from)
}

/// A discount with up to 2 decimals, deliberately straddling the 20% cap.
fn arb_discount() -> impl Strategy<Value = Decimal> {
    (-1_000i64..=5_000).prop_map(|hundredths| Decimal::new(hundredths, 2))
}

fn arb_line() -> impl Strategy<Value = LineItem> {
    (arb_price(), arb_quantity(), arb_discount())
        .prop_map(|(price, quantity, discount)| LineItem::new(price, quantity, discount))
}

fn arb_lines() -> impl Strategy<Value = Vec<LineItem>> {
    prop::collection::vec(arb_line(), 0..=8)
}

fn arb_vat_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        Just(Decimal::new(5, 2)),
        (0i64..=2_500).prop_map(|bps| Decimal::new(bps, 4)),
    ]
}

// ── Properties ──────────────────────────────────────────────────────────────

proptest! {
    /// Permuting the lines never changes the summary.
    #[test]
    fn order_independent(lines in arb_lines(), vat in arb_vat_rate(), paid in arb_price()) {
        let forward = compute_ledger(&lines, vat, Some(paid)).unwrap();

        let mut reversed = lines.clone();
        reversed.reverse();
        prop_assert_eq!(&compute_ledger(&reversed, vat, Some(paid)).unwrap(), &forward);

        let mut rotated = lines;
        if !rotated.is_empty() {
            rotated.rotate_left(1);
        }
        prop_assert_eq!(&compute_ledger(&rotated, vat, Some(paid)).unwrap(), &forward);
    }

    /// Same inputs, same output, rendered identically.
    #[test]
    fn idempotent(lines in arb_lines(), vat in arb_vat_rate(), paid in arb_price()) {
        let first = compute_ledger(&lines, vat, Some(paid)).unwrap();
        let second = compute_ledger(&lines, vat, Some(paid)).unwrap();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first.grand_total.to_string(), second.grand_total.to_string());
    }

    /// Recomputing many times from the same inputs never drifts.
    #[test]
    fn rounding_is_stable(lines in arb_lines(), vat in arb_vat_rate()) {
        let baseline = compute_ledger(&lines, vat, None).unwrap();
        for _ in 0..20 {
            prop_assert_eq!(&compute_ledger(&lines, vat, None).unwrap(), &baseline);
        }
    }

    /// A discount above the cap behaves exactly like the cap.
    #[test]
    fn discount_is_capped(price in arb_price(), quantity in arb_quantity(), excess in 1i64..10_000) {
        let over = LineItem::new(price, quantity, Decimal::from(20) + Decimal::new(excess, 2));
        let capped = LineItem::new(price, quantity, Decimal::from(20));
        prop_assert_eq!(
            compute_ledger(&[over], Decimal::ZERO, None).unwrap(),
            compute_ledger(&[capped], Decimal::ZERO, None).unwrap()
        );
    }

    /// The summary fields hold together.
    #[test]
    fn figures_are_consistent(lines in arb_lines(), vat in arb_vat_rate(), paid in arb_price()) {
        let summary = compute_ledger(&lines, vat, Some(paid)).unwrap();

        prop_assert!(summary.discount_amount <= summary.subtotal);
        prop_assert!(summary.net_after_discount <= summary.subtotal);
        prop_assert!(summary.vat >= Amount::ZERO);
        prop_assert!(summary.grand_total >= summary.net_after_discount);

        let expected_status = if !summary.balance_due.is_positive() {
            PaymentStatus::Paid
        } else if summary.amount_paid.is_positive() {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Pending
        };
        prop_assert_eq!(summary.payment_status, expected_status);
    }

    /// Any negative price is rejected.
    #[test]
    fn negative_price_rejected(cents in 1i64..10_000_000, lines in arb_lines()) {
        let mut lines = lines;
        lines.push(LineItem::single(Decimal::new(-cents, 2), Decimal::ZERO));
        prop_assert!(compute_ledger(&lines, Decimal::ZERO, None).is_err());
    }
}
