//! Error types for ledger computation.

use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned by [`compute_ledger`](super::compute_ledger).
///
/// No summary is produced when this is returned; callers must treat the form
/// as having no totals and block submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid line item at position {position}: {fault}")]
    InvalidLineItem { position: usize, fault: LineItemFault },
}

/// Why a line item was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LineItemFault {
    #[error("negative unit price {0}")]
    NegativeUnitPrice(Decimal),
    #[error("negative quantity {0}")]
    NegativeQuantity(Decimal),
    #[error("line amount is too large")]
    TooLarge,
}
