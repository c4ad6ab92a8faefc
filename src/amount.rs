use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Serialize, Serializer};

/// Largest magnitude an [`Amount`] holds (10^24).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_701_131_776, 466_537_709, 54_210, false, 0);

/// Monetary value rounded to 2 decimal places.
///
/// Built from a full-precision [`Decimal`] with round-half-up (midpoint away
/// from zero). Values beyond `±MAX_AMOUNT` saturate at the bound. Every
/// `Amount` carries exactly 2 decimal places, so equal amounts also render
/// identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    const DECIMAL_PLACES: u32 = 2;

    pub const ZERO: Amount = Amount(Decimal::from_parts(0, 0, 0, false, Self::DECIMAL_PLACES));

    pub fn from_decimal(value: Decimal) -> Self {
        let value = value.clamp(-MAX_AMOUNT, MAX_AMOUNT);
        let mut rounded =
            value.round_dp_with_strategy(Self::DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(Self::DECIMAL_PLACES);
        if rounded.is_zero() {
            // -0.004 rounds to a signed zero
            rounded.set_sign_positive(true);
        }
        Amount(rounded)
    }

    pub fn from_cents(cents: i64) -> Self {
        Amount(Decimal::new(cents, Self::DECIMAL_PLACES))
    }

    pub fn to_decimal(self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl Default for Amount {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
