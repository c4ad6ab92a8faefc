//! Core domain types for fee computation.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest discount percentage any line may carry.
pub const MAX_DISCOUNT_PERCENT: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// VAT rate charged on course registrations (5%).
pub const COURSE_VAT_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 2);

/// Identifier of a line within one form.
pub type LineId = u32;

/// One priced unit (a course, a service) entered into a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub unit_price: Decimal,
    #[serde(default = "one")]
    pub quantity: Decimal,
    #[serde(default)]
    pub discount_percent: Decimal,
}

fn one() -> Decimal {
    Decimal::ONE
}

impl LineItem {
    pub fn new(unit_price: Decimal, quantity: Decimal, discount_percent: Decimal) -> Self {
        Self {
            unit_price,
            quantity,
            discount_percent,
        }
    }

    /// A single unit, as entered in single-course flows.
    pub fn single(unit_price: Decimal, discount_percent: Decimal) -> Self {
        Self::new(unit_price, Decimal::ONE, discount_percent)
    }

    /// Discount percentage restricted to `[0, MAX_DISCOUNT_PERCENT]`.
    pub fn clamped_discount(&self) -> Decimal {
        self.discount_percent.clamp(Decimal::ZERO, MAX_DISCOUNT_PERCENT)
    }
}

/// Settlement state derived from the balance due.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing paid yet.
    #[default]
    Pending,
    /// Some amount paid, a balance remains.
    Partial,
    /// Balance due is zero or negative.
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Partial => "partial",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The form a ledger is computed for. Each flow fixes its VAT rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    #[default]
    StudentRegistration,
    CourseRegistration,
    Proposal,
    Expense,
}

impl Flow {
    pub fn vat_rate(&self) -> Decimal {
        match self {
            Flow::CourseRegistration => COURSE_VAT_RATE,
            Flow::StudentRegistration | Flow::Proposal | Flow::Expense => Decimal::ZERO,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Flow::StudentRegistration => "student-registration",
            Flow::CourseRegistration => "course-registration",
            Flow::Proposal => "proposal",
            Flow::Expense => "expense",
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown flow '{0}' (expected student-registration, course-registration, proposal or expense)")]
pub struct UnknownFlow(pub String);

impl FromStr for Flow {
    type Err = UnknownFlow;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student-registration" => Ok(Flow::StudentRegistration),
            "course-registration" => Ok(Flow::CourseRegistration),
            "proposal" => Ok(Flow::Proposal),
            "expense" => Ok(Flow::Expense),
            other => Err(UnknownFlow(other.to_string())),
        }
    }
}
