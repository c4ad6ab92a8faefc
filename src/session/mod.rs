//! Form session.
//!
//! A session holds the line items and payment of one open form and keeps its
//! summary current: every edit triggers a recomputation from scratch.
//! Also supports an async stream of edits.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::ledger::{self, LedgerError, LedgerSummary};
use crate::model::{Flow, LineId, LineItem};

mod error;
pub use error::SessionError;

/// A change made to a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    /// Add a new line.
    AddLine { line: LineId, item: LineItem },
    /// Replace an existing line.
    UpdateLine { line: LineId, item: LineItem },
    /// Drop an existing line.
    RemoveLine { line: LineId },
    /// Set the amount already paid.
    SetAmountPaid { amount: Decimal },
    /// Override the VAT rate of the flow.
    SetVatRate { rate: Decimal },
}

/// The ledger state of one form.
#[derive(Debug)]
pub struct LedgerSession {
    flow: Flow,
    vat_rate: Decimal,
    /// Lines in id order
    lines: BTreeMap<LineId, LineItem>,
    amount_paid: Decimal,
    /// `None` while any line is invalid
    summary: Option<LedgerSummary>,
}

/// Public API
impl LedgerSession {
    pub fn new(flow: Flow) -> Self {
        Self {
            flow,
            vat_rate: flow.vat_rate(),
            lines: BTreeMap::new(),
            amount_paid: Decimal::ZERO,
            summary: Some(LedgerSummary::zero()),
        }
    }

    /// Run the session with the given edit stream
    pub async fn run(&mut self, mut stream: impl Stream<Item = FormEdit> + Unpin) {
        while let Some(edit) = stream.next().await {
            // a rejected edit must not end the session, the result is already logged
            let _ = self.apply(edit);
        }
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn vat_rate(&self) -> Decimal {
        self.vat_rate
    }

    pub fn amount_paid(&self) -> Decimal {
        self.amount_paid
    }

    /// Return the current lines in id order.
    pub fn lines(&self) -> impl Iterator<Item = (LineId, &LineItem)> + '_ {
        self.lines.iter().map(|(id, item)| (*id, item))
    }

    /// Return the totals, or `None` while a line is invalid.
    pub fn summary(&self) -> Option<&LedgerSummary> {
        self.summary.as_ref()
    }

    /// Recompute the totals for submission.
    ///
    /// Fails if any line is invalid, in which case the form must not be submitted.
    pub fn submit(&self) -> Result<LedgerSummary, SessionError> {
        self.compute()
    }

    /// Apply a single edit on top of the current form state
    pub fn apply(&mut self, edit: FormEdit) -> Result<(), SessionError> {
        let (kind, line) = Self::describe(&edit);
        let result = self.apply_edit(edit);
        Self::log_result(self.flow, kind, line, &result);
        result
    }
}

/// Private API
impl LedgerSession {
    /// Small helper to log `apply` results
    fn log_result(flow: Flow, kind: &str, line: Option<LineId>, result: &Result<(), SessionError>) {
        match (result, line) {
            (Ok(()), Some(line)) => info!(%flow, line, "{kind} applied"),
            (Ok(()), None) => info!(%flow, "{kind} applied"),
            (Err(e), Some(line)) => info!(%flow, line, reason = %e, "{kind} skipped"),
            (Err(e), None) => info!(%flow, reason = %e, "{kind} skipped"),
        }
    }

    fn describe(edit: &FormEdit) -> (&'static str, Option<LineId>) {
        match edit {
            FormEdit::AddLine { line, .. } => ("add line", Some(*line)),
            FormEdit::UpdateLine { line, .. } => ("update line", Some(*line)),
            FormEdit::RemoveLine { line } => ("remove line", Some(*line)),
            FormEdit::SetAmountPaid { .. } => ("set amount paid", None),
            FormEdit::SetVatRate { .. } => ("set vat rate", None),
        }
    }

    /// Mutate the form, then recompute.
    /// Structural errors (duplicate or unknown line) leave the form untouched.
    fn apply_edit(&mut self, edit: FormEdit) -> Result<(), SessionError> {
        match edit {
            FormEdit::AddLine { line, item } => {
                if self.lines.contains_key(&line) {
                    return Err(SessionError::DuplicateLine(line));
                }
                self.lines.insert(line, item);
                self.warn_clamped(line, &item);
            }
            FormEdit::UpdateLine { line, item } => {
                let slot = self
                    .lines
                    .get_mut(&line)
                    .ok_or(SessionError::UnknownLine(line))?;
                *slot = item;
                self.warn_clamped(line, &item);
            }
            FormEdit::RemoveLine { line } => {
                self.lines
                    .remove(&line)
                    .ok_or(SessionError::UnknownLine(line))?;
            }
            FormEdit::SetAmountPaid { amount } => self.amount_paid = amount,
            FormEdit::SetVatRate { rate } => self.vat_rate = rate,
        }

        self.recompute()
    }

    /// Warn once, when a line with an out-of-range discount is stored
    fn warn_clamped(&self, line: LineId, item: &LineItem) {
        for clamp in ledger::discount_clamps(std::slice::from_ref(item)) {
            warn!(
                flow = %self.flow,
                line,
                requested = %clamp.requested,
                applied = %clamp.applied,
                "discount clamped to allowed range"
            );
        }
    }

    fn recompute(&mut self) -> Result<(), SessionError> {
        match self.compute() {
            Ok(summary) => {
                self.summary = Some(summary);
                Ok(())
            }
            Err(e) => {
                self.summary = None;
                Err(e)
            }
        }
    }

    fn compute(&self) -> Result<LedgerSummary, SessionError> {
        let ids: Vec<LineId> = self.lines.keys().copied().collect();
        let items: Vec<LineItem> = self.lines.values().copied().collect();

        ledger::compute_ledger(&items, self.vat_rate, Some(self.amount_paid)).map_err(|e| match e {
            LedgerError::InvalidLineItem { position, fault } => SessionError::InvalidLine {
                line: ids[position],
                fault,
            },
        })
    }
}
