//! Error types for form sessions.

use thiserror::Error;

use crate::ledger::LineItemFault;
use crate::model::LineId;

/// Error returned by [`LedgerSession::apply`](super::LedgerSession::apply).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("line {0} already exists")]
    DuplicateLine(LineId),

    #[error("line {0} not found")]
    UnknownLine(LineId),

    /// The edit was kept, but no totals are available until the line is fixed.
    #[error("line {line}: {fault}")]
    InvalidLine { line: LineId, fault: LineItemFault },
}
