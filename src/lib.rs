pub mod amount;
pub mod csv;
pub mod ledger;
pub mod model;
pub mod session;

pub use amount::Amount;
pub use ledger::{LedgerError, LedgerSummary, compute_ledger};
pub use model::{Flow, LineId, LineItem, PaymentStatus};
pub use session::{FormEdit, LedgerSession};
