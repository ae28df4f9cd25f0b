mod errors;
mod loan_notifier;
mod overdue_sweep;

pub use errors::{NotificationError, Result};
pub use loan_notifier::{JobDependencies, NotifyOutcome, notify_loan};
pub use overdue_sweep::{SweepGuard, SweepReport, sweep_overdue_loans};
