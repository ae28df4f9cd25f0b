use crate::domain::{
    loan::{Loan, is_overdue},
    value_objects::LoanId,
};
use crate::ports::loan_repository::{LoanRepository as LoanRepositoryTrait, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory implementation of LoanRepository
///
/// Overdue selection uses the same predicate as the domain layer.
#[derive(Default)]
pub struct LoanRepository {
    loans: Mutex<HashMap<LoanId, Loan>>,
}

impl LoanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a loan for testing purposes
    pub fn add_loan(&self, loan: Loan) {
        self.loans.lock().unwrap().insert(loan.loan_id, loan);
    }

    /// Remove a loan, simulating deletion between sweep passes
    pub fn remove_loan(&self, loan_id: LoanId) -> Option<Loan> {
        self.loans.lock().unwrap().remove(&loan_id)
    }

    fn overdue_loans(&self, now: DateTime<Utc>) -> Vec<Loan> {
        let mut overdue: Vec<Loan> = self
            .loans
            .lock()
            .unwrap()
            .values()
            .filter(|loan| is_overdue(loan, now))
            .cloned()
            .collect();
        overdue.sort_by_key(|loan| (loan.due_date, loan.loan_id));
        overdue
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn get_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>> {
        Ok(self.loans.lock().unwrap().get(&loan_id).cloned())
    }

    async fn count_overdue(&self, now: DateTime<Utc>) -> Result<u64> {
        Ok(self.overdue_loans(now).len() as u64)
    }

    /// Snapshot of the overdue loans at call time
    fn stream_overdue(&self, now: DateTime<Utc>) -> BoxStream<'_, Result<Loan>> {
        Box::pin(stream::iter(self.overdue_loans(now).into_iter().map(Ok)))
    }
}
