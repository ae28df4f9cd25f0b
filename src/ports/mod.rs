pub mod loan_repository;
pub mod mailer;
pub mod task_queue;

pub use loan_repository::LoanRepository;
pub use mailer::Mailer;
pub use task_queue::{Task, TaskQueue};
