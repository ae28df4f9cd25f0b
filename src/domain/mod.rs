pub mod loan;
pub mod notification;
pub mod value_objects;

pub use loan::{Book, Loan, Member, User};
pub use notification::{LOAN_NOTIFICATION_SUBJECT, OutgoingMail};
pub use value_objects::*;
