use serde::{Deserialize, Serialize};

use super::{EmailAddress, loan::Loan};

/// 貸出通知メールの件名
///
/// 延滞リマインドも同じ件名・本文で送信される。
pub const LOAN_NOTIFICATION_SUBJECT: &str = "Book Loaned Successfully";

/// 送信するメール
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    pub subject: String,
    pub body: String,
    pub from: EmailAddress,
    pub to: Vec<String>,
}

/// 貸出通知メールを組み立てる（純粋関数）
pub fn loan_notification(loan: &Loan, from: &EmailAddress) -> OutgoingMail {
    OutgoingMail {
        subject: LOAN_NOTIFICATION_SUBJECT.to_string(),
        body: format!(
            "Hello {},\n\nYou have successfully loaned \"{}\".\nPlease return it by the due date.",
            loan.member_name(),
            loan.book_title()
        ),
        from: from.clone(),
        to: vec![loan.member_email().to_string()],
    }
}
