use crate::domain::value_objects::LoanId;
use thiserror::Error;

/// 通知ジョブのエラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// LoanRepositoryのエラー
    #[error("Loan repository error")]
    LoanRepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// メール配信の失敗
    #[error("Failed to deliver notification for loan {loan_id}")]
    DeliveryFailed {
        loan_id: LoanId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// 延滞走査の再送パスで1件以上の配信が失敗した
    ///
    /// 再送対象はすべて1回ずつ試行した後に返される。
    /// `source` は最初に発生したエラー。
    #[error("Retry failed for {} loan(s): {:?}", .failed_loan_ids.len(), .failed_loan_ids)]
    RetryPassFailed {
        failed_loan_ids: Vec<LoanId>,
        #[source]
        source: Box<NotificationError>,
    },
}

/// 通知ジョブの Result型
pub type Result<T> = std::result::Result<T, NotificationError>;
