use crate::domain::{loan::Loan, value_objects::LoanId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 貸出リポジトリポート
///
/// 貸出・会員・ユーザー・書籍を保持する永続ストアへの読み取り専用アクセス。
/// 貸出はすべて会員（ユーザー含む）と書籍を結合した状態で返される。
#[async_trait]
pub trait LoanRepository: Send + Sync {
    /// IDで貸出を取得する
    ///
    /// 存在しない場合は `Ok(None)` を返し、I/Oエラーとは区別する。
    async fn get_by_id(&self, loan_id: LoanId) -> Result<Option<Loan>>;

    /// 延滞中の貸出の件数
    ///
    /// 延滞の条件は `is_returned = false AND due_date < now`。
    async fn count_overdue(&self, now: DateTime<Utc>) -> Result<u64>;

    /// 延滞中の貸出をストリーム配信する
    ///
    /// 結果セット全体をメモリに載せないよう、1件ずつ読み出す。
    /// ストリームは有限かつ一度きりの走査で、再開はできない。
    /// 返却期限の古い順に配信される。
    fn stream_overdue(&self, now: DateTime<Utc>) -> BoxStream<'_, Result<Loan>>;
}
