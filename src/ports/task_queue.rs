use crate::domain::value_objects::LoanId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// タスクキューに投入できる作業単位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum Task {
    /// 貸出確認メールを送信する
    NotifyLoan { loan_id: LoanId },
    /// 延滞中の貸出を走査してリマインドを送信する
    SweepOverdue,
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Task::NotifyLoan { .. } => "notify_loan",
            Task::SweepOverdue => "sweep_overdue",
        }
    }
}

/// タスクキューポート
///
/// 投入されたタスクのスケジューリングと実行はキューの実行環境が担う。
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// タスクを投入する
    ///
    /// キューが停止している場合はエラーを返す。
    async fn enqueue(&self, task: Task) -> Result<()>;
}
