use crate::application::notification::{JobDependencies, notify_loan, sweep_overdue_loans};
use crate::ports::task_queue::{Result, Task, TaskQueue};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// チャネルを使ったプロセス内のTaskQueue
///
/// 上限付きチャネルをタスクキューとし、単一のワーカーがタスクを1件ずつ処理する。
/// 通知と延滞走査が並行して実行されることはない。
/// 失敗したタスクはログに記録して破棄する（再送は各ジョブ側の責務）。
///
/// すべてのクローンを破棄するとチャネルが閉じ、ワーカーはキュー済みの
/// タスクを処理し終えてから停止する。
#[derive(Clone)]
pub struct TaskWorker {
    sender: mpsc::Sender<Task>,
}

impl TaskWorker {
    /// 現在のtokioランタイム上でワーカーを起動する
    pub fn spawn(deps: JobDependencies, capacity: usize) -> (Self, JoinHandle<()>) {
        let (sender, mut receiver) = mpsc::channel(capacity);

        let handle = tokio::spawn(async move {
            while let Some(task) = receiver.recv().await {
                run_task(&deps, task).await;
            }
            info!("Task worker stopped");
        });

        (Self { sender }, handle)
    }
}

#[async_trait]
impl TaskQueue for TaskWorker {
    async fn enqueue(&self, task: Task) -> Result<()> {
        self.sender.send(task).await?;
        debug!(task = task.name(), "Task enqueued");
        Ok(())
    }
}

/// タスクを1件実行し、結果をログに記録する
#[tracing::instrument(skip(deps, task), fields(task_id = %Uuid::new_v4(), task = task.name()))]
pub async fn run_task(deps: &JobDependencies, task: Task) {
    match task {
        Task::NotifyLoan { loan_id } => match notify_loan(deps, loan_id).await {
            Ok(outcome) => debug!(?outcome, "Task finished"),
            Err(e) => error!(error = %e, "Task failed"),
        },
        Task::SweepOverdue => match sweep_overdue_loans(deps, Utc::now()).await {
            Ok(report) => info!(
                skipped = report.skipped,
                attempted = report.attempted,
                delivered = report.delivered,
                retried = report.retried.len(),
                retry_delivered = report.retry_delivered,
                "Task finished"
            ),
            Err(e) => error!(error = %e, "Task failed"),
        },
    }
}

/// `period` ごとに延滞走査をキューに投入する
///
/// 初回は起動から1周期後。キューが詰まって逃したティックはまとめて
/// 実行せずに読み飛ばす。キューがタスクを拒否した時点で終了する。
pub fn spawn_overdue_schedule(queue: Arc<dyn TaskQueue>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if let Err(e) = queue.enqueue(Task::SweepOverdue).await {
                warn!(error = %e, "Task queue closed, stopping overdue schedule");
                break;
            }
        }
    })
}
