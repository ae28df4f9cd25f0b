use crate::domain::value_objects::LoanId;
use crate::ports::{Task, TaskQueue};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::{error::ApiError, types::TaskAcceptedResponse};

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub task_queue: Arc<dyn TaskQueue>,
}

async fn enqueue(
    state: &AppState,
    task: Task,
) -> Result<(StatusCode, Json<TaskAcceptedResponse>), ApiError> {
    state
        .task_queue
        .enqueue(task)
        .await
        .map_err(ApiError::QueueUnavailable)?;

    Ok((StatusCode::ACCEPTED, Json(TaskAcceptedResponse::queued(task))))
}

/// POST /loans/:id/notifications - 貸出確認メールの送信を予約
///
/// 貸出作成側から呼ばれる。貸出の存在確認はジョブ実行時に行うため、
/// 存在しないIDでも受け付ける。
pub async fn enqueue_loan_notification(
    State(state): State<Arc<AppState>>,
    Path(loan_id): Path<i64>,
) -> Result<(StatusCode, Json<TaskAcceptedResponse>), ApiError> {
    let task = Task::NotifyLoan {
        loan_id: LoanId::new(loan_id),
    };
    enqueue(&state, task).await
}

/// POST /sweeps/overdue - 延滞走査を即時に予約
pub async fn enqueue_overdue_sweep(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<TaskAcceptedResponse>), ApiError> {
    enqueue(&state, Task::SweepOverdue).await
}
