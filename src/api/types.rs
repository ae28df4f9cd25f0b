use serde::{Deserialize, Serialize};

use crate::ports::Task;

/// タスク受付レスポンス（202 Accepted）
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskAcceptedResponse {
    #[serde(flatten)]
    pub task: Task,
    pub status: String,
}

impl TaskAcceptedResponse {
    pub fn queued(task: Task) -> Self {
        Self {
            task,
            status: "queued".to_string(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
