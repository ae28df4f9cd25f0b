use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
#[derive(Debug)]
pub enum ApiError {
    /// タスクキューがタスクを受け付けなかった（ワーカー停止など）
    QueueUnavailable(Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            // 503 Service Unavailable - 内部エラーの詳細はログにのみ記録する
            ApiError::QueueUnavailable(ref e) => {
                tracing::error!("Task queue error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "QUEUE_UNAVAILABLE",
                    "Task queue is not accepting tasks",
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
