use crate::ports::task_queue::{Result, Task, TaskQueue as TaskQueueTrait};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Error returned once the mock queue has been closed
#[derive(Debug, Error)]
#[error("Task queue is closed")]
pub struct QueueClosed;

/// Mock implementation of TaskQueue
///
/// Stores enqueued tasks instead of running them.
#[derive(Default)]
pub struct TaskQueue {
    tasks: Mutex<Vec<Task>>,
    closed: AtomicBool,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every further enqueue
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskQueueTrait for TaskQueue {
    async fn enqueue(&self, task: Task) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Box::new(QueueClosed));
        }
        self.tasks.lock().unwrap().push(task);
        Ok(())
    }
}
