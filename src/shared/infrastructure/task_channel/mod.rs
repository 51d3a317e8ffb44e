// Task channel port: asynchronous, at-least-once task dispatch between services.
//
// Purpose
// - Send named tasks with positional arguments to a queue without waiting for execution.
// - Receive tasks addressed to this service from its own queue.
//
// Boundaries
// - Routing by task name prefix lives here; what a task means lives with its sender or handler.
// - Consumers must tolerate redelivery. A received task stays unacknowledged until
//   `ack`, and unacknowledged tasks go back to their queue on `requeue_unacked`.

use async_trait::async_trait;
use serde_json::Value as Json;
use thiserror::Error;

pub const CART_QUEUE: &str = "cart_queue";
pub const TRANSACTION_QUEUE: &str = "transaction_queue";
pub const STOCK_QUEUE: &str = "stock_queue";
pub const DEFAULT_QUEUE: &str = "celery";

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingTask {
    pub name: String,
    pub args: Vec<Json>,
    pub queue: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomingTask {
    pub id: String,
    pub name: String,
    pub args: Vec<Json>,
    /// Opaque handle the source needs to acknowledge this delivery.
    pub receipt: String,
}

#[derive(Debug, Error)]
pub enum TaskChannelError {
    #[error("malformed task message: {0}")]
    Malformed(String),

    #[error("backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait TaskChannel: Send + Sync {
    async fn send(&self, task: OutgoingTask) -> Result<(), TaskChannelError>;
}

#[async_trait]
pub trait TaskSource: Send + Sync {
    /// Takes the next task from `queue`, or `None` when the queue stayed empty.
    async fn receive(&self, queue: &str) -> Result<Option<IncomingTask>, TaskChannelError>;

    /// Marks a received task of `queue` as handled so it is never redelivered.
    async fn ack(&self, queue: &str, task: &IncomingTask) -> Result<(), TaskChannelError>;

    /// Puts tasks received from `queue` but never acknowledged back on it.
    /// Returns how many were requeued.
    async fn requeue_unacked(&self, queue: &str) -> Result<usize, TaskChannelError>;
}

/// Maps task names to queues by prefix, first match wins.
#[derive(Debug, Clone)]
pub struct TaskRoutes {
    routes: Vec<(String, String)>,
    fallback: String,
}

impl TaskRoutes {
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            routes: Vec::new(),
            fallback: fallback.into(),
        }
    }

    pub fn route(mut self, prefix: impl Into<String>, queue: impl Into<String>) -> Self {
        self.routes.push((prefix.into(), queue.into()));
        self
    }

    pub fn queue_for(&self, task_name: &str) -> &str {
        self.routes
            .iter()
            .find(|(prefix, _)| task_name.starts_with(prefix.as_str()))
            .map(|(_, queue)| queue.as_str())
            .unwrap_or(&self.fallback)
    }

    pub fn task(&self, name: &str, args: Vec<Json>) -> OutgoingTask {
        OutgoingTask {
            name: name.to_string(),
            args,
            queue: self.queue_for(name).to_string(),
        }
    }
}

impl Default for TaskRoutes {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE)
            .route("transaction.", TRANSACTION_QUEUE)
            .route("cart.", CART_QUEUE)
            .route("stock.", STOCK_QUEUE)
    }
}

pub mod in_memory;

#[cfg(feature = "channel-redis")]
pub mod celery_redis;
