// Inbound task worker.
//
// Responsibilities
// - Poll this service's queue on the task channel.
// - Route `transaction.create` to the create use case, log and drop anything else.
// - Acknowledge each task once handled or dropped, and requeue unacknowledged tasks on start.
// - Finish the task in hand before honouring shutdown.

use crate::modules::transactions::adapters::inbound::envelope::Envelope;
use crate::modules::transactions::adapters::outbound::transaction_store::TransactionStore;
use crate::modules::transactions::use_cases::create_transaction::handler::CreateTransactionHandler;
use crate::modules::transactions::use_cases::create_transaction::inbound::task as create_task;
use crate::shared::infrastructure::task_channel::{TaskChannelError, TaskSource};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

#[derive(Debug, PartialEq)]
pub enum Polled {
    Idle,
    Handled(Envelope),
    Dropped { task_name: String },
}

pub struct TaskWorker<TSource>
where
    TSource: TaskSource + ?Sized,
{
    source: Arc<TSource>,
    create_handler: Arc<CreateTransactionHandler<dyn TransactionStore>>,
    queue: String,
    idle_interval: Duration,
}

impl<TSource> TaskWorker<TSource>
where
    TSource: TaskSource + ?Sized,
{
    pub fn new(
        source: Arc<TSource>,
        create_handler: Arc<CreateTransactionHandler<dyn TransactionStore>>,
        queue: impl Into<String>,
        idle_interval: Duration,
    ) -> Self {
        Self {
            source,
            create_handler,
            queue: queue.into(),
            idle_interval,
        }
    }

    /// Takes at most one task from the queue and handles it.
    pub async fn poll_once(&self) -> Result<Polled, TaskChannelError> {
        let Some(task) = self.source.receive(&self.queue).await? else {
            return Ok(Polled::Idle);
        };
        info!(task = %task.name, task_id = %task.id, "Task received");

        if task.name != create_task::TASK_NAME {
            warn!(task = %task.name, task_id = %task.id, "Unknown task dropped");
            self.source.ack(&self.queue, &task).await?;
            return Ok(Polled::Dropped {
                task_name: task.name,
            });
        }

        let envelope = create_task::handle(&*self.create_handler, &task.args).await;
        if envelope.success {
            info!(task = %task.name, task_id = %task.id, "Task succeeded");
        } else {
            error!(
                task = %task.name,
                task_id = %task.id,
                error = envelope.error.as_deref().unwrap_or_default(),
                message = envelope.message.as_deref().unwrap_or_default(),
                "Task failed"
            );
        }
        self.source.ack(&self.queue, &task).await?;
        Ok(Polled::Handled(envelope))
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(queue = %self.queue, "Task worker started");
        match self.source.requeue_unacked(&self.queue).await {
            Ok(0) => {}
            Ok(count) => warn!(queue = %self.queue, count, "Requeued unacknowledged tasks"),
            Err(e) => error!(queue = %self.queue, error = %e, "Failed to requeue unacknowledged tasks"),
        }
        while !*shutdown.borrow() {
            let idle = match self.poll_once().await {
                Ok(Polled::Idle) => true,
                Ok(_) => false,
                Err(e) => {
                    error!(queue = %self.queue, error = %e, "Failed to receive task");
                    true
                }
            };
            if idle {
                tokio::select! {
                    _ = shutdown.changed() => debug!("Task worker woken by shutdown"),
                    _ = tokio::time::sleep(self.idle_interval) => {}
                }
            }
        }
        info!(queue = %self.queue, "Task worker stopped");
    }
}
