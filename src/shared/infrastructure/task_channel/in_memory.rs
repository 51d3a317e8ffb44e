use crate::shared::infrastructure::task_channel::{
    IncomingTask, OutgoingTask, TaskChannel, TaskChannelError, TaskSource,
};
use std::collections::{HashMap, HashSet, VecDeque};
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Task channel kept in process memory.
///
/// `new` records every sent task in `sent` and queues it under its queue name.
/// `local` serves only the listed queues: tasks for any other queue have no
/// consumer in this process and are dropped, and nothing is recorded.
#[derive(Default)]
pub struct InMemoryTaskChannel {
    pub sent: Mutex<Vec<OutgoingTask>>,
    queues: Mutex<HashMap<String, VecDeque<IncomingTask>>>,
    unacked: Mutex<HashMap<String, Vec<IncomingTask>>>,
    local_queues: Option<HashSet<String>>,
    is_offline: bool,
}

impl InMemoryTaskChannel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn local<I, S>(queues: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            local_queues: Some(queues.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub async fn sent_named(&self, name: &str) -> Vec<OutgoingTask> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|task| task.name == name)
            .cloned()
            .collect()
    }

    pub async fn pending(&self, queue: &str) -> usize {
        self.queues.lock().await.get(queue).map_or(0, VecDeque::len)
    }

    pub async fn unacked(&self, queue: &str) -> usize {
        self.unacked.lock().await.get(queue).map_or(0, Vec::len)
    }

    fn offline(&self) -> Result<(), TaskChannelError> {
        if self.is_offline {
            return Err(TaskChannelError::Backend("Task channel offline".into()));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TaskChannel for InMemoryTaskChannel {
    async fn send(&self, task: OutgoingTask) -> Result<(), TaskChannelError> {
        self.offline()?;

        let has_consumer = self
            .local_queues
            .as_ref()
            .is_none_or(|local| local.contains(&task.queue));
        if !has_consumer {
            debug!(task = %task.name, queue = %task.queue, "No local consumer, task dropped");
            return Ok(());
        }

        let id = Uuid::now_v7().to_string();
        let incoming = IncomingTask {
            receipt: id.clone(),
            id,
            name: task.name.clone(),
            args: task.args.clone(),
        };
        self.queues
            .lock()
            .await
            .entry(task.queue.clone())
            .or_default()
            .push_back(incoming);
        if self.local_queues.is_none() {
            self.sent.lock().await.push(task);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl TaskSource for InMemoryTaskChannel {
    async fn receive(&self, queue: &str) -> Result<Option<IncomingTask>, TaskChannelError> {
        self.offline()?;

        let task = self
            .queues
            .lock()
            .await
            .get_mut(queue)
            .and_then(VecDeque::pop_front);
        if let Some(task) = &task {
            self.unacked
                .lock()
                .await
                .entry(queue.to_string())
                .or_default()
                .push(task.clone());
        }
        Ok(task)
    }

    async fn ack(&self, queue: &str, task: &IncomingTask) -> Result<(), TaskChannelError> {
        self.offline()?;

        if let Some(unacked) = self.unacked.lock().await.get_mut(queue) {
            unacked.retain(|pending| pending.receipt != task.receipt);
        }
        Ok(())
    }

    async fn requeue_unacked(&self, queue: &str) -> Result<usize, TaskChannelError> {
        self.offline()?;

        let Some(unacked) = self.unacked.lock().await.remove(queue) else {
            return Ok(0);
        };
        let count = unacked.len();
        let mut queues = self.queues.lock().await;
        let pending = queues.entry(queue.to_string()).or_default();
        for task in unacked.into_iter().rev() {
            pending.push_front(task);
        }
        Ok(count)
    }
}
