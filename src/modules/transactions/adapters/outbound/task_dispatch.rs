use crate::modules::transactions::core::transitions::Transition;
use crate::shared::infrastructure::task_channel::{
    OutgoingTask, TaskChannel, TaskChannelError, TaskRoutes,
};
use serde_json::json;
use tracing::info;

/// Build the cart task announcing `transition` for `cart_id`.
pub fn transition_task(routes: &TaskRoutes, transition: &Transition, cart_id: &str) -> OutgoingTask {
    routes.task(transition.task.task_name(), vec![json!(cart_id)])
}

/// Send the downstream task of an applied transition. Fire and forget: the
/// channel only acknowledges acceptance, never execution.
pub async fn dispatch_transition<TChannel>(
    channel: &TChannel,
    routes: &TaskRoutes,
    transition: &Transition,
    cart_id: &str,
) -> Result<(), TaskChannelError>
where
    TChannel: TaskChannel + ?Sized,
{
    let task = transition_task(routes, transition, cart_id);
    let (name, queue) = (task.name.clone(), task.queue.clone());
    channel.send(task).await?;
    info!(task = %name, queue = %queue, cart_id, "Dispatched cart task");
    Ok(())
}
