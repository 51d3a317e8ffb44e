// Task channel over a Redis broker speaking the Celery task protocol (v2).
//
// Purpose
// - Exchange tasks with the Celery workers of the cart and stock services.
//
// Wire format
// - A queue is a Redis list named after the queue. Producers LPUSH.
// - Consumers BLMOVE the oldest entry onto `<queue>.unacked` and LREM it from there on
//   ack, so a task popped by a worker that dies before acking is not lost (Redis >= 6.2).
// - Each entry is a JSON envelope whose base64 body holds `[args, kwargs, embed]`.

use crate::shared::infrastructure::task_channel::{
    IncomingTask, OutgoingTask, TaskChannel, TaskChannelError, TaskSource,
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json, json};
use std::time::Duration;
use uuid::Uuid;

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct CeleryHeaders {
    lang: String,
    task: String,
    id: String,
    root_id: Option<String>,
    parent_id: Option<String>,
    group: Option<String>,
    retries: u32,
    eta: Option<String>,
    expires: Option<String>,
    timelimit: (Option<f64>, Option<f64>),
    argsrepr: Option<String>,
    kwargsrepr: Option<String>,
    origin: Option<String>,
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct CeleryDeliveryInfo {
    exchange: String,
    routing_key: String,
}

#[derive(Default, Serialize, Deserialize)]
#[serde(default)]
struct CeleryProperties {
    correlation_id: String,
    reply_to: String,
    delivery_mode: u8,
    delivery_info: CeleryDeliveryInfo,
    priority: u8,
    body_encoding: String,
    delivery_tag: String,
}

#[derive(Serialize, Deserialize)]
struct CeleryMessage {
    body: String,
    #[serde(rename = "content-encoding")]
    content_encoding: String,
    #[serde(rename = "content-type")]
    content_type: String,
    headers: CeleryHeaders,
    properties: CeleryProperties,
}

pub fn encode_message(task: &OutgoingTask, origin: &str) -> Result<String, TaskChannelError> {
    let id = Uuid::now_v7().to_string();
    let embed = json!({ "callbacks": null, "errbacks": null, "chain": null, "chord": null });
    let body = serde_json::to_vec(&json!([task.args, {}, embed]))
        .map_err(|e| TaskChannelError::Malformed(e.to_string()))?;

    let message = CeleryMessage {
        body: STANDARD.encode(body),
        content_encoding: "utf-8".into(),
        content_type: "application/json".into(),
        headers: CeleryHeaders {
            lang: "py".into(),
            task: task.name.clone(),
            id: id.clone(),
            root_id: Some(id.clone()),
            parent_id: None,
            group: None,
            retries: 0,
            eta: None,
            expires: None,
            timelimit: (None, None),
            argsrepr: Some(Json::Array(task.args.clone()).to_string()),
            kwargsrepr: Some("{}".into()),
            origin: Some(origin.to_string()),
        },
        properties: CeleryProperties {
            correlation_id: id,
            reply_to: Uuid::now_v7().to_string(),
            delivery_mode: 2,
            delivery_info: CeleryDeliveryInfo {
                exchange: String::new(),
                routing_key: task.queue.clone(),
            },
            priority: 0,
            body_encoding: "base64".into(),
            delivery_tag: Uuid::now_v7().to_string(),
        },
    };

    serde_json::to_string(&message).map_err(|e| TaskChannelError::Malformed(e.to_string()))
}

pub fn decode_message(raw: &str) -> Result<IncomingTask, TaskChannelError> {
    let message: CeleryMessage =
        serde_json::from_str(raw).map_err(|e| TaskChannelError::Malformed(e.to_string()))?;

    let body = match message.properties.body_encoding.as_str() {
        "base64" => STANDARD
            .decode(message.body.as_bytes())
            .map_err(|e| TaskChannelError::Malformed(e.to_string()))?,
        _ => message.body.into_bytes(),
    };
    let (args, _kwargs, _embed): (Vec<Json>, Map<String, Json>, Json) =
        serde_json::from_slice(&body).map_err(|e| TaskChannelError::Malformed(e.to_string()))?;

    Ok(IncomingTask {
        id: message.headers.id,
        name: message.headers.task,
        args,
        receipt: raw.to_string(),
    })
}

pub struct CeleryRedisChannel {
    producer: ConnectionManager,
    consumer: ConnectionManager,
    origin: String,
    poll_timeout: Duration,
}

impl CeleryRedisChannel {
    pub async fn connect(
        url: &str,
        origin: impl Into<String>,
        poll_timeout: Duration,
    ) -> Result<Self, TaskChannelError> {
        // A zero timeout makes BLMOVE block forever.
        if poll_timeout.is_zero() {
            return Err(TaskChannelError::Backend(
                "poll timeout must be greater than zero".into(),
            ));
        }
        let client = redis::Client::open(url).map_err(backend)?;
        // BLMOVE blocks its connection, so consuming gets a connection of its own.
        let producer = ConnectionManager::new(client.clone()).await.map_err(backend)?;
        let consumer = ConnectionManager::new(client).await.map_err(backend)?;
        Ok(Self {
            producer,
            consumer,
            origin: origin.into(),
            poll_timeout,
        })
    }
}

pub fn unacked_list(queue: &str) -> String {
    format!("{queue}.unacked")
}

fn backend(err: redis::RedisError) -> TaskChannelError {
    TaskChannelError::Backend(err.to_string())
}

#[async_trait]
impl TaskChannel for CeleryRedisChannel {
    async fn send(&self, task: OutgoingTask) -> Result<(), TaskChannelError> {
        let payload = encode_message(&task, &self.origin)?;
        let mut conn = self.producer.clone();
        redis::cmd("LPUSH")
            .arg(&task.queue)
            .arg(payload)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[async_trait]
impl TaskSource for CeleryRedisChannel {
    async fn receive(&self, queue: &str) -> Result<Option<IncomingTask>, TaskChannelError> {
        let unacked = unacked_list(queue);
        let mut conn = self.consumer.clone();
        let moved = redis::cmd("BLMOVE")
            .arg(queue)
            .arg(&unacked)
            .arg("RIGHT")
            .arg("LEFT")
            .arg(self.poll_timeout.as_secs_f64())
            .query_async::<Option<String>>(&mut conn)
            .await
            .map_err(backend)?;

        let Some(raw) = moved else {
            return Ok(None);
        };
        match decode_message(&raw) {
            Ok(task) => Ok(Some(task)),
            Err(e) => {
                // Redelivering an undecodable message cannot succeed.
                self.remove_unacked(&unacked, &raw).await?;
                Err(e)
            }
        }
    }

    async fn ack(&self, queue: &str, task: &IncomingTask) -> Result<(), TaskChannelError> {
        self.remove_unacked(&unacked_list(queue), &task.receipt).await
    }

    async fn requeue_unacked(&self, queue: &str) -> Result<usize, TaskChannelError> {
        let unacked = unacked_list(queue);
        let mut conn = self.producer.clone();
        let mut count = 0;
        // Newest first onto the consuming end, so the oldest is received first again.
        while redis::cmd("LMOVE")
            .arg(&unacked)
            .arg(queue)
            .arg("LEFT")
            .arg("RIGHT")
            .query_async::<Option<String>>(&mut conn)
            .await
            .map_err(backend)?
            .is_some()
        {
            count += 1;
        }
        Ok(count)
    }
}

impl CeleryRedisChannel {
    async fn remove_unacked(&self, unacked: &str, raw: &str) -> Result<(), TaskChannelError> {
        let mut conn = self.producer.clone();
        redis::cmd("LREM")
            .arg(unacked)
            .arg(1)
            .arg(raw)
            .query_async::<i64>(&mut conn)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[cfg(test)]
mod celery_redis_tests {
    use super::*;
    use crate::shared::infrastructure::task_channel::{CART_QUEUE, TaskRoutes};
    use rstest::rstest;

    #[rstest]
    fn it_should_encode_a_celery_v2_envelope() {
        let task = TaskRoutes::default().task("cart.completeCheckout", vec![json!("c1")]);
        let raw = encode_message(&task, "transactions@test").unwrap();
        let envelope: Json = serde_json::from_str(&raw).unwrap();

        assert_eq!(envelope["headers"]["task"], "cart.completeCheckout");
        assert_eq!(envelope["headers"]["lang"], "py");
        assert_eq!(envelope["properties"]["body_encoding"], "base64");
        assert_eq!(
            envelope["properties"]["delivery_info"]["routing_key"],
            CART_QUEUE
        );
        assert_eq!(envelope["content-type"], "application/json");

        let body = STANDARD
            .decode(envelope["body"].as_str().unwrap())
            .unwrap();
        let body: Json = serde_json::from_slice(&body).unwrap();
        assert_eq!(body[0], json!(["c1"]));
        assert_eq!(body[1], json!({}));
    }

    #[rstest]
    fn it_should_decode_what_it_encodes() {
        let task = TaskRoutes::default().task("transaction.create", vec![json!("c1"), json!(42.5)]);
        let raw = encode_message(&task, "cart@test").unwrap();
        let incoming = decode_message(&raw).unwrap();
        assert_eq!(incoming.name, "transaction.create");
        assert_eq!(incoming.args, vec![json!("c1"), json!(42.5)]);
        assert_eq!(incoming.receipt, raw);
    }

    #[rstest]
    fn it_should_name_the_unacked_list_after_the_queue() {
        assert_eq!(unacked_list("transaction_queue"), "transaction_queue.unacked");
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_refuse_a_zero_poll_timeout() {
        let result =
            CeleryRedisChannel::connect("redis://localhost:6379/0", "transactions@test", Duration::ZERO)
                .await;
        assert!(matches!(result, Err(TaskChannelError::Backend(_))));
    }

    #[rstest]
    fn it_should_reject_a_message_that_is_not_an_envelope() {
        let result = decode_message(r#"{"task":"transaction.create"}"#);
        assert!(matches!(result, Err(TaskChannelError::Malformed(_))));
    }

    #[rstest]
    #[tokio::test]
    #[ignore]
    async fn integration_redis_should_round_trip_a_task() {
        let channel = CeleryRedisChannel::connect(
            "redis://localhost:6379/0",
            "transactions@test",
            Duration::from_secs(1),
        )
        .await
        .expect("redis should be reachable");
        let task = TaskRoutes::default().task("stock.integration_check", vec![json!("check")]);
        channel.send(task).await.unwrap();
        let received = channel.receive("stock_queue").await.unwrap().unwrap();
        assert_eq!(received.name, "stock.integration_check");

        assert_eq!(channel.requeue_unacked("stock_queue").await.unwrap(), 1);
        let redelivered = channel.receive("stock_queue").await.unwrap().unwrap();
        assert_eq!(redelivered.id, received.id);
        channel.ack("stock_queue", &redelivered).await.unwrap();
        assert_eq!(channel.requeue_unacked("stock_queue").await.unwrap(), 0);
    }
}
