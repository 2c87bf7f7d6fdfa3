// Shared test backends: an in-process profile service speaking the
// correlated request/reply protocol over WebSocket.

#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_tungstenite::{accept_async, tungstenite::Message};

/// How the fake profile service answers a request for a given customer id.
#[derive(Clone, Copy, Debug)]
pub enum ProfileReply {
    /// Reply with `{id: customer_id + 9, customerId: customer_id}`
    Data,
    /// Reply with an explicit error frame
    Error,
    /// Never reply; callers should hit their timeout
    Silent,
}

pub struct ProfileService {
    pub addr: String,
    pub connections: Arc<AtomicUsize>,
    pub requests: Arc<AtomicUsize>,
}

/// Spawn an in-process profile service; `reply_for` picks the behavior per
/// customer id.
pub async fn spawn_profile_service(reply_for: fn(i64) -> ProfileReply) -> ProfileService {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind profile service");
    let addr = format!(
        "127.0.0.1:{}",
        listener.local_addr().expect("local addr").port()
    );
    let connections = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(AtomicUsize::new(0));

    let conn_count = connections.clone();
    let req_count = requests.clone();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            conn_count.fetch_add(1, Ordering::SeqCst);
            let req_count = req_count.clone();
            tokio::spawn(async move {
                let mut ws = match accept_async(socket).await {
                    Ok(ws) => ws,
                    Err(_) => return,
                };
                while let Some(Ok(msg)) = ws.next().await {
                    let Message::Text(text) = msg else { continue };
                    let request: Value = serde_json::from_str(&text).expect("request frame");
                    let id = request["id"].as_u64().expect("correlation id");
                    let customer_id: i64 = request["route"]
                        .as_str()
                        .and_then(|route| route.strip_prefix("profiles."))
                        .and_then(|cid| cid.parse().ok())
                        .expect("profiles.<customerId> route");
                    req_count.fetch_add(1, Ordering::SeqCst);

                    let reply = match reply_for(customer_id) {
                        ProfileReply::Data => json!({
                            "id": id,
                            "data": {"id": customer_id + 9, "customerId": customer_id},
                        }),
                        ProfileReply::Error => json!({
                            "id": id,
                            "error": format!("no profile for customer {}", customer_id),
                        }),
                        ProfileReply::Silent => continue,
                    };
                    if ws
                        .send(Message::Text(reply.to_string().into()))
                        .await
                        .is_err()
                    {
                        return;
                    }
                }
            });
        }
    });

    ProfileService {
        addr,
        connections,
        requests,
    }
}
