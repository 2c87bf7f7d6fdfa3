// ============================================================================
// Profile Messaging Channel
// ============================================================================
//
// Persistent request/response channel to the profile service. Requests are
// addressed by route ("profiles.<customerId>") and correlated with replies
// by a per-connection id.
//
// Connection lifecycle:
// - Established lazily on first use
// - One channel task owns the socket and the pending-reply map
// - A dropped connection fails every pending request with
//   UpstreamUnavailable; the next call reconnects
//
// ============================================================================

use crate::crm::ProfileSource;
use crate::error::{AppError, AppResult};
use crate::model::Profile;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio_tungstenite::{
    connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream,
};
use tracing::{debug, warn};

/// Outbound request frame, addressed by route
#[derive(Debug, Serialize)]
struct RequestFrame {
    id: u64,
    route: String,
}

/// Correlated reply frame: a payload or an explicit error
#[derive(Debug, Deserialize)]
struct ReplyFrame {
    id: u64,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

struct PendingRequest {
    route: String,
    reply: oneshot::Sender<AppResult<serde_json::Value>>,
}

/// Request/response client for the profile service.
pub struct ProfileSocketClient {
    addr: String,
    timeout: Duration,
    channel: Mutex<Option<mpsc::UnboundedSender<PendingRequest>>>,
}

impl ProfileSocketClient {
    pub fn new(addr: impl Into<String>, timeout: Duration) -> Self {
        Self {
            addr: addr.into(),
            timeout,
            channel: Mutex::new(None),
        }
    }

    /// Get the sender for the live channel task, connecting if there is none
    /// or the previous connection has dropped.
    async fn channel(&self) -> AppResult<mpsc::UnboundedSender<PendingRequest>> {
        let mut guard = self.channel.lock().await;
        if let Some(tx) = guard.as_ref() {
            if !tx.is_closed() {
                return Ok(tx.clone());
            }
        }

        let url = format!("ws://{}", self.addr);
        let (socket, _) = connect_async(url).await.map_err(|e| {
            AppError::unavailable(format!("profile service at {}: {}", self.addr, e))
        })?;
        debug!(addr = %self.addr, "profile channel established");

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_channel(socket, rx));
        *guard = Some(tx.clone());
        Ok(tx)
    }

    /// One request/response exchange, bounded by the configured timeout.
    async fn request(&self, route: String) -> AppResult<serde_json::Value> {
        let tx = self.channel().await?;
        let (reply_tx, reply_rx) = oneshot::channel();
        tx.send(PendingRequest {
            route: route.clone(),
            reply: reply_tx,
        })
        .map_err(|_| AppError::unavailable("profile channel closed"))?;

        match tokio::time::timeout(self.timeout, reply_rx).await {
            Err(_) => Err(AppError::timeout(format!(
                "no response for {} within {:?}",
                route, self.timeout
            ))),
            Ok(Err(_)) => Err(AppError::unavailable("profile channel dropped")),
            Ok(Ok(result)) => result,
        }
    }
}

#[async_trait]
impl ProfileSource for ProfileSocketClient {
    async fn profile_for_customer(&self, customer_id: i64) -> AppResult<Profile> {
        let value = self.request(format!("profiles.{}", customer_id)).await?;
        let profile: Profile = serde_json::from_value(value)
            .map_err(|e| AppError::upstream(format!("invalid profile payload: {}", e)))?;
        Ok(profile)
    }
}

/// Channel task: owns the socket, assigns correlation ids, pairs replies
/// with waiting callers.
async fn run_channel(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    mut requests: mpsc::UnboundedReceiver<PendingRequest>,
) {
    let (mut sink, mut stream) = socket.split();
    let mut pending: HashMap<u64, oneshot::Sender<AppResult<serde_json::Value>>> = HashMap::new();
    let mut next_id: u64 = 0;

    loop {
        tokio::select! {
            outbound = requests.recv() => {
                let Some(PendingRequest { route, reply }) = outbound else {
                    // client dropped, no more requests can arrive
                    break;
                };
                next_id += 1;
                let frame = RequestFrame { id: next_id, route };
                let json = match serde_json::to_string(&frame) {
                    Ok(json) => json,
                    Err(e) => {
                        let _ = reply.send(Err(AppError::internal(format!(
                            "encode profile request: {}",
                            e
                        ))));
                        continue;
                    }
                };
                if let Err(e) = sink.send(WsMessage::Text(json.into())).await {
                    warn!(error = %e, "profile channel send failed");
                    let _ = reply.send(Err(AppError::unavailable(format!(
                        "profile channel send failed: {}",
                        e
                    ))));
                    break;
                }
                pending.insert(next_id, reply);
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(WsMessage::Text(text))) => {
                        let frame: ReplyFrame = match serde_json::from_str(&text) {
                            Ok(frame) => frame,
                            Err(e) => {
                                warn!(error = %e, "unparseable profile reply");
                                continue;
                            }
                        };
                        let Some(reply) = pending.remove(&frame.id) else {
                            // reply for a caller that already timed out
                            continue;
                        };
                        let result = match (frame.data, frame.error) {
                            (Some(data), None) => Ok(data),
                            (_, Some(error)) => Err(AppError::upstream(error)),
                            (None, None) => Err(AppError::upstream("empty profile reply")),
                        };
                        let _ = reply.send(result);
                    }
                    Some(Ok(WsMessage::Ping(_))) | Some(Ok(WsMessage::Pong(_))) => {}
                    Some(Ok(WsMessage::Close(_))) | None => {
                        debug!("profile channel closed by peer");
                        break;
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, "profile channel error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    for (_, reply) in pending.drain() {
        let _ = reply.send(Err(AppError::unavailable("profile channel closed")));
    }
}
