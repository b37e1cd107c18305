use std::time::Duration;

use axum::{
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    response::IntoResponse,
};
use futures_util::{SinkExt, StreamExt, stream::SplitSink, stream::SplitStream};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::Instant;

use crate::board::models::{JobApplication, JobId, Stage};

/// How often to send WebSocket Ping frames.
const PING_INTERVAL: Duration = Duration::from_secs(30);

/// How long to wait for a Pong response before considering the connection dead.
const PONG_TIMEOUT: Duration = Duration::from_secs(60);

// ── Board events ──────────────────────────────────────────────────────

/// Pushed to every connected dashboard after a committed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum BoardEvent {
    JobCreated {
        job: JobApplication,
    },
    JobUpdated {
        job: JobApplication,
    },
    #[serde(rename_all = "camelCase")]
    JobMoved {
        job_id: JobId,
        from_status: Stage,
        to_status: Stage,
    },
    #[serde(rename_all = "camelCase")]
    JobDeleted {
        job_id: JobId,
    },
}

// ── WebSocket handler ─────────────────────────────────────────────────

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    tx: broadcast::Sender<BoardEvent>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, tx))
}

async fn handle_socket(socket: WebSocket, tx: broadcast::Sender<BoardEvent>) {
    let events = tx.subscribe();
    let (sink, stream) = socket.split();
    tracing::debug!("dashboard client connected");
    let reason = serve_client(sink, stream, events).await;
    tracing::debug!(reason, "dashboard client disconnected");
}

/// Ping/pong bookkeeping for one dashboard connection.
#[derive(Debug)]
struct Heartbeat {
    last_pong: Instant,
    awaiting: bool,
}

impl Heartbeat {
    fn new(now: Instant) -> Self {
        Self {
            last_pong: now,
            awaiting: false,
        }
    }

    /// Called on every ping tick. `false` means the client has left a ping
    /// unanswered for longer than `PONG_TIMEOUT` and should be dropped.
    fn on_tick(&mut self, now: Instant) -> bool {
        if self.awaiting && now.duration_since(self.last_pong) > PONG_TIMEOUT {
            return false;
        }
        self.awaiting = true;
        true
    }

    fn on_pong(&mut self, now: Instant) {
        self.last_pong = now;
        self.awaiting = false;
    }
}

/// Text frame for `event`, or `None` if it cannot be serialized.
fn event_frame(event: &BoardEvent) -> Option<Message> {
    match serde_json::to_string(event) {
        Ok(json) => Some(Message::Text(json.into())),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize board event");
            None
        }
    }
}

/// Forward board events to one client until it goes away. Returns why the
/// connection ended.
async fn serve_client(
    mut sink: SplitSink<WebSocket, Message>,
    mut stream: SplitStream<WebSocket>,
    mut events: broadcast::Receiver<BoardEvent>,
) -> &'static str {
    let mut ticker = tokio::time::interval_at(Instant::now() + PING_INTERVAL, PING_INTERVAL);
    let mut heartbeat = Heartbeat::new(Instant::now());

    let reason = loop {
        tokio::select! {
            _ = ticker.tick() => {
                if !heartbeat.on_tick(Instant::now()) {
                    break "pong timeout";
                }
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break "send failed";
                }
            }

            event = events.recv() => match event {
                Ok(event) => {
                    let Some(frame) = event_frame(&event) else {
                        continue;
                    };
                    if sink.send(frame).await.is_err() {
                        break "send failed";
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "dashboard client lagged behind board events");
                }
                Err(RecvError::Closed) => break "server shutting down",
            },

            incoming = stream.next() => match incoming {
                Some(Ok(Message::Pong(_))) => heartbeat.on_pong(Instant::now()),
                Some(Ok(Message::Close(_))) | None => break "closed by client",
                Some(Ok(_)) => {}
                Some(Err(_)) => break "receive failed",
            },
        }
    };

    let _ = sink.send(Message::Close(None)).await;
    reason
}

/// Send `event` to every connected dashboard. Having none is fine.
pub fn broadcast_event(tx: &broadcast::Sender<BoardEvent>, event: BoardEvent) {
    match tx.send(event) {
        Ok(receivers) => tracing::debug!(receivers, "board event sent"),
        Err(_) => tracing::debug!("board event dropped, no dashboard connected"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::store::tests::job;

    #[test]
    fn test_event_wire_format() {
        let event = BoardEvent::JobMoved {
            job_id: JobId::from("4"),
            from_status: Stage::Applied,
            to_status: Stage::Offer,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "JobMoved");
        assert_eq!(json["data"]["jobId"], "4");
        assert_eq!(json["data"]["fromStatus"], "applied");
        assert_eq!(json["data"]["toStatus"], "offer");
    }

    #[test]
    fn test_event_frame_is_json_text() {
        let event = BoardEvent::JobCreated {
            job: job("1", "Acme", Stage::Applied),
        };
        let Some(Message::Text(text)) = event_frame(&event) else {
            panic!("Expected a text frame");
        };
        let json: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
        assert_eq!(json["type"], "JobCreated");
        assert_eq!(json["data"]["job"]["companyName"], "Acme");
    }

    #[test]
    fn test_heartbeat_tolerates_slow_pong_until_timeout() {
        let start = Instant::now();
        let mut heartbeat = Heartbeat::new(start);

        assert!(heartbeat.on_tick(start + PING_INTERVAL));
        assert!(heartbeat.on_tick(start + PING_INTERVAL * 2));
        assert!(!heartbeat.on_tick(start + PONG_TIMEOUT + PING_INTERVAL));
    }

    #[test]
    fn test_heartbeat_pong_resets_deadline() {
        let start = Instant::now();
        let mut heartbeat = Heartbeat::new(start);

        assert!(heartbeat.on_tick(start + PING_INTERVAL));
        heartbeat.on_pong(start + PING_INTERVAL * 2);
        assert!(heartbeat.on_tick(start + PONG_TIMEOUT + PING_INTERVAL));
        assert!(heartbeat.on_tick(start + PONG_TIMEOUT + PING_INTERVAL * 2));
    }

    #[tokio::test]
    async fn test_broadcast_delivers_to_subscribers() {
        let (tx, mut rx) = broadcast::channel(16);
        broadcast_event(
            &tx,
            BoardEvent::JobDeleted {
                job_id: JobId::from("2"),
            },
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            BoardEvent::JobDeleted {
                job_id: JobId::from("2")
            }
        );
    }

    #[test]
    fn test_broadcast_without_receivers_is_silent() {
        let (tx, rx) = broadcast::channel::<BoardEvent>(4);
        drop(rx);
        broadcast_event(
            &tx,
            BoardEvent::JobDeleted {
                job_id: JobId::from("2"),
            },
        );
    }
}
