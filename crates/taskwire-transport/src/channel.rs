//! Websocket push channel.
//!
//! The concrete [`PushChannel`]: one background task owns the physical
//! connection and drives the
//! `Disconnected → Connecting → Connected → Registered` lifecycle.
//! Registration is not persisted server-side, so the `register` frame is
//! re-sent first thing after every reconnect - a client that skips it
//! forfeits delivery. Retry runs on a fixed short interval; the server
//! is assumed to recover quickly, so there is no exponential backoff.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use taskwire_core::channel::{ChannelState, PushChannel};
use taskwire_core::notification::Notification;
use tokio::sync::{Mutex, RwLock, broadcast};
use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const RECONNECT_INTERVAL: Duration = Duration::from_secs(1);
const EVENT_BUFFER: usize = 64;

/// Frames the client sends.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientFrame {
    /// Identity announcement; must precede any delivery.
    Register { user_id: String },
}

/// Frames the server sends.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerFrame {
    /// A full notification record for a relevant task event.
    Notification { payload: Notification },
}

/// [`PushChannel`] over a websocket connection.
pub struct WebSocketChannel {
    url: String,
    state: Arc<RwLock<ChannelState>>,
    events: broadcast::Sender<Notification>,
    /// Present while a connection task is alive; doubles as the
    /// single-connection guard.
    cancel: Mutex<Option<CancellationToken>>,
}

impl WebSocketChannel {
    /// Creates a channel against the given websocket URL (e.g.
    /// `ws://localhost:5000/ws`). Nothing connects until
    /// [`PushChannel::connect`].
    pub fn new(url: impl Into<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            url: url.into(),
            state: Arc::new(RwLock::new(ChannelState::Disconnected)),
            events,
            cancel: Mutex::new(None),
        }
    }
}

#[async_trait]
impl PushChannel for WebSocketChannel {
    async fn connect(&self, user_id: &str) {
        let mut cancel = self.cancel.lock().await;
        if cancel.is_some() {
            // Already connecting or connected; exactly one physical
            // connection per session.
            debug!("push channel connect ignored, already active");
            return;
        }

        let token = CancellationToken::new();
        *cancel = Some(token.clone());
        *self.state.write().await = ChannelState::Connecting;

        tokio::spawn(run_connection(
            self.url.clone(),
            user_id.to_string(),
            self.state.clone(),
            self.events.clone(),
            token,
        ));
    }

    async fn disconnect(&self) {
        let mut cancel = self.cancel.lock().await;
        if let Some(token) = cancel.take() {
            token.cancel();
        }
        *self.state.write().await = ChannelState::Disconnected;
    }

    async fn state(&self) -> ChannelState {
        *self.state.read().await
    }

    fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.events.subscribe()
    }
}

/// The connection task: connect, register, pump events, reconnect.
async fn run_connection(
    url: String,
    user_id: String,
    state: Arc<RwLock<ChannelState>>,
    events: broadcast::Sender<Notification>,
    cancel: CancellationToken,
) {
    loop {
        *state.write().await = ChannelState::Connecting;

        let connect = tokio::select! {
            _ = cancel.cancelled() => break,
            result = connect_async(url.as_str()) => result,
        };

        let mut ws = match connect {
            Ok((ws, _)) => ws,
            Err(err) => {
                warn!(%err, "push channel connect failed");
                *state.write().await = ChannelState::Disconnected;
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = sleep(RECONNECT_INTERVAL) => continue,
                }
            }
        };
        *state.write().await = ChannelState::Connected;

        // Registration first, on every (re)connect.
        let frame = match serde_json::to_string(&ClientFrame::Register {
            user_id: user_id.clone(),
        }) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(%err, "failed to encode register frame");
                break;
            }
        };
        if ws.send(Message::Text(frame)).await.is_err() {
            warn!("push channel dropped before registration");
            *state.write().await = ChannelState::Disconnected;
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(RECONNECT_INTERVAL) => continue,
            }
        }
        *state.write().await = ChannelState::Registered;
        info!(user_id, "push channel registered");

        // Pump incoming frames until the transport drops or we are told
        // to stop.
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    let _ = ws.close(None).await;
                    *state.write().await = ChannelState::Disconnected;
                    return;
                }
                message = ws.next() => match message {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerFrame>(&text) {
                            Ok(ServerFrame::Notification { payload }) => {
                                // No receivers just means nobody is
                                // wired up yet; not an error.
                                let _ = events.send(payload);
                            }
                            Err(err) => warn!(%err, "unrecognized push frame"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        info!("push channel closed by server");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(%err, "push channel transport error");
                        break;
                    }
                }
            }
        }

        *state.write().await = ChannelState::Disconnected;
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = sleep(RECONNECT_INTERVAL) => {}
        }
    }

    *state.write().await = ChannelState::Disconnected;
}
