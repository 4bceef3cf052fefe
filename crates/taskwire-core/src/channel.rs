//! Push channel contract.
//!
//! The persistent bidirectional connection the server uses to proactively
//! deliver notification events. The concrete transport lives elsewhere;
//! this module defines the state machine vocabulary and the interface the
//! application wires against.

use crate::notification::Notification;
use async_trait::async_trait;
use tokio::sync::broadcast;

/// Connection lifecycle states.
///
/// `Connected → Registered` happens by sending the active session's
/// identity immediately upon connect, and must re-occur on every
/// reconnect - the server does not remember registrations across
/// disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// Identity sent; the server will now deliver events for this user.
    Registered,
}

/// The push connection owned by the channel manager.
///
/// Guarantee: exactly one physical connection exists per active session.
/// `connect` while already connecting/connected is a no-op, not a second
/// connection; `disconnect` is idempotent and safe to call when never
/// connected.
#[async_trait]
pub trait PushChannel: Send + Sync {
    /// Opens the connection for the given user and keeps it alive,
    /// re-registering after every reconnect, until `disconnect`.
    async fn connect(&self, user_id: &str);

    /// Tears the connection down and stops delivery into the session.
    async fn disconnect(&self);

    /// The current connection state.
    async fn state(&self) -> ChannelState;

    /// Subscribes to push-delivered notifications, in delivery order.
    ///
    /// After `disconnect`, receivers stop getting events; nothing is
    /// delivered into a torn-down session.
    fn subscribe(&self) -> broadcast::Receiver<Notification>;
}
