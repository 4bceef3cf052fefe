//! Taskwire transport.
//!
//! Outbound network clients: the HTTP API client implementing the
//! snapshot/mutation gateway, and the websocket push channel.

pub mod api;
pub mod channel;

pub use api::ApiClient;
pub use channel::WebSocketChannel;
