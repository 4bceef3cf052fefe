//! Taskwire domain core.
//!
//! Domain models, the error taxonomy, and the pure reconciliation state
//! machines of the sync engine: the notification reconciler, the task
//! board with fetch-sequence discrimination, the toast queue, and the
//! filter state. I/O happens behind the [`gateway::ApiGateway`],
//! [`channel::PushChannel`], [`session::SessionStore`], and
//! [`notifier::SystemNotifier`] traits so the engine can be exercised
//! without a server.

pub mod activity;
pub mod channel;
pub mod error;
pub mod filter;
pub mod gateway;
pub mod notification;
pub mod notifier;
pub mod session;
pub mod task;
pub mod toast;
pub mod user;

// Re-export common error type
pub use error::{Result, TaskwireError};
