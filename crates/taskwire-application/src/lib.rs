//! Taskwire application layer.
//!
//! Use-case services over the domain core: session lifecycle, the
//! notification and task view services, the toast queue with timers,
//! the activity-log cache, and the [`App`] aggregate that wires them
//! together with the cross-component policies (bootstrap on login, full
//! reset on logout, push-event resynchronization, auth teardown).

pub mod activity;
pub mod app;
pub mod notifications;
pub mod session;
pub mod tasks;
pub mod toasts;

pub use app::App;
pub use notifications::NotificationService;
pub use session::SessionService;
pub use tasks::TaskService;
pub use toasts::{ToastEvent, ToastService};
