//! Session domain model and persistence contract.
//!
//! A session is the authenticated identity plus its opaque credential
//! token. Exactly one session is active at a time, process-wide.

mod model;
mod store;

pub use model::{Credentials, PersistedSession, RegisterPayload, Session, SessionEvent};
pub use store::SessionStore;
