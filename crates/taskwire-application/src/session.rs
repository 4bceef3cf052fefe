//! Session lifecycle service.
//!
//! Owns the single active session: restore at startup, login/register,
//! and logout. Every change is broadcast so the rest of the engine
//! (channel wiring, view state) reacts without polling. The service
//! only manages identity; the full-reset orchestration on logout lives
//! with the [`App`](crate::app::App) aggregate.

use std::sync::Arc;
use taskwire_core::error::Result;
use taskwire_core::gateway::ApiGateway;
use taskwire_core::session::{Credentials, RegisterPayload, Session, SessionEvent, SessionStore};
use tokio::sync::{RwLock, broadcast};
use tracing::info;

const EVENT_BUFFER: usize = 8;

/// Holds the active session and its persistence.
pub struct SessionService {
    api: Arc<dyn ApiGateway>,
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionService {
    pub fn new(api: Arc<dyn ApiGateway>, store: Arc<dyn SessionStore>) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            api,
            store,
            current: RwLock::new(None),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Restores the persisted session at startup.
    ///
    /// Invalid or corrupt persisted data yields `None` (the store clears
    /// itself); nothing is activated in that case.
    pub async fn restore(&self) -> Result<Option<Session>> {
        match self.store.load().await? {
            Some(persisted) => {
                let session: Session = persisted.into();
                info!(user = %session.user.id, "restored persisted session");
                self.activate(session.clone()).await;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    /// Exchanges credentials for a session and persists it atomically.
    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let session = self.api.login(credentials).await?;
        self.store.save(&session.clone().into()).await?;
        self.activate(session.clone()).await;
        Ok(session)
    }

    /// Creates an account; on success behaves exactly like login.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<Session> {
        let session = self.api.register(payload).await?;
        self.store.save(&session.clone().into()).await?;
        self.activate(session.clone()).await;
        Ok(session)
    }

    /// Drops the active session and its persisted state.
    pub async fn logout(&self) -> Result<()> {
        self.store.clear().await?;
        self.api.set_token(None).await;
        *self.current.write().await = None;
        let _ = self.events.send(SessionEvent::LoggedOut);
        Ok(())
    }

    pub async fn current(&self) -> Option<Session> {
        self.current.read().await.clone()
    }

    async fn activate(&self, session: Session) {
        self.api.set_token(Some(session.token.clone())).await;
        *self.current.write().await = Some(session.clone());
        let _ = self.events.send(SessionEvent::LoggedIn(session));
    }
}
