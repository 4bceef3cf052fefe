//! The application aggregate.
//!
//! Wires the services together and owns the cross-component policies:
//! session changes drive the push channel and the bootstrap fetches, a
//! push event drives the reconciler and then an authoritative task
//! re-fetch, and any credential rejection tears the whole session down.

use crate::activity::ActivityLogService;
use crate::notifications::NotificationService;
use crate::session::SessionService;
use crate::tasks::TaskService;
use crate::toasts::ToastService;
use std::sync::Arc;
use taskwire_core::channel::{ChannelState, PushChannel};
use taskwire_core::error::{Result, TaskwireError};
use taskwire_core::gateway::ApiGateway;
use taskwire_core::notification::{Notification, PushOutcome};
use taskwire_core::notifier::SystemNotifier;
use taskwire_core::session::{Credentials, RegisterPayload, Session, SessionStore};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::warn;

/// The assembled sync engine.
///
/// One instance per process; all collections hang off the services held
/// here, and all cross-component behavior goes through these methods
/// rather than through the services directly. Cheap to clone; clones
/// share the same state.
#[derive(Clone)]
pub struct App {
    inner: Arc<Inner>,
}

struct Inner {
    api: Arc<dyn ApiGateway>,
    session: SessionService,
    channel: Arc<dyn PushChannel>,
    tasks: TaskService,
    notifications: NotificationService,
    activity: ActivityLogService,
    toasts: Arc<ToastService>,
}

impl App {
    pub fn new(
        api: Arc<dyn ApiGateway>,
        channel: Arc<dyn PushChannel>,
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn SystemNotifier>,
    ) -> Self {
        let toasts = Arc::new(ToastService::new());
        Self {
            inner: Arc::new(Inner {
                session: SessionService::new(api.clone(), store),
                channel,
                tasks: TaskService::new(api.clone(), toasts.clone()),
                notifications: NotificationService::new(api.clone(), toasts.clone(), notifier),
                activity: ActivityLogService::new(api.clone()),
                api,
                toasts,
            }),
        }
    }

    /// Starts the push event pump and installs the session-level error
    /// policy. Call once, after construction.
    pub async fn start(&self) -> JoinHandle<()> {
        let app = self.clone();
        self.inner
            .tasks
            .set_refresh_error_callback(Arc::new(move |err| {
                if err.is_auth() {
                    let app = app.clone();
                    tokio::spawn(async move { app.force_teardown().await });
                }
            }))
            .await;

        let app = self.clone();
        tokio::spawn(async move {
            let mut events = app.inner.channel.subscribe();
            loop {
                match events.recv().await {
                    Ok(notification) => app.handle_push(notification).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Dropped events are recovered by the next
                        // authoritative snapshot.
                        warn!(skipped, "push event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    async fn handle_push(&self, notification: Notification) {
        if self.inner.session.current().await.is_none() {
            // Late delivery into a torn-down session.
            return;
        }

        let outcome = self.inner.notifications.handle_push(notification).await;
        if outcome == PushOutcome::Inserted {
            // The event only announces that something changed; fetch the
            // authoritative task state rather than trusting the payload.
            if let Err(err) = self.inner.tasks.refresh().await {
                self.handle_background_error(err).await;
            }
        }
    }

    /// Restores a persisted session and bootstraps it, if one exists.
    pub async fn restore(&self) -> Result<Option<Session>> {
        match self.inner.session.restore().await? {
            Some(session) => {
                self.bootstrap(&session).await;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let session = self.inner.session.login(credentials).await?;
        self.bootstrap(&session).await;
        Ok(session)
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<Session> {
        let session = self.inner.session.register(payload).await?;
        self.bootstrap(&session).await;
        Ok(session)
    }

    /// Connects the push channel and fetches the initial snapshots.
    async fn bootstrap(&self, session: &Session) {
        self.inner.channel.connect(&session.user.id).await;

        if let Err(err) = self.inner.tasks.refresh().await {
            if self.handle_background_error(err).await {
                return;
            }
        }
        if let Err(err) = self.inner.notifications.refresh(&session.user.id).await {
            self.handle_background_error(err).await;
        }
    }

    /// The full reset: persisted state, channel, and every collection.
    ///
    /// Nothing of one user's data survives into the next session.
    pub async fn logout(&self) -> Result<()> {
        self.inner.channel.disconnect().await;
        self.inner.session.logout().await?;
        self.inner.tasks.clear().await;
        self.inner.notifications.clear().await;
        self.inner.activity.clear().await;
        Ok(())
    }

    /// Applies the session error policy to a background failure.
    ///
    /// # Returns
    ///
    /// `true` if the failure was fatal and the session was torn down.
    async fn handle_background_error(&self, err: TaskwireError) -> bool {
        if err.is_auth() {
            self.force_teardown().await;
            true
        } else {
            warn!(%err, "background refresh failed, keeping stale state");
            false
        }
    }

    async fn force_teardown(&self) {
        warn!("credential rejected, tearing session down");
        if let Err(err) = self.logout().await {
            warn!(%err, "teardown cleanup failed");
        }
    }

    /// Runs a user-initiated call under the session error policy: auth
    /// failures tear the session down before propagating.
    pub async fn guard<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if err.is_auth() {
                self.force_teardown().await;
            }
        }
        result
    }

    /// Fetches the user directory (for assignee pickers).
    pub async fn users(&self) -> Result<Vec<taskwire_core::user::User>> {
        self.inner.api.list_users().await
    }

    pub fn session(&self) -> &SessionService {
        &self.inner.session
    }

    pub fn tasks(&self) -> &TaskService {
        &self.inner.tasks
    }

    pub fn notifications(&self) -> &NotificationService {
        &self.inner.notifications
    }

    pub fn activity(&self) -> &ActivityLogService {
        &self.inner.activity
    }

    pub fn toasts(&self) -> &ToastService {
        &self.inner.toasts
    }

    pub async fn channel_state(&self) -> ChannelState {
        self.inner.channel.state().await
    }
}
