use super::require_session;
use anyhow::Result;
use taskwire_application::{App, ToastEvent};
use tracing::warn;

/// Stays connected and prints toasts as they happen, until Ctrl-C.
///
/// This is the realtime surface of the client: push-delivered
/// notifications arrive over the channel, get reconciled, and show up
/// here as toasts while the task view re-fetches in the background.
pub async fn run(app: &App) -> Result<()> {
    let session = require_session(app).await?;
    println!(
        "Watching as {}. Press Ctrl-C to stop.",
        session.user.display_name
    );

    let mut toasts = app.toasts().subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            event = toasts.recv() => match event {
                Ok(ToastEvent::Shown(toast)) => {
                    let unread = app.notifications().unread_count().await;
                    println!(
                        "{}  {}  ({} unread)",
                        toast.created_at.format("%H:%M:%S"),
                        toast.message,
                        unread
                    );
                }
                Ok(ToastEvent::Dismissed(_)) => {}
                Err(err) => {
                    warn!(%err, "toast stream interrupted");
                    break;
                }
            }
        }
    }

    println!("Stopped watching.");
    Ok(())
}
