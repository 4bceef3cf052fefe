use super::require_session;
use anyhow::Result;
use clap::Subcommand;
use taskwire_application::App;

#[derive(Subcommand)]
pub enum NotificationsCommand {
    /// List notifications, newest first
    List,
    /// Mark one notification read
    Read { id: String },
    /// Mark every notification read
    ReadAll,
}

pub async fn run(app: &App, command: NotificationsCommand) -> Result<()> {
    let session = require_session(app).await?;
    let user_id = session.user.id;

    match command {
        NotificationsCommand::List => {
            let notifications = app.notifications().notifications().await;
            let unread = app.notifications().unread_count().await;
            if notifications.is_empty() {
                println!("No notifications.");
                return Ok(());
            }
            for notification in &notifications {
                let marker = if notification.is_read { " " } else { "*" };
                println!(
                    "{} [{}] {}  {}",
                    marker,
                    notification.id,
                    notification.created_at.format("%Y-%m-%d %H:%M"),
                    notification.message
                );
            }
            println!("{} unread", unread);
        }
        NotificationsCommand::Read { id } => {
            app.guard(app.notifications().mark_read(&id).await).await?;
            println!("Marked {} read.", id);
        }
        NotificationsCommand::ReadAll => {
            app.guard(app.notifications().mark_all_read(&user_id).await)
                .await?;
            println!("All read.");
        }
    }

    Ok(())
}
