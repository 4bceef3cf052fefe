use super::require_session;
use anyhow::Result;
use taskwire_application::App;

/// Lists the users tasks can be assigned to.
pub async fn run(app: &App) -> Result<()> {
    require_session(app).await?;

    let users = app.guard(app.users().await).await?;
    for user in users {
        println!("[{}] {} <{}>", user.id, user.display_name, user.email);
    }
    Ok(())
}
