use anyhow::Result;
use clap::Args;
use taskwire_application::App;
use taskwire_core::session::{Credentials, RegisterPayload};

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

pub async fn login(app: &App, args: LoginArgs) -> Result<()> {
    let session = app
        .login(&Credentials {
            email: args.email,
            password: args.password,
        })
        .await?;
    println!(
        "Logged in as {} <{}>",
        session.user.display_name, session.user.email
    );
    Ok(())
}

pub async fn register(app: &App, args: RegisterArgs) -> Result<()> {
    let session = app
        .register(&RegisterPayload {
            display_name: args.name,
            email: args.email,
            password: args.password,
        })
        .await?;
    println!(
        "Welcome, {}. You are now logged in.",
        session.user.display_name
    );
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.logout().await?;
    println!("Logged out.");
    Ok(())
}

pub async fn whoami(app: &App) -> Result<()> {
    match app.restore().await? {
        Some(session) => println!(
            "{} <{}> (id {})",
            session.user.display_name, session.user.email, session.user.id
        ),
        None => println!("Not logged in."),
    }
    Ok(())
}
