use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use taskwire_application::App;
use taskwire_infrastructure::{FileSessionStore, LoggingNotifier, TransportConfig};
use taskwire_transport::{ApiClient, WebSocketChannel};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::notifications::NotificationsCommand;
use commands::session::{LoginArgs, RegisterArgs};
use commands::tasks::TaskCommand;

#[derive(Parser)]
#[command(name = "taskwire")]
#[command(about = "Taskwire - realtime task tracker client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and persist the session
    Login(LoginArgs),
    /// Create an account and log in
    Register(RegisterArgs),
    /// Log out and clear all local state
    Logout,
    /// Show the active session
    Whoami,
    /// Work with tasks
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Work with notifications
    Notifications {
        #[command(subcommand)]
        command: NotificationsCommand,
    },
    /// List users tasks can be assigned to
    Users,
    /// Stay connected and print realtime activity
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let config = TransportConfig::load()?;
    let api = Arc::new(ApiClient::new(config.api_base_url.clone()));
    let channel = Arc::new(WebSocketChannel::new(config.push_url.clone()));
    let store = Arc::new(FileSessionStore::new()?);
    let notifier = Arc::new(LoggingNotifier::new());

    let app = App::new(api, channel, store, notifier);
    let _pump = app.start().await;

    let cli = Cli::parse();
    match cli.command {
        Commands::Login(args) => commands::session::login(&app, args).await?,
        Commands::Register(args) => commands::session::register(&app, args).await?,
        Commands::Logout => commands::session::logout(&app).await?,
        Commands::Whoami => commands::session::whoami(&app).await?,
        Commands::Task { command } => commands::tasks::run(&app, command).await?,
        Commands::Notifications { command } => commands::notifications::run(&app, command).await?,
        Commands::Users => commands::users::run(&app).await?,
        Commands::Watch => commands::watch::run(&app).await?,
    }

    Ok(())
}
