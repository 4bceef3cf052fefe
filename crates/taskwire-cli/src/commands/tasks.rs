use super::require_session;
use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use taskwire_application::App;
use taskwire_core::filter::{PriorityFilter, StatusFilter, TaskFilterPatch, TaskScope};
use taskwire_core::task::{Task, TaskDraft, TaskPriority, TaskStatus};

#[derive(Subcommand)]
pub enum TaskCommand {
    /// List tasks matching a filter
    List(ListArgs),
    /// Create a task
    Create(CreateArgs),
    /// Update fields of a task
    Update(UpdateArgs),
    /// Advance a task's status one step
    Complete { id: String },
    /// Delete a task (asks for confirmation)
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show a task's activity log
    Logs { id: String },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ScopeArg {
    All,
    Created,
    Assigned,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    All,
    Pending,
    InProgress,
    Completed,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PriorityArg {
    All,
    Low,
    Medium,
    High,
}

#[derive(Args)]
pub struct ListArgs {
    #[arg(long, value_enum)]
    scope: Option<ScopeArg>,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    #[arg(long, value_enum)]
    priority: Option<PriorityArg>,
    /// Free-text search
    #[arg(long)]
    search: Option<String>,
}

#[derive(Args)]
pub struct CreateArgs {
    title: String,
    #[arg(long, default_value = "")]
    description: String,
    #[arg(long, value_enum, default_value = "medium")]
    priority: PriorityArg,
    /// Due date, RFC 3339 (e.g. 2026-09-01T17:00:00Z)
    #[arg(long)]
    due: Option<DateTime<Utc>>,
    /// Assignee user id
    #[arg(long)]
    assign: Option<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    id: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long, value_enum)]
    priority: Option<PriorityArg>,
    #[arg(long, value_enum)]
    status: Option<StatusArg>,
    #[arg(long)]
    due: Option<DateTime<Utc>>,
    #[arg(long)]
    assign: Option<String>,
}

impl From<ScopeArg> for TaskScope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::All => Self::All,
            ScopeArg::Created => Self::Created,
            ScopeArg::Assigned => Self::Assigned,
        }
    }
}

impl From<StatusArg> for StatusFilter {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::All => Self::All,
            StatusArg::Pending => Self::Pending,
            StatusArg::InProgress => Self::InProgress,
            StatusArg::Completed => Self::Completed,
        }
    }
}

impl From<PriorityArg> for PriorityFilter {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::All => Self::All,
            PriorityArg::Low => Self::Low,
            PriorityArg::Medium => Self::Medium,
            PriorityArg::High => Self::High,
        }
    }
}

fn to_priority(arg: PriorityArg) -> Option<TaskPriority> {
    match arg {
        PriorityArg::All => None,
        PriorityArg::Low => Some(TaskPriority::Low),
        PriorityArg::Medium => Some(TaskPriority::Medium),
        PriorityArg::High => Some(TaskPriority::High),
    }
}

fn to_status(arg: StatusArg) -> Option<TaskStatus> {
    match arg {
        StatusArg::All => None,
        StatusArg::Pending => Some(TaskStatus::Pending),
        StatusArg::InProgress => Some(TaskStatus::InProgress),
        StatusArg::Completed => Some(TaskStatus::Completed),
    }
}

pub async fn run(app: &App, command: TaskCommand) -> Result<()> {
    require_session(app).await?;

    match command {
        TaskCommand::List(args) => {
            app.tasks()
                .set_filter(TaskFilterPatch {
                    scope: args.scope.map(Into::into),
                    status: args.status.map(Into::into),
                    priority: args.priority.map(Into::into),
                    search: args.search,
                })
                .await;
            let result = app.guard(app.tasks().refresh().await).await;
            result?;
            let tasks = app.tasks().tasks().await;
            if tasks.is_empty() {
                println!("No tasks match.");
            }
            for task in tasks {
                print_task(&task);
            }
        }
        TaskCommand::Create(args) => {
            let mut draft = TaskDraft::new(args.title);
            draft.description = args.description;
            if let Some(priority) = to_priority(args.priority) {
                draft.priority = priority;
            }
            draft.due_date = args.due;
            draft.assigned_to = args.assign;

            let task = app.guard(app.tasks().create(draft).await).await?;
            println!("Created {} ({})", task.title, task.id);
        }
        TaskCommand::Update(args) => {
            let Some(current) = app.tasks().get(&args.id).await else {
                bail!("No task {} in the current view", args.id);
            };
            let mut draft = TaskDraft::from_task(&current);
            if let Some(title) = args.title {
                draft.title = title;
            }
            if let Some(description) = args.description {
                draft.description = description;
            }
            if let Some(priority) = args.priority.and_then(to_priority) {
                draft.priority = priority;
            }
            if let Some(status) = args.status.and_then(to_status) {
                draft.status = status;
            }
            if args.due.is_some() {
                draft.due_date = args.due;
            }
            if args.assign.is_some() {
                draft.assigned_to = args.assign;
            }

            let task = app.guard(app.tasks().update(&args.id, draft).await).await?;
            println!("Updated {} ({})", task.title, task.id);
        }
        TaskCommand::Complete { id } => {
            let Some(current) = app.tasks().get(&id).await else {
                bail!("No task {} in the current view", id);
            };
            let mut draft = TaskDraft::from_task(&current);
            draft.status = current.status.advanced();

            let task = app.guard(app.tasks().update(&id, draft).await).await?;
            println!("{} is now {}", task.title, task.status);
        }
        TaskCommand::Delete { id, yes } => {
            // Irreversible; never issue the call without confirmation.
            if !yes && !confirm(&format!("Delete task {}? [y/N] ", id))? {
                println!("Aborted.");
                return Ok(());
            }
            app.guard(app.tasks().delete(&id).await).await?;
            println!("Deleted {}", id);
        }
        TaskCommand::Logs { id } => {
            let logs = app.guard(app.activity().logs_for(&id).await).await?;
            if logs.is_empty() {
                println!("No activity for {}", id);
            }
            for entry in logs {
                match &entry.details {
                    Some(details) => println!(
                        "{}  {}  {} ({})",
                        entry.created_at.format("%Y-%m-%d %H:%M"),
                        entry.action,
                        details,
                        entry.performed_by
                    ),
                    None => println!(
                        "{}  {}  ({})",
                        entry.created_at.format("%Y-%m-%d %H:%M"),
                        entry.action,
                        entry.performed_by
                    ),
                }
            }
        }
    }

    Ok(())
}

fn print_task(task: &Task) {
    let due = task
        .due_date
        .map(|d| format!(" due {}", d.format("%Y-%m-%d")))
        .unwrap_or_default();
    let overdue = if task.is_overdue(Utc::now()) {
        " OVERDUE"
    } else {
        ""
    };
    println!(
        "[{}] {}  {} / {}{}{}",
        task.id, task.title, task.status, task.priority, due, overdue
    );
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
