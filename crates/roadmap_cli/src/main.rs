//! Roadmap CLI - Command-line interface for roadmap task tracking.

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use roadmap_core::{Priority, RoadmapContext, RoadmapError, TaskStatus, TaskType};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

#[derive(Parser)]
#[command(name = "roadmap")]
#[command(about = "Task dependency tracking for project roadmaps", long_about = None)]
#[command(version)]
struct Cli {
    /// Project directory
    #[arg(short = 'C', long, global = true, default_value = ".")]
    project: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create .roadmaprc.json and an empty roadmap
    Init {
        /// Roadmap name
        #[arg(short, long, default_value = "Project Roadmap")]
        name: String,
        /// Roadmap description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Roadmap file, relative to the project directory
        #[arg(long, default_value = "roadmap.json")]
        path: String,
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Add a task
    Add {
        /// Task type (bug, feature, improvement, planning, research)
        task_type: TaskType,
        /// Task title
        title: String,
        /// Task details
        #[arg(short, long)]
        details: String,
        /// Priority (high, medium, low)
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
        /// Initial status
        #[arg(short, long, default_value = "not-started")]
        status: TaskStatus,
        /// Prerequisite task IDs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        depends_on: Vec<String>,
        /// Task IDs held up by this task (comma-separated)
        #[arg(long, value_delimiter = ',')]
        blocks: Vec<String>,
        /// Tags (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,
        /// Assignee
        #[arg(short, long)]
        assign: Option<String>,
    },
    /// Update fields of an existing task
    Update {
        /// Task ID (e.g., F-001)
        id: String,
        /// New status
        #[arg(short, long)]
        status: Option<TaskStatus>,
        /// New priority
        #[arg(short, long)]
        priority: Option<Priority>,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New details
        #[arg(long)]
        details: Option<String>,
        /// Replace prerequisites (comma-separated)
        #[arg(long, value_delimiter = ',')]
        depends_on: Option<Vec<String>>,
        /// Replace blocked tasks (comma-separated)
        #[arg(long, value_delimiter = ',')]
        blocks: Option<Vec<String>>,
        /// Notes
        #[arg(short, long)]
        notes: Option<String>,
        /// Assignee
        #[arg(short, long)]
        assign: Option<String>,
        /// Whether the task's tests pass
        #[arg(long)]
        passes_tests: Option<bool>,
    },
    /// Show one task
    Show {
        /// Task ID
        id: String,
    },
    /// List tasks
    List {
        /// Order by dependencies (prerequisites first)
        #[arg(long)]
        sorted: bool,
        /// Only tasks with this status
        #[arg(short, long)]
        status: Option<TaskStatus>,
        /// Only tasks of this type
        #[arg(short = 'T', long = "type")]
        task_type: Option<TaskType>,
    },
    /// Check the roadmap for problems
    Validate,
    /// Show prerequisites and dependents of a task
    Deps {
        /// Task ID
        id: String,
    },
}

fn main() -> ExitCode {
    // Respects RUST_LOG (e.g., RUST_LOG=roadmap_core=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::debug!(project = %cli.project.display(), "starting");
    let mut ctx = RoadmapContext::new(&cli.project);

    let result = run(&mut ctx, cli.command);
    ctx.dispose();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(ctx: &mut RoadmapContext, command: Commands) -> Result<()> {
    match command {
        Commands::Init {
            name,
            description,
            path,
            force,
        } => commands::init::run(ctx, &name, &description, &path, force),
        Commands::Add {
            task_type,
            title,
            details,
            priority,
            status,
            depends_on,
            blocks,
            tags,
            assign,
        } => {
            let mut new = roadmap_core::NewTask::new(task_type, title, details);
            new.priority = priority;
            new.status = status;
            new.depends_on = depends_on;
            new.blocks = blocks;
            new.tags = tags;
            new.assigned_to = assign;
            commands::add::run(ctx, new)
        }
        Commands::Update {
            id,
            status,
            priority,
            title,
            details,
            depends_on,
            blocks,
            notes,
            assign,
            passes_tests,
        } => {
            let update = roadmap_core::TaskUpdate {
                title,
                details,
                status,
                priority,
                depends_on,
                blocks,
                notes,
                assigned_to: assign,
                passes_tests,
            };
            commands::update::run(ctx, &id, update)
        }
        Commands::Show { id } => commands::show::run(ctx, &id),
        Commands::List {
            sorted,
            status,
            task_type,
        } => commands::list::run(ctx, sorted, status, task_type),
        Commands::Validate => commands::validate::run(ctx),
        Commands::Deps { id } => commands::deps::run(ctx, &id),
    }
}

fn report(err: &anyhow::Error) {
    eprintln!("{} {:#}", style("error:").red().bold(), err);
    let hint = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<RoadmapError>())
        .and_then(RoadmapError::recovery_suggestion);
    if let Some(hint) = hint {
        eprintln!("  {} {}", style("→").cyan(), hint);
    }
}
