//! CLI entry point for task-manager.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use task_manager::build_router;
use task_manager::http::TaskPayload;
use task_manager_app::{ServerConfig, TaskQueryBuilder, TaskService};
use task_manager_core::TaskStatus;
use task_manager_core::id::TaskId;
use task_manager_store_json::JsonFileStore;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};
use validator::Validate;

/// Task tracking REST API persisted to a single JSON file.
#[derive(Parser, Debug)]
#[command(
    name = "task-manager",
    version,
    about = "task-manager: CRUD REST API over tasks stored in <data-dir>/tasks.json"
)]
struct Cli {
    /// Configuration file (defaults to ./task-manager.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding tasks.json (overrides config and environment).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP server.
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:5239.
        #[arg(long)]
        bind: Option<String>,
    },

    /// List tasks as JSON, filtered and ordered like `GET /api/tasks`.
    Ls {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        order_by: Option<String>,
        #[arg(long)]
        order_direction: Option<String>,
        #[arg(long)]
        created_after: Option<String>,
        #[arg(long)]
        created_before: Option<String>,
    },

    /// Show a single task as JSON.
    Show {
        id: TaskId,
    },

    /// Create a task from the command line.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long, default_value = "pending")]
        status: TaskStatus,
    },
}

fn main() -> Result<()> {
    let Cli {
        config,
        data_dir,
        cmd,
    } = Cli::parse();

    install_tracing();

    let mut config = ServerConfig::load(config.as_deref())?;
    if let Some(dir) = data_dir {
        config.data_directory = dir;
    }
    if let Command::Serve { bind: Some(bind) } = &cmd {
        bind.clone_into(&mut config.bind_address);
    }
    config.validate()?;

    execute_command(config, cmd)
}

fn execute_command(config: ServerConfig, command: Command) -> Result<()> {
    let open_service = || -> Result<TaskService<JsonFileStore>> {
        Ok(TaskService::new(JsonFileStore::open(&config.data_directory)?))
    };

    match command {
        Command::Serve { .. } => tokio::runtime::Runtime::new()?.block_on(serve(config)),

        Command::Ls {
            status,
            order_by,
            order_direction,
            created_after,
            created_before,
        } => {
            let query = TaskQueryBuilder::new()
                .with_status(status)?
                .with_created_range(created_after, created_before)?
                .with_order(order_by.as_deref(), order_direction.as_deref())
                .build();
            print_json(&open_service()?.list_tasks(&query)?)
        }

        Command::Show { id } => match open_service()?.get_task(id)? {
            Some(view) => print_json(&view),
            None => bail!("task {id} not found"),
        },

        Command::Add {
            title,
            description,
            status,
        } => {
            let payload = TaskPayload {
                title,
                description,
                status,
            };
            payload.validate()?;
            let view = open_service()?.create_task(payload.into())?;
            info!(id = %view.id, "Task created");
            print_json(&view)
        }
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    let store = JsonFileStore::open(&config.data_directory)?;
    info!(path = %store.path().display(), "Using task file");

    let app = build_router(TaskService::new(store), &config);
    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    info!(address = %listener.local_addr()?, "Task manager API started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn install_tracing() {
    // RUST_LOG is honoured through EnvFilter; INFO by default. Logs go to
    // stderr so `ls` and `show` keep stdout as plain JSON.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
