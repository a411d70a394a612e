//! # todo CLI
//!
//! Command-line front end for the todo API.
//!
//! ```bash
//! export TODO_TOKEN=$(todo login --email ada@example.com --password correct-horse-1)
//! todo add "Buy milk" --description "oat"
//! todo list
//! todo toggle 1
//! todo rm 1
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use todo_client::{types::Todo, TodoClient, TodoListState};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "todo", version, about = "Manage your todos from the terminal")]
struct Cli {
    /// Server URL
    #[arg(long, env = "TODO_SERVER", default_value = "http://localhost:8080")]
    server: String,

    /// Bearer token from `register` or `login`
    #[arg(long, env = "TODO_TOKEN", hide_env_values = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and print its token
    Register {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TODO_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        name: Option<String>,
    },
    /// Log in and print a token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "TODO_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List todos, newest first
    List,
    /// Add a todo
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Flip a todo between done and not done
    Toggle { id: i64 },
    /// Delete a todo
    Rm { id: i64 },
}

fn print_todo(todo: &Todo) {
    let mark = if todo.completed { "x" } else { " " };
    match todo.description.as_deref().filter(|d| !d.is_empty()) {
        Some(description) => println!("[{}] #{} {} - {}", mark, todo.id, todo.title, description),
        None => println!("[{}] #{} {}", mark, todo.id, todo.title),
    }
}

fn authenticated(cli: &Cli) -> Result<TodoListState> {
    let token = cli
        .token
        .as_deref()
        .context("No token: pass --token or set TODO_TOKEN (see `todo login`)")?;
    Ok(TodoListState::new(TodoClient::new(&cli.server).with_token(token)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "todo_client=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Register {
            email,
            password,
            name,
        } => {
            let auth = TodoClient::new(&cli.server)
                .register(email, password, name.as_deref())
                .await
                .context("Registration failed")?;
            println!("{}", auth.token);
        }
        Commands::Login { email, password } => {
            let auth = TodoClient::new(&cli.server)
                .login(email, password)
                .await
                .context("Login failed")?;
            println!("{}", auth.token);
        }
        Commands::List => {
            let mut state = authenticated(&cli)?;
            state.refresh().await.context("Failed to fetch todos")?;

            if state.todos().is_empty() {
                println!("No todos yet. Add one with `todo add <title>`.");
            }
            state.todos().iter().for_each(print_todo);
        }
        Commands::Add { title, description } => {
            let mut state = authenticated(&cli)?;
            match state
                .add(title, description.as_deref())
                .await
                .context("Failed to add todo")?
            {
                Some(todo) => print_todo(&todo),
                None => anyhow::bail!("Title cannot be blank"),
            }
        }
        Commands::Toggle { id } => {
            let mut state = authenticated(&cli)?;
            state.refresh().await.context("Failed to fetch todos")?;

            let completed = state
                .get(*id)
                .map(|todo| todo.completed)
                .with_context(|| format!("Todo #{} not found", id))?;
            let todo = state
                .toggle(*id, completed)
                .await
                .context("Failed to update todo")?;
            print_todo(&todo);
        }
        Commands::Rm { id } => {
            let mut state = authenticated(&cli)?;
            state.remove(*id).await.context("Failed to delete todo")?;
            println!("Deleted #{}", id);
        }
    }

    Ok(())
}
