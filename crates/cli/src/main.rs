//! Oracle Commerce CLI - Store setup and admin provisioning.
//!
//! # Usage
//!
//! ```bash
//! # Initialize an empty document store
//! oracle-cli store init
//!
//! # Create an admin user (password from flag or ORACLE_ADMIN_PASSWORD)
//! oracle-cli admin create -e admin@example.com -n "Admin Name" -r super_admin
//! ```
//!
//! # Commands
//!
//! - `store init` - Create an empty document store file
//! - `admin create` - Create admin users
//!
//! There is no default admin account. Every admin is provisioned
//! explicitly through this tool.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "oracle-cli")]
#[command(author, version, about = "Oracle Commerce CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the document store
    Store {
        #[command(subcommand)]
        action: StoreAction,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Create an empty document store file (no-op if it already exists)
    Init,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Admin role (`super_admin`, `admin`, `viewer`)
        #[arg(short, long, default_value = "admin")]
        role: String,

        /// Admin password (falls back to ORACLE_ADMIN_PASSWORD)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Store { action } => match action {
            StoreAction::Init => commands::store::init().await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                role,
                password,
            } => {
                commands::admin::create_user(&email, &name, &role, password.as_deref()).await?;
            }
        },
    }
    Ok(())
}
