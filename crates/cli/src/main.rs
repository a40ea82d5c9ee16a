//! Gearstock CLI - inventory management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Authenticate
//! gearstock login -u asha -p <password>
//! gearstock signup --name "Asha Motors" -u asha -p <password> --role owner
//!
//! # Work with the catalog
//! gearstock list --low
//! gearstock add --name "Spark Plug" --category Electrical --price 50 --quantity 3
//! gearstock update <id> --quantity 12
//! gearstock remove <id>
//!
//! # Stock health dashboard
//! gearstock stats
//!
//! # Prefill a draft from a barcode
//! gearstock scan 8905555555555
//! ```
//!
//! Configuration comes from the environment (see `gearstock_client::config`);
//! `GEARSTOCK_API_URL` must point at the remote product service.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use gearstock_core::Role;

mod commands;

#[derive(Parser)]
#[command(name = "gearstock")]
#[command(author, version, about = "Automotive parts inventory client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the remote service
    Login {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Register a new account
    Signup {
        /// Display name
        #[arg(long)]
        name: String,

        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Role (`owner` or `worker`)
        #[arg(short, long, default_value = "worker")]
        role: Role,
    },
    /// Clear the stored session
    Logout,
    /// Change the active user's password
    ChangePassword {
        /// Current password
        #[arg(long)]
        old_password: String,

        /// New password
        #[arg(long)]
        new_password: String,
    },
    /// Show the active session
    Whoami,
    /// List the catalog
    List {
        /// Only products at or below their low-stock threshold
        #[arg(long)]
        low: bool,
    },
    /// Create a product
    Add {
        /// Product name
        #[arg(long)]
        name: String,

        /// Category label
        #[arg(long)]
        category: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,

        /// Quantity on hand
        #[arg(long)]
        quantity: u32,

        /// Low-stock threshold
        #[arg(long, default_value_t = 5)]
        threshold: u32,

        /// JPG or PNG image to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Update a product
    Update {
        /// Product id
        id: String,

        /// Product name
        #[arg(long)]
        name: String,

        /// Category label
        #[arg(long)]
        category: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,

        /// Quantity on hand
        #[arg(long)]
        quantity: u32,

        /// Low-stock threshold
        #[arg(long, default_value_t = 5)]
        threshold: u32,

        /// JPG or PNG image to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a product
    Remove {
        /// Product id
        id: String,
    },
    /// Stock health summary
    Stats,
    /// Prefill a product draft from a decoded barcode
    Scan {
        /// Decoded barcode text
        code: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&username, &password).await?;
        }
        Commands::Signup {
            name,
            username,
            password,
            role,
        } => {
            commands::auth::signup(&name, &username, &password, role).await?;
        }
        Commands::Logout => commands::auth::logout().await?,
        Commands::ChangePassword {
            old_password,
            new_password,
        } => {
            commands::auth::change_password(&old_password, &new_password).await?;
        }
        Commands::Whoami => commands::auth::whoami().await?,
        Commands::List { low } => commands::inventory::list(low).await?,
        Commands::Add {
            name,
            category,
            price,
            quantity,
            threshold,
            image,
        } => {
            let draft =
                commands::inventory::draft(name, category, price, quantity, threshold, image)?;
            commands::inventory::add(&draft).await?;
        }
        Commands::Update {
            id,
            name,
            category,
            price,
            quantity,
            threshold,
            image,
        } => {
            let draft =
                commands::inventory::draft(name, category, price, quantity, threshold, image)?;
            commands::inventory::update(&id, &draft).await?;
        }
        Commands::Remove { id } => commands::inventory::remove(&id).await?,
        Commands::Stats => commands::inventory::stats().await?,
        Commands::Scan { code } => commands::inventory::scan(code).await?,
    }
    Ok(())
}
