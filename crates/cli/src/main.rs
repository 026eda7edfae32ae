//! Quickbuy CLI - seed, inspect and edit records, drive the trade-in workflow.
//!
//! # Usage
//!
//! ```bash
//! # Write the demo collections into the data directory
//! qb seed
//!
//! # Log in as an agent and walk a trade-in through the workflow
//! qb agents login -u sarah.mitchell -p password123
//! qb transactions confirm 1
//! qb transactions assign 1 --agent 1
//! qb transactions assess 1 --value 340
//!
//! # Fold legacy sell-flow submissions into the canonical collection
//! qb migrate legacy
//! ```
//!
//! # Commands
//!
//! - `seed` - Write seed collections
//! - `stats` - Dashboard figures
//! - `agents` / `customers` / `devices` - Record management
//! - `transactions` - Trade-in workflow
//! - `admin` - Admin login and profile
//! - `session` - Show or clear the current login
//! - `migrate` - Data migrations
//!
//! Configuration comes from the environment; see `quickbuy_store::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

use quickbuy_core::{
    AccountStatus, AgentId, AgentRole, CustomerId, DeviceCondition, DeviceId, DeviceType, Email,
    TransactionId, TransactionStatus,
};
use quickbuy_store::{StorageKind, StoreConfig, db};

mod commands;

#[derive(Parser)]
#[command(name = "qb")]
#[command(author, version, about = "Quickbuy CLI tools")]
struct Cli {
    /// Use this data directory instead of `QUICKBUY_DATA_DIR`
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the seed collections
    Seed {
        /// Overwrite collections that already hold data
        #[arg(long)]
        force: bool,
    },
    /// Show dashboard figures
    Stats,
    /// Manage agents
    Agents {
        #[command(subcommand)]
        action: AgentAction,
    },
    /// Manage customers
    Customers {
        #[command(subcommand)]
        action: CustomerAction,
    },
    /// Manage the device catalog
    Devices {
        #[command(subcommand)]
        action: DeviceAction,
    },
    /// Drive trade-in transactions
    Transactions {
        #[command(subcommand)]
        action: TransactionAction,
    },
    /// Admin login and profile
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Show or clear the current login
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Run data migrations
    Migrate {
        #[command(subcommand)]
        target: MigrateTarget,
    },
}

#[derive(Subcommand)]
enum AgentAction {
    /// List agents
    List {
        /// Only agents that can take assignments
        #[arg(long)]
        active: bool,
    },
    /// Register a new agent
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(short, long)]
        email: Email,
        #[arg(long, default_value = "")]
        phone: String,
        /// `field_agent`, `senior_agent` or `repair_technician`
        #[arg(short, long, default_value = "field_agent")]
        role: AgentRole,
    },
    /// Remove an agent (assigned transactions keep the agent's name)
    Remove { id: AgentId },
    /// Activate or deactivate an agent
    SetStatus { id: AgentId, status: AccountStatus },
    /// Set a new password
    Passwd {
        id: AgentId,
        #[arg(short, long)]
        password: String,
    },
    /// Log in as an agent
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// List customers
    List,
    /// Add a customer
    Add {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: Email,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Remove a customer
    Remove { id: CustomerId },
}

#[derive(Subcommand)]
enum DeviceAction {
    /// Search the catalog
    List(DeviceSearch),
    /// List a device for sale
    Add(NewDeviceArgs),
    /// Mark a device in or out of stock
    Stock {
        id: DeviceId,
        /// `true` to put back in stock, `false` to take out
        #[arg(action = clap::ArgAction::Set)]
        in_stock: bool,
    },
    /// Remove a device listing
    Remove { id: DeviceId },
}

#[derive(Args)]
struct DeviceSearch {
    #[arg(long)]
    brand: Option<String>,
    #[arg(long = "type")]
    device_type: Option<DeviceType>,
    /// Minimum grade, e.g. `good` also matches `excellent`
    #[arg(long)]
    condition: Option<DeviceCondition>,
    #[arg(long)]
    in_stock: bool,
    #[arg(long)]
    max_price: Option<Decimal>,
}

#[derive(Args)]
struct NewDeviceArgs {
    #[arg(long)]
    brand: String,
    #[arg(long)]
    model: String,
    #[arg(long = "type")]
    device_type: DeviceType,
    #[arg(long, default_value = "good")]
    condition: DeviceCondition,
    #[arg(long, default_value = "")]
    storage: String,
    #[arg(long)]
    price: Decimal,
    /// Price when new; defaults to the asking price
    #[arg(long)]
    original_price: Option<Decimal>,
    /// Image reference (repeat up to three times)
    #[arg(long = "image")]
    images: Vec<String>,
}

#[derive(Subcommand)]
enum TransactionAction {
    /// List transactions
    List {
        /// Only transactions in this status, e.g. `awaiting-offer`
        #[arg(long)]
        status: Option<TransactionStatus>,
        /// Only transactions assigned to this agent
        #[arg(long)]
        agent: Option<AgentId>,
    },
    /// Submit a device for trade-in
    Submit(SubmitArgs),
    /// Show a transaction and its progress
    Show { id: TransactionId },
    /// Confirm a submission
    Confirm { id: TransactionId },
    /// Assign an agent
    Assign {
        id: TransactionId,
        #[arg(long)]
        agent: AgentId,
    },
    /// Record the agent's valuation
    Assess {
        id: TransactionId,
        #[arg(long)]
        value: Decimal,
    },
    /// Queue for an offer
    AwaitOffer { id: TransactionId },
    /// Make an offer
    Offer {
        id: TransactionId,
        #[arg(long)]
        amount: Decimal,
    },
    /// Record the customer's acceptance
    Accept { id: TransactionId },
    /// Record payment
    Pay { id: TransactionId },
    /// Move to the next status when it needs no input
    Advance { id: TransactionId },
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: Email,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long = "type")]
    device_type: DeviceType,
    #[arg(long)]
    brand: String,
    #[arg(long)]
    model: String,
    #[arg(long, default_value = "good")]
    condition: DeviceCondition,
    #[arg(long, default_value = "")]
    description: String,
    /// The customer's own estimate
    #[arg(long)]
    estimate: Decimal,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Log in as the admin
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Show the admin profile
    Profile,
    /// Update the admin profile
    SetProfile {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: Email,
        #[arg(long, default_value = "")]
        phone: String,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Show who is logged in
    Show,
    /// Clear the login
    Logout,
}

#[derive(Subcommand)]
enum MigrateTarget {
    /// Move legacy `transactions` entries into `quickbuy_transactions`
    Legacy,
}

fn main() {
    // Load .env before reading the log settings
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("quickbuy=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let json = std::env::var("QUICKBUY_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = StoreConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
        config.storage = StorageKind::File;
    }
    if config.storage == StorageKind::Memory {
        tracing::warn!("QUICKBUY_STORAGE=memory: changes are discarded when the command exits");
    }
    let store = db::open(&config)?;

    match cli.command {
        Commands::Seed { force } => commands::seed::run(&store, force)?,
        Commands::Stats => commands::stats::show(&store)?,
        Commands::Agents { action } => match action {
            AgentAction::List { active } => commands::agents::list(&store, active)?,
            AgentAction::Add {
                name,
                username,
                password,
                email,
                phone,
                role,
            } => commands::agents::add(
                &store,
                &config,
                commands::agents::NewAgentInput {
                    name,
                    username,
                    password,
                    email,
                    phone,
                    role,
                },
            )?,
            AgentAction::Remove { id } => commands::agents::remove(&store, id)?,
            AgentAction::SetStatus { id, status } => {
                commands::agents::set_status(&store, id, status)?;
            }
            AgentAction::Passwd { id, password } => {
                commands::agents::change_password(&store, &config, id, &password)?;
            }
            AgentAction::Login { username, password } => {
                commands::agents::login(&store, &config, &username, &password)?;
            }
        },
        Commands::Customers { action } => match action {
            CustomerAction::List => commands::customers::list(&store)?,
            CustomerAction::Add { name, email, phone } => {
                commands::customers::add(&store, &name, email, &phone)?;
            }
            CustomerAction::Remove { id } => commands::customers::remove(&store, id)?,
        },
        Commands::Devices { action } => match action {
            DeviceAction::List(search) => commands::devices::list(
                &store,
                &db::DeviceFilter {
                    brand: search.brand,
                    device_type: search.device_type,
                    min_condition: search.condition,
                    in_stock_only: search.in_stock,
                    max_price: search.max_price,
                },
            )?,
            DeviceAction::Add(args) => commands::devices::add(
                &store,
                commands::devices::NewDeviceInput {
                    brand: args.brand,
                    model: args.model,
                    device_type: args.device_type,
                    condition: args.condition,
                    storage: args.storage,
                    price: args.price,
                    original_price: args.original_price,
                    images: args.images,
                },
            )?,
            DeviceAction::Stock { id, in_stock } => {
                commands::devices::set_stock(&store, id, in_stock)?;
            }
            DeviceAction::Remove { id } => commands::devices::remove(&store, id)?,
        },
        Commands::Transactions { action } => run_transaction(&store, action)?,
        Commands::Admin { action } => match action {
            AdminAction::Login { email, password } => {
                commands::admin::login(&store, &config, &email, &password)?;
            }
            AdminAction::Profile => commands::admin::show_profile(&store, &config)?,
            AdminAction::SetProfile { name, email, phone } => {
                commands::admin::set_profile(&store, name, email, phone)?;
            }
        },
        Commands::Session { action } => match action {
            SessionAction::Show => commands::session::show(&store)?,
            SessionAction::Logout => commands::session::logout(&store, &config)?,
        },
        Commands::Migrate { target } => match target {
            MigrateTarget::Legacy => commands::migrate::legacy(&store)?,
        },
    }
    Ok(())
}

fn run_transaction(
    store: &quickbuy_store::RecordStore,
    action: TransactionAction,
) -> Result<(), Box<dyn std::error::Error>> {
    use commands::transactions as tx;

    match action {
        TransactionAction::List { status, agent } => tx::list(store, status, agent)?,
        TransactionAction::Submit(args) => tx::submit(
            store,
            quickbuy_store::models::SellSubmission {
                customer_name: args.name,
                customer_email: args.email,
                customer_phone: args.phone,
                device_type: args.device_type,
                brand: args.brand,
                model: args.model,
                condition: args.condition,
                description: args.description,
                estimated_value: args.estimate,
            },
        )?,
        TransactionAction::Show { id } => tx::show(store, id)?,
        TransactionAction::Confirm { id } => tx::confirm(store, id)?,
        TransactionAction::Assign { id, agent } => tx::assign(store, id, agent)?,
        TransactionAction::Assess { id, value } => tx::assess(store, id, value)?,
        TransactionAction::AwaitOffer { id } => tx::await_offer(store, id)?,
        TransactionAction::Offer { id, amount } => tx::offer(store, id, amount)?,
        TransactionAction::Accept { id } => tx::accept(store, id)?,
        TransactionAction::Pay { id } => tx::pay(store, id)?,
        TransactionAction::Advance { id } => tx::advance(store, id)?,
    }
    Ok(())
}
