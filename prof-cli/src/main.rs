//! # prof-cli
//!
//! CLI for the ProfesionalesUY marketplace.
//!
//! ## Commands
//!
//! - `login` / `logout` / `whoami`: manage the saved session
//! - `register client|professional`: create an account
//! - `professionals`, `search`, `profile`: browse professionals
//! - `connect` / `disconnect`: manage a connection with a professional
//! - `messages`: list active conversations
//!
//! ## Example
//!
//! ```bash
//! # Try everything against an in-memory backend
//! prof-cli --mock login --email ana@example.com
//!
//! # Find a plumber and connect
//! prof-cli --mock search Plomero
//! prof-cli --mock connect p1
//!
//! # See conversations
//! prof-cli --mock messages --filter juan
//! ```

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::account::RegisterArgs;
use commands::{account, browse, connections, Env};
use profesionales_core::ProfessionalExtras;

/// CLI for the ProfesionalesUY marketplace.
#[derive(Parser, Debug)]
#[command(name = "prof-cli")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Data directory for the saved session and mock backend
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Client configuration file (default: <data-dir>/profesionales.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use an in-memory backend instead of the real API (for testing/demo)
    #[arg(long, global = true)]
    mock: bool,

    /// More logging (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in
    Login {
        /// Account email
        #[arg(long, short)]
        email: String,

        /// Password (will prompt if not provided)
        #[arg(long, short)]
        password: Option<String>,
    },

    /// Sign out and forget the saved session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Create an account
    Register {
        #[command(subcommand)]
        kind: RegisterKind,
    },

    /// Edit your name, phone or address
    EditProfile {
        /// First name
        #[arg(long)]
        first_name: Option<String>,

        /// Last name
        #[arg(long)]
        last_name: Option<String>,

        /// Phone (empty to clear)
        #[arg(long)]
        phone: Option<String>,

        /// Address (empty to clear)
        #[arg(long)]
        address: Option<String>,
    },

    /// List every professional
    Professionals,

    /// Search professionals by profession
    Search {
        /// Profession to look for
        term: String,
    },

    /// Show a professional's profile
    Profile {
        /// Professional id
        id: String,
    },

    /// Connect with a professional
    Connect {
        /// Professional id
        id: String,
    },

    /// Remove the connection with a professional
    Disconnect {
        /// Professional id
        id: String,
    },

    /// List your conversations
    Messages {
        /// Only show conversations whose name or profession contains this
        #[arg(long, short)]
        filter: Option<String>,
    },

    /// Request a password reset
    ForgotPassword {
        /// Account email
        #[arg(long, short)]
        email: String,
    },
}

#[derive(Subcommand, Debug)]
enum RegisterKind {
    /// Register as a client
    Client(AccountArgs),

    /// Register as a professional
    Professional {
        #[command(flatten)]
        account: AccountArgs,

        /// Profession (e.g. Plomero)
        #[arg(long)]
        profession: String,

        /// Comma-separated specialties
        #[arg(long, default_value = "")]
        specialties: String,

        /// Years of experience
        #[arg(long, default_value = "0")]
        experience: String,

        /// Comma-separated services offered
        #[arg(long, default_value = "")]
        services: String,

        /// Coverage radius in km
        #[arg(long, default_value = "10")]
        radius: String,
    },
}

#[derive(Args, Debug)]
struct AccountArgs {
    /// First name
    #[arg(long)]
    first_name: String,

    /// Last name
    #[arg(long)]
    last_name: String,

    /// Email
    #[arg(long, short)]
    email: String,

    /// Phone (8-9 digits)
    #[arg(long)]
    phone: String,

    /// Address, used to locate you on the map
    #[arg(long)]
    address: String,

    /// Password (will prompt if not provided)
    #[arg(long, short)]
    password: Option<String>,
}

impl From<AccountArgs> for RegisterArgs {
    fn from(args: AccountArgs) -> Self {
        Self {
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone: args.phone,
            address: args.address,
            password: args.password,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    // Determine data directory
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => default_data_dir()?,
    };

    // Ensure data directory exists
    tokio::fs::create_dir_all(&data_dir)
        .await
        .context("Failed to create data directory")?;
    config::set_dir_permissions_0700(&data_dir).await?;

    let config_path = cli
        .config
        .unwrap_or_else(|| data_dir.join("profesionales.toml"));
    let env = Env::open(&data_dir, &config_path, cli.mock).await?;

    let result = match cli.command {
        Commands::Login { email, password } => {
            account::login(&env, &email, password.as_deref()).await
        }
        Commands::Logout => account::logout(&env).await,
        Commands::Whoami => account::whoami(&env).await,
        Commands::Register { kind } => match kind {
            RegisterKind::Client(args) => account::register(&env, args.into(), None).await,
            RegisterKind::Professional {
                account: args,
                profession,
                specialties,
                experience,
                services,
                radius,
            } => {
                let extras = ProfessionalExtras {
                    profession,
                    specialties,
                    years_of_experience: experience,
                    services,
                    coverage_radius_km: radius,
                };
                account::register(&env, args.into(), Some(extras)).await
            }
        },
        Commands::EditProfile {
            first_name,
            last_name,
            phone,
            address,
        } => account::edit_profile(&env, first_name, last_name, phone, address).await,
        Commands::Professionals => browse::professionals(&env).await,
        Commands::Search { term } => browse::search(&env, &term).await,
        Commands::Profile { id } => browse::profile(&env, &id).await,
        Commands::Connect { id } => connections::connect(&env, &id).await,
        Commands::Disconnect { id } => connections::disconnect(&env, &id).await,
        Commands::Messages { filter } => connections::messages(&env, filter.as_deref()).await,
        Commands::ForgotPassword { email } => account::forgot_password(&env, &email).await,
    };

    // Persist even after a failed command: the backend may have changed
    env.finish().await?;
    result
}

/// Get the default data directory for prof-cli.
fn default_data_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("uy", "profesionales", "prof-cli")
        .context("Could not determine home directory")?;
    Ok(dirs.data_dir().to_path_buf())
}
