use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
}

/// One-shot maintenance action requested on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Migrate,
    IssueToken,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Food donation and waste tracking API")]
pub struct Args {
    /// Host to bind to (overrides FOOD_TRACKER_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides FOOD_TRACKER_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL (overrides FOOD_TRACKER_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Run migrations and exit
    #[arg(long, conflicts_with = "issue_token")]
    pub migrate: bool,

    /// Create an API token for a new owner, print it and exit
    #[arg(long)]
    pub issue_token: bool,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the requested command.
    pub fn from_env_and_args() -> Result<(Self, Command)> {
        let args = Args::parse();
        Self::from_args(args)
    }

    fn from_args(args: Args) -> Result<(Self, Command)> {
        // --- Environment fallback ---
        let env_host = env::var("FOOD_TRACKER_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("FOOD_TRACKER_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing FOOD_TRACKER_PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 3000,
            Err(err) => return Err(err).context("reading FOOD_TRACKER_PORT"),
        };
        let env_db = env::var("FOOD_TRACKER_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/food_tracker.db".into());

        // --- Merge ---
        let cfg = Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            database_url: args.database_url.unwrap_or(env_db),
        };

        let command = if args.migrate {
            Command::Migrate
        } else if args.issue_token {
            Command::IssueToken
        } else {
            Command::Serve
        };

        Ok((cfg, command))
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
