//! alertsync CLI
//!
//! Reconciles dashboard alert-rule and webhook configuration against a
//! declarative JSON document.

mod cli;
mod client;
mod commands;
mod error;
mod interactive;
mod render;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let api_key = cli.api_key.as_deref().ok_or_else(|| {
        error::CliError::user("no API key: pass --api-key or set MERAKI_API_KEY")
    })?;
    let client = client::HttpDashboard::new(&cli.base_url, api_key)?;

    match cli.command {
        Commands::Run {
            config,
            org,
            network,
            all_networks,
            dry_run,
            yes,
            json,
            log_file,
        } => commands::run_reconcile(
            client,
            &commands::RunArgs {
                config,
                org,
                networks: network,
                all_networks,
                dry_run,
                yes,
                json,
                log_file,
            },
        ),
        Commands::ListOrgs => commands::run_list_orgs(&client),
        Commands::ListNetworks { org } => commands::run_list_networks(&client, &org),
    }
}
