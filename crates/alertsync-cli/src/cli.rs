//! Command-line argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "alertsync",
    about = "Reconcile dashboard alert rules and webhooks against a JSON document",
    version
)]
pub struct Cli {
    /// Dashboard API key
    #[arg(long, env = "MERAKI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Dashboard API base URL
    #[arg(
        long,
        env = "MERAKI_BASE_URL",
        default_value = "https://api.meraki.com/api/v1",
        global = true
    )]
    pub base_url: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile alert rules and webhooks for the selected networks
    Run {
        /// Path to the JSON configuration document
        #[arg(short, long)]
        config: PathBuf,

        /// Organization to target (id or name); prompts when omitted
        #[arg(long)]
        org: Option<String>,

        /// Network to target (id or name); repeatable
        #[arg(long)]
        network: Vec<String>,

        /// Target every network in the selected organization
        #[arg(long, conflicts_with = "network")]
        all_networks: bool,

        /// Compute and report the plan without issuing any writes
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Print the run result as JSON instead of the human report
        #[arg(long)]
        json: bool,

        /// Write the run log to this path instead of the timestamped default
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// List organizations visible to the API key
    ListOrgs,

    /// List networks of an organization
    ListNetworks {
        /// Organization id or name
        #[arg(long)]
        org: String,
    },
}
