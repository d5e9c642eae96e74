//! Subcommand implementations

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;

use alertsync_api::DashboardClient;
use alertsync_core::{
    EventSink, NullSink, ReconcileEngine, RunOptions, ScopeFilter, Selector, scope::find_org,
};
use alertsync_meta::load_document;

use crate::client::HttpDashboard;
use crate::error::{CliError, Result};
use crate::interactive;
use crate::render::{self, ConsoleSink};

pub struct RunArgs {
    pub config: PathBuf,
    pub org: Option<String>,
    pub networks: Vec<String>,
    pub all_networks: bool,
    pub dry_run: bool,
    pub yes: bool,
    pub json: bool,
    pub log_file: Option<PathBuf>,
}

/// Reconcile the configured alert rules and webhooks for the selected scope.
pub fn run_reconcile(client: HttpDashboard, args: &RunArgs) -> Result<()> {
    let doc = load_document(&args.config)?;

    let orgs = client.list_organizations()?;
    let org_selector = match &args.org {
        Some(org) => org.clone(),
        None => interactive::select_org(&orgs)?,
    };
    let org = find_org(&orgs, &org_selector).ok_or_else(|| {
        CliError::user(format!("organization '{}' not found", org_selector))
    })?;

    let networks = client.list_networks(&org.id)?;
    let network_selector = if args.all_networks {
        Selector::All
    } else if !args.networks.is_empty() {
        Selector::Named(args.networks.clone())
    } else {
        Selector::Named(interactive::select_networks(&networks)?)
    };

    let target_count = match &network_selector {
        Selector::All => networks.len(),
        Selector::Named(entries) => entries.len(),
    };
    if !args.dry_run && !args.yes {
        println!("\n{}", "Loaded configuration:".bold());
        for org_cfg in &doc.organizations {
            for (network, cfg) in &org_cfg.networks {
                let webhook = match &cfg.webhook {
                    Some(w) => format!(", webhook '{}'", w.name),
                    None => String::new(),
                };
                println!(
                    "  {} / {}: {} alert rule(s){}",
                    org_cfg.org,
                    network,
                    cfg.alerts.len(),
                    webhook
                );
            }
        }
        interactive::confirm_gate(target_count)?;
    }

    let filter = ScopeFilter {
        orgs: Selector::Named(vec![org.id.clone()]),
        networks: network_selector,
    };

    let log_path = args.log_file.clone().unwrap_or_else(|| {
        PathBuf::from(format!(
            "alertsync_run_{}.log",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ))
    });
    let mut log = File::create(&log_path)?;

    let sink: Box<dyn EventSink> = if args.json {
        Box::new(NullSink)
    } else {
        Box::new(ConsoleSink::new(Some(log.try_clone()?)))
    };

    let engine = ReconcileEngine::new(Box::new(client)).with_sink(sink);
    let result = engine.run(
        &doc,
        &filter,
        &RunOptions {
            dry_run: args.dry_run,
        },
    );

    for line in render::report_lines(&result) {
        writeln!(log, "{}", line)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        render::print_summary(&result);
        println!("Run log written to {}", log_path.display());
    }

    let summary = result.summary();
    if summary.failed + summary.network_errors + summary.unresolved_scope > 0 {
        return Err(CliError::user("run finished with failures"));
    }
    Ok(())
}

pub fn run_list_orgs(client: &HttpDashboard) -> Result<()> {
    let orgs = client.list_organizations()?;
    if orgs.is_empty() {
        println!("No organizations visible to this API key");
        return Ok(());
    }
    for org in orgs {
        println!("{}  {}", org.id.dimmed(), org.name.bold());
    }
    Ok(())
}

pub fn run_list_networks(client: &HttpDashboard, org_selector: &str) -> Result<()> {
    let orgs = client.list_organizations()?;
    let org = find_org(&orgs, org_selector).ok_or_else(|| {
        CliError::user(format!("organization '{}' not found", org_selector))
    })?;
    let networks = client.list_networks(&org.id)?;
    if networks.is_empty() {
        println!("Organization {} has no networks", org.name.bold());
        return Ok(());
    }
    for network in networks {
        println!("{}  {}", network.id.dimmed(), network.name);
    }
    Ok(())
}
