//! Interactive prompts
//!
//! Used when the operator does not pin the scope on the command line: pick an
//! organization, pick networks, and confirm before anything is written.

use colored::Colorize;
use dialoguer::{Input, MultiSelect, Select, theme::ColorfulTheme};

use alertsync_api::{Network, Organization};

use crate::error::{CliError, Result};

/// Pick one organization from the catalog.
pub fn select_org(orgs: &[Organization]) -> Result<String> {
    if orgs.is_empty() {
        return Err(CliError::user("no organizations visible to this API key"));
    }
    let labels: Vec<String> = orgs
        .iter()
        .map(|o| format!("{} ({})", o.name, o.id))
        .collect();
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select an organization")
        .items(&labels)
        .default(0)
        .interact()?;
    Ok(orgs[index].id.clone())
}

/// Pick one or more networks from an organization's catalog.
pub fn select_networks(networks: &[Network]) -> Result<Vec<String>> {
    if networks.is_empty() {
        return Err(CliError::user("the selected organization has no networks"));
    }
    let labels: Vec<String> = networks
        .iter()
        .map(|n| format!("{} ({})", n.name, n.id))
        .collect();
    let picked = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Select networks (space to toggle, enter to accept)")
        .items(&labels)
        .interact()?;
    if picked.is_empty() {
        return Err(CliError::user("no networks selected"));
    }
    Ok(picked
        .into_iter()
        .map(|i| networks[i].id.clone())
        .collect())
}

/// Final gate before mutating calls are issued.
pub fn confirm_gate(target_count: usize) -> Result<()> {
    println!(
        "\n{} This will modify alert settings on {} network(s).",
        "!".yellow().bold(),
        target_count
    );
    let answer: String = Input::new()
        .with_prompt("Type CONFIRM to proceed")
        .allow_empty(true)
        .interact_text()?;
    if answer != "CONFIRM" {
        return Err(CliError::user("aborted: confirmation not given"));
    }
    Ok(())
}
